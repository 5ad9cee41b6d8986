//! HTTP front end: analyze endpoint, inspector pages and live log stream.

pub mod access;
pub mod logs;
pub mod router;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use webscope_core::AppConfig;
use webscope_detection::Analyze;

pub use access::AccessPolicy;
pub use router::{create_router, AppState, APP_NAME};

/// Bind the configured listener and serve until the process is stopped
pub async fn serve(config: &AppConfig, analyzer: Arc<dyn Analyze>) -> Result<()> {
    let policy = Arc::new(AccessPolicy::from_entries(config.server.allowed_ips.as_slice())?);
    let state = AppState {
        analyzer,
        log_file: PathBuf::from(&config.logging.file),
    };
    let app = create_router(state, policy);

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!(
        "{} listening on http://{} (allowed: {})",
        APP_NAME,
        listener.local_addr()?,
        config.server.allowed_ips.join(", ")
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
