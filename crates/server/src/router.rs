use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    middleware,
    response::{sse::KeepAlive, Html, IntoResponse, Response, Sse},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use webscope_core::{PageResult, Report};
use webscope_detection::Analyze;

use crate::access::{allow_list_middleware, AccessPolicy};
use crate::logs::LogTail;

pub const APP_NAME: &str = "WebScope - Autofill Inspector";

const INDEX_HTML: &str = include_str!("../static/index.html");
const LOGS_HTML: &str = include_str!("../static/log.html");
const LOG_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<dyn Analyze>,
    pub log_file: PathBuf,
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    url: Option<String>,
}

pub fn create_router(state: AppState, policy: Arc<AccessPolicy>) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/logs", get(serve_logs_page))
        .route("/stream-logs", get(stream_logs))
        .route("/analyze", post(analyze))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(middleware::from_fn_with_state(policy, allow_list_middleware))
        .layer(TraceLayer::new_for_http())
}

async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn serve_logs_page() -> Html<&'static str> {
    Html(LOGS_HTML)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok", "name": APP_NAME }))
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

/// Body is read raw so a missing or malformed payload gets the same 400
async fn analyze(State(state): State<AppState>, body: Bytes) -> Response {
    let url = serde_json::from_slice::<AnalyzeRequest>(&body)
        .ok()
        .and_then(|req| req.url)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    let Some(url) = url else {
        return bad_request("No URL provided");
    };

    // headless_chrome blocks; keep it off the async workers
    let analyzer = state.analyzer.clone();
    let task_url = url.clone();
    let result = match tokio::task::spawn_blocking(move || analyzer.analyze(&task_url)).await {
        Ok(result) => result,
        Err(e) => {
            error!("analysis task for {} failed: {}", url, e);
            PageResult::failed(&url, "analysis aborted unexpectedly")
        }
    };

    match Report::render(&result) {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            error!("could not render report for {}: {}", url, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "could not render report" })),
            )
                .into_response()
        }
    }
}

async fn stream_logs(State(state): State<AppState>) -> Response {
    match LogTail::open(&state.log_file, LOG_POLL_INTERVAL).await {
        Ok(tail) => {
            info!("log stream opened");
            Sse::new(tail.into_events())
                .keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
                .into_response()
        }
        Err(e) => {
            warn!("cannot open log file {}: {}", state.log_file.display(), e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "log file unavailable" })),
            )
                .into_response()
        }
    }
}
