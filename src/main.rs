mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;

// Long-running server with repeated Chrome launches; mimalloc returns memory to the OS
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use webscope_core::config::AppConfig;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Each analysis holds a blocking thread for the whole page visit
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .max_blocking_threads(64)
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let cli = Cli::parse();

    // The log file location comes from the config, so config warnings go to the console only
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, || AppConfig::load(&cli.config))?;

    let _guard = logging::init(&config.logging)?;

    match cli.command {
        Commands::Serve { host, port } => commands::run_serve(config, host, port).await,
        Commands::Analyze { url, format } => commands::run_analyze(config, url, format).await,
        Commands::Inspect { file, url, format } => {
            commands::run_inspect(config, &file, url, format)
        }
    }
}
