use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};
use webscope_browser::chrome_analyzer;
use webscope_core::config::AppConfig;
use webscope_core::report::{to_json, to_yaml};
use webscope_core::PageResult;
use webscope_detection::{FrameSearch, HtmlDocument};

use crate::cli::OutputFormat;

pub async fn run_serve(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let analyzer = Arc::new(chrome_analyzer(&config));
    webscope_server::serve(&config, analyzer).await
}

pub async fn run_analyze(config: AppConfig, url: String, format: OutputFormat) -> Result<()> {
    let analyzer = chrome_analyzer(&config);
    let result = tokio::task::spawn_blocking(move || analyzer.run(&url)).await?;

    if let Some(err) = &result.error {
        error!("analysis of {} degraded: {}", result.page, err);
    }
    print_result(&result, format)
}

pub fn run_inspect(
    config: AppConfig,
    file: &str,
    url: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let page = url.unwrap_or_else(|| file.to_string());
    let search = FrameSearch::from_config(&config.detection);

    let result = match HtmlDocument::from_file(file).and_then(|doc| search.find(&doc)) {
        Ok(fields) => {
            info!("inspected {}", file);
            PageResult::new(page, fields)
        }
        Err(e) => {
            error!("could not inspect {}: {}", file, e);
            PageResult::failed(page, e)
        }
    };

    print_result(&result, format)
}

fn print_result(result: &PageResult, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => to_json(result)?,
        OutputFormat::Yaml => to_yaml(result)?,
    };
    println!("{}", rendered);
    Ok(())
}
