use tracing::{error, info};
use url::Url;
use webscope_core::{FieldRole, FieldSet, PageResult, ScopeError};

use crate::document::Renderer;
use crate::inspect::Inspector;

/// Object-safe entry point used by the HTTP layer
pub trait Analyze: Send + Sync {
    fn analyze(&self, url: &str) -> PageResult;
}

/// Renders a page and runs the inspector on it. Faults never escape:
/// they come back as a result with every field unavailable.
pub struct PageAnalyzer<R> {
    renderer: R,
    inspector: Inspector,
}

impl<R: Renderer> PageAnalyzer<R> {
    pub fn new(renderer: R, inspector: Inspector) -> Self {
        Self {
            renderer,
            inspector,
        }
    }

    pub fn run(&self, url: &str) -> PageResult {
        info!("analyzing page: {}", url);

        match self.try_run(url) {
            Ok(fields) => {
                for role in FieldRole::ALL {
                    info!("{} selector: {}", role, fields.display(role));
                }
                PageResult::new(url, fields)
            }
            Err(e) => {
                error!("error analyzing {}: {}", url, e);
                PageResult::failed(url, e)
            }
        }
    }

    fn try_run(&self, url: &str) -> Result<FieldSet, ScopeError> {
        let parsed = parse_page_url(url)?;
        // The session is dropped (browser released) on every path out of here
        let session = self.renderer.render(&parsed)?;
        self.inspector.inspect(&session, parsed.as_str())
    }
}

impl<R: Renderer + Send + Sync> Analyze for PageAnalyzer<R> {
    fn analyze(&self, url: &str) -> PageResult {
        self.run(url)
    }
}

/// Only absolute http(s) URLs are rendered
pub fn parse_page_url(raw: &str) -> Result<Url, ScopeError> {
    let url = Url::parse(raw.trim()).map_err(|e| ScopeError::InvalidUrl(format!("{}: {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ScopeError::InvalidUrl(format!(
            "{}: unsupported scheme {}",
            raw, other
        ))),
    }
}
