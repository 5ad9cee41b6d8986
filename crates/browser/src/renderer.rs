use url::Url;
use webscope_core::config::BrowserConfig;
use webscope_core::{AppConfig, ScopeError};
use webscope_detection::{Inspector, PageAnalyzer, Renderer};

use crate::browser::HeadlessBrowser;

/// Launches a new Chrome for every page; nothing is shared between renders
#[derive(Debug, Clone)]
pub struct ChromeRenderer {
    config: BrowserConfig,
}

impl ChromeRenderer {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

impl Renderer for ChromeRenderer {
    type Session = HeadlessBrowser;

    fn render(&self, url: &Url) -> Result<HeadlessBrowser, ScopeError> {
        let browser = HeadlessBrowser::launch(self.config.clone())?;
        browser.navigate_and_wait(url)?;
        Ok(browser)
    }
}

/// Analyzer wired to a real headless Chrome
pub fn chrome_analyzer(config: &AppConfig) -> PageAnalyzer<ChromeRenderer> {
    PageAnalyzer::new(
        ChromeRenderer::new(config.browser.clone()),
        Inspector::from_config(config),
    )
}
