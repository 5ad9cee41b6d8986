use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, Element, LaunchOptionsBuilder, Tab};
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;
use webscope_core::config::BrowserConfig;
use webscope_core::waiting_screen::is_waiting_screen;
use webscope_core::ScopeError;
use webscope_detection::PageSession;

use crate::tab_document::TabDocument;

const SCROLL_TO_BOTTOM: &str =
    "window.scrollTo(0, document.body ? document.body.scrollHeight : document.documentElement.scrollHeight);";
const BODY_TEXT: &str = "document.body ? document.body.innerText : ''";

/// One Chrome process with a single tab. Chrome is shut down when this is dropped.
pub struct HeadlessBrowser {
    tab: Arc<Tab>,
    // Held for its Drop, which kills the Chrome process
    _browser: Browser,
    config: BrowserConfig,
}

impl HeadlessBrowser {
    /// Launch a fresh headless instance
    pub fn launch(config: BrowserConfig) -> Result<Self, ScopeError> {
        let extra_args: Vec<OsString> = vec![
            // Required for running in Docker containers
            OsString::from("--no-sandbox"),
            OsString::from("--disable-dev-shm-usage"),
            OsString::from("--disable-gpu"),
        ];

        let mut builder = LaunchOptionsBuilder::default();
        builder
            .headless(config.headless)
            .window_size(Some((config.window_width, config.window_height)))
            .args(extra_args.iter().map(|a| a.as_ref()).collect());

        if let Some(path) = &config.chrome_path {
            builder.path(Some(PathBuf::from(path)));
        }

        let launch_options = builder.build().map_err(ScopeError::browser)?;
        let browser = Browser::new(launch_options).map_err(ScopeError::browser)?;

        let tab = browser.new_tab().map_err(ScopeError::browser)?;
        tab.set_default_timeout(Duration::from_secs(config.navigation_timeout_seconds));

        debug!("launched headless browser");
        Ok(Self {
            tab,
            _browser: browser,
            config,
        })
    }

    /// Navigate and wait until the page looks ready: a `<body>` exists and no
    /// waiting screen is showing, bounded by `page_load_timeout_seconds`
    pub fn navigate_and_wait(&self, url: &Url) -> Result<(), ScopeError> {
        info!("navigating to {}", url);

        self.tab
            .navigate_to(url.as_str())
            .map_err(ScopeError::browser)?;
        self.tab.wait_until_navigated().map_err(ScopeError::browser)?;

        let max_wait = Duration::from_secs(self.config.page_load_timeout_seconds);
        self.tab
            .wait_for_element_with_custom_timeout("body", max_wait)
            .map_err(|_| ScopeError::Timeout(self.config.page_load_timeout_seconds))?;

        info!("page loaded, waiting for dynamic content");
        self.wait_for_content(max_wait);

        // Let late scripts finish rendering forms
        std::thread::sleep(Duration::from_secs(self.config.settle_seconds));
        Ok(())
    }

    fn wait_for_content(&self, max_wait: Duration) {
        let wait_start = Instant::now();

        loop {
            let (body_text, html_size) = match self.page_text() {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!("could not read page content: {}", e);
                    return;
                }
            };

            if !is_waiting_screen(&body_text, html_size) {
                debug!("content ready after {:?}", wait_start.elapsed());
                return;
            }

            if wait_start.elapsed() > max_wait {
                warn!("still on a waiting screen after {:?}, scanning anyway", max_wait);
                return;
            }

            std::thread::sleep(Duration::from_millis(500));
        }
    }

    fn body(&self) -> Result<Element<'_>, ScopeError> {
        self.tab
            .find_element("body")
            .map_err(|e| ScopeError::Interaction(format!("no body element: {}", e)))
    }

    /// Visible body text and the size of the serialized document
    fn page_text(&self) -> Result<(String, usize), ScopeError> {
        let text = self
            .tab
            .evaluate(BODY_TEXT, false)
            .map_err(ScopeError::browser)?
            .value
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        let html_size = self.tab.get_content().map_err(ScopeError::browser)?.len();
        Ok((text, html_size))
    }
}

impl PageSession for HeadlessBrowser {
    type Doc = TabDocument;

    fn root(&self) -> TabDocument {
        TabDocument::top(self.tab.clone())
    }

    fn move_pointer(&self) -> Result<(), ScopeError> {
        self.body()?
            .move_mouse_over()
            .map_err(|e| ScopeError::Interaction(format!("pointer move failed: {}", e)))?;
        Ok(())
    }

    fn click(&self) -> Result<(), ScopeError> {
        self.body()?
            .click()
            .map_err(|e| ScopeError::Interaction(format!("click failed: {}", e)))?;
        Ok(())
    }

    fn scroll_to_bottom(&self) -> Result<(), ScopeError> {
        self.tab
            .evaluate(SCROLL_TO_BOTTOM, false)
            .map_err(|e| ScopeError::Interaction(format!("scroll failed: {}", e)))?;
        // Give lazy forms a moment to attach
        std::thread::sleep(Duration::from_secs(1));
        Ok(())
    }

    fn screenshot(&self) -> Result<Vec<u8>, ScopeError> {
        self.tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(ScopeError::browser)
    }
}

impl Drop for HeadlessBrowser {
    fn drop(&mut self) {
        if let Err(e) = self.tab.close(false) {
            debug!("tab close failed during shutdown: {}", e);
        }
        debug!("headless browser released");
    }
}
