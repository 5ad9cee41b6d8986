use std::path::{Path, PathBuf};
use tracing::{info, warn};
use webscope_core::{AppConfig, FieldSet, ScopeError};

use crate::document::PageSession;
use crate::frames::FrameSearch;

/// Runs the optional interaction and screenshot steps, then the frame search
pub struct Inspector {
    search: FrameSearch,
    simulate_interaction: bool,
    screenshot_dir: Option<PathBuf>,
}

impl Inspector {
    pub fn new(search: FrameSearch) -> Self {
        Self {
            search,
            simulate_interaction: false,
            screenshot_dir: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(FrameSearch::from_config(&config.detection))
            .simulate_interaction(config.browser.simulate_interaction)
            .screenshot_dir(config.browser.screenshot_dir.as_ref().map(PathBuf::from))
    }

    pub fn simulate_interaction(mut self, enabled: bool) -> Self {
        self.simulate_interaction = enabled;
        self
    }

    pub fn screenshot_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.screenshot_dir = dir;
        self
    }

    /// `name` only feeds the screenshot file name
    pub fn inspect<S: PageSession>(&self, session: &S, name: &str) -> Result<FieldSet, ScopeError> {
        if self.simulate_interaction {
            interact(session);
        }

        if let Some(dir) = &self.screenshot_dir {
            match save_screenshot(session, dir, name) {
                Ok(path) => info!("screenshot saved to {}", path.display()),
                Err(e) => warn!("could not take screenshot: {}", e),
            }
        }

        self.search.find(&session.root())
    }
}

/// Each step runs regardless of how the previous one went
fn interact<S: PageSession>(session: &S) {
    let steps: [(&str, fn(&S) -> Result<(), ScopeError>); 3] = [
        ("pointer move", S::move_pointer),
        ("click", S::click),
        ("scroll", S::scroll_to_bottom),
    ];

    let mut failed = 0;
    for (name, step) in steps {
        if let Err(e) = step(session) {
            warn!("{} failed, continuing: {}", name, e);
            failed += 1;
        }
    }
    info!("simulated page interaction ({} of 3 steps ok)", 3 - failed);
}

fn save_screenshot<S: PageSession>(
    session: &S,
    dir: &Path,
    name: &str,
) -> Result<PathBuf, ScopeError> {
    let png = session.screenshot()?;
    std::fs::create_dir_all(dir).map_err(|e| ScopeError::Other(e.into()))?;
    let path = dir.join(screenshot_file_name(name));
    std::fs::write(&path, png).map_err(|e| ScopeError::Other(e.into()))?;
    Ok(path)
}

fn screenshot_file_name(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(64)
        .collect();
    format!("{}-{}.png", chrono::Utc::now().format("%Y%m%d-%H%M%S%.3f"), slug)
}
