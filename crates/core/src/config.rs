use serde::Deserialize;
use tracing::warn;

use crate::error::ScopeError;

/// Built-in configuration, used when no config file is found
pub const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub browser: BrowserConfig,
    pub detection: DetectionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// CIDR blocks or bare addresses allowed to reach the front end
    #[serde(default = "default_allowed_ips")]
    pub allowed_ips: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrowserConfig {
    pub headless: bool,
    #[serde(default)]
    pub chrome_path: Option<String>,
    pub window_width: u32,
    pub window_height: u32,
    /// Upper bound for a single navigation
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_seconds: u64,
    pub page_load_timeout_seconds: u64,
    pub settle_seconds: u64,
    pub simulate_interaction: bool,
    #[serde(default)]
    pub screenshot_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DetectionConfig {
    /// 0 = root only, 1 = direct child frames, 2 = child frames and their frames
    #[serde(default = "default_frame_depth")]
    pub frame_depth: usize,
    #[serde(default)]
    pub submit_reporting: SubmitReporting,
}

/// How the submit role reports a hit
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubmitReporting {
    /// Always report `button[type='submit']` when any submit candidate matches
    #[default]
    Canonical,
    /// Report the candidate that matched, like the other roles
    Matched,
}

fn default_allowed_ips() -> Vec<String> {
    vec!["0.0.0.0/0".to_string()]
}

fn default_navigation_timeout() -> u64 {
    30
}

fn default_frame_depth() -> usize {
    2
}

impl AppConfig {
    pub fn bundled() -> Result<Self, ScopeError> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ScopeError> {
        toml::from_str(raw).map_err(|e| ScopeError::Config(e.to_string()))
    }

    /// Read the config file, falling back to the bundled defaults when it is missing
    pub fn load(path: &str) -> Result<Self, ScopeError> {
        let raw = std::fs::read_to_string(path).unwrap_or_else(|_| {
            warn!(path = %path, "config file not found, using defaults");
            DEFAULT_CONFIG.to_string()
        });
        let mut config = Self::from_toml(&raw)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment variables win over the file
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("PORT") {
            match v.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!(value = %v, "ignoring invalid PORT"),
            }
        }
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("ALLOWED_IPS") {
            let ips: Vec<String> = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !ips.is_empty() {
                self.server.allowed_ips = ips;
            }
        }
        if let Some(v) = lookup("LOG_FILE") {
            self.logging.file = v;
        }
        if let Some(v) = lookup("CHROME_PATH") {
            self.browser.chrome_path = Some(v);
        }
        if let Some(v) = lookup("SCREENSHOT_DIR") {
            self.browser.screenshot_dir = Some(v);
        }
        if let Some(v) = lookup("FRAME_DEPTH") {
            match v.parse::<usize>() {
                Ok(depth) => self.detection.frame_depth = depth,
                Err(_) => warn!(value = %v, "ignoring invalid FRAME_DEPTH"),
            }
        }
    }
}
