use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("timeout after {0}s waiting for page")]
    Timeout(u64),

    #[error("invalid selector: {0}")]
    Selector(String),

    #[error("frame error: {0}")]
    Frame(String),

    #[error("interaction error: {0}")]
    Interaction(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("report error: {0}")]
    Report(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl ScopeError {
    /// Wrap any displayable browser-side failure
    pub fn browser(err: impl std::fmt::Display) -> Self {
        Self::Browser(err.to_string())
    }
}
