pub mod config;
pub mod error;
pub mod report;
pub mod types;
pub mod waiting_screen;

pub use config::AppConfig;
pub use error::ScopeError;
pub use report::Report;
pub use types::*;
