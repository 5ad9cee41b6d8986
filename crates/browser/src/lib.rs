pub mod browser;
pub mod renderer;
pub mod tab_document;

pub use browser::HeadlessBrowser;
pub use renderer::{chrome_analyzer, ChromeRenderer};
pub use tab_document::TabDocument;
