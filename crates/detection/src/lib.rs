pub mod analyzer;
pub mod candidates;
pub mod classifier;
pub mod document;
pub mod frames;
pub mod html_document;
pub mod inspect;

pub use analyzer::*;
pub use candidates::{candidates, CANDIDATES, CANONICAL_SUBMIT};
pub use classifier::*;
pub use document::*;
pub use frames::*;
pub use html_document::*;
pub use inspect::*;
