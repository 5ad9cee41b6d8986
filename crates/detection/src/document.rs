use url::Url;
use webscope_core::ScopeError;

/// Queryable view of a rendered page or one of its frames.
///
/// Implementations are borrowed for the duration of a scan; the classifier
/// never keeps element references, only selector strings.
pub trait Document: Sized {
    /// Short label for log lines ("root", "frame[0]", ...)
    fn describe(&self) -> String;

    /// Number of elements matching a CSS selector
    fn count(&self, selector: &str) -> Result<usize, ScopeError>;

    /// Direct child frames, in document order
    fn frames(&self) -> Result<Vec<Self>, ScopeError>;
}

/// A loaded page that can be poked before it is scanned
pub trait PageSession {
    type Doc: Document;

    /// Top-level document of the page
    fn root(&self) -> Self::Doc;

    /// Move the pointer over <body>
    fn move_pointer(&self) -> Result<(), ScopeError>;

    /// Click <body>
    fn click(&self) -> Result<(), ScopeError>;

    /// Scroll the viewport to the bottom of the page
    fn scroll_to_bottom(&self) -> Result<(), ScopeError>;

    /// PNG bytes of the current viewport
    fn screenshot(&self) -> Result<Vec<u8>, ScopeError>;
}

/// Turns a URL into a loaded page. The session owns the rendering resources
/// and releases them when dropped.
pub trait Renderer {
    type Session: PageSession;

    fn render(&self, url: &Url) -> Result<Self::Session, ScopeError>;
}
