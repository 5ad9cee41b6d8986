use scraper::{Html, Selector};
use std::path::Path;
use webscope_core::ScopeError;

use crate::document::Document;

/// Static document parsed from markup. Child frames come from `iframe[srcdoc]`
/// (parsed recursively) or are attached with [`HtmlDocument::with_frame`].
#[derive(Clone)]
pub struct HtmlDocument {
    label: String,
    html: Html,
    frames: Vec<HtmlDocument>,
}

impl HtmlDocument {
    pub fn parse(markup: &str) -> Self {
        Self::parse_labeled(markup, "root".to_string())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScopeError> {
        let path = path.as_ref();
        let markup = std::fs::read_to_string(path)
            .map_err(|e| ScopeError::Other(anyhow::anyhow!("{}: {}", path.display(), e)))?;
        Ok(Self::parse(&markup))
    }

    fn parse_labeled(markup: &str, label: String) -> Self {
        let html = Html::parse_document(markup);
        let frames = Self::srcdoc_frames(&html, &label);
        Self { label, html, frames }
    }

    fn srcdoc_frames(html: &Html, parent: &str) -> Vec<HtmlDocument> {
        let Ok(selector) = Selector::parse("iframe[srcdoc]") else {
            return Vec::new();
        };
        html.select(&selector)
            .filter_map(|frame| frame.value().attr("srcdoc"))
            .enumerate()
            .map(|(i, srcdoc)| Self::parse_labeled(srcdoc, child_label(parent, i)))
            .collect()
    }

    /// Append a child frame after any srcdoc frames
    pub fn with_frame(mut self, frame: HtmlDocument) -> Self {
        let index = self.frames.len();
        self.frames.push(frame.relabel(child_label(&self.label, index)));
        self
    }

    fn relabel(mut self, label: String) -> Self {
        self.frames = self
            .frames
            .into_iter()
            .enumerate()
            .map(|(i, frame)| frame.relabel(child_label(&label, i)))
            .collect();
        self.label = label;
        self
    }
}

fn child_label(parent: &str, index: usize) -> String {
    if parent == "root" {
        format!("frame[{}]", index)
    } else {
        format!("{}/frame[{}]", parent, index)
    }
}

impl Document for HtmlDocument {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn count(&self, selector: &str) -> Result<usize, ScopeError> {
        let parsed = Selector::parse(selector)
            .map_err(|e| ScopeError::Selector(format!("{}: {:?}", selector, e)))?;
        Ok(self.html.select(&parsed).count())
    }

    fn frames(&self) -> Result<Vec<Self>, ScopeError> {
        Ok(self.frames.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_matches() {
        let doc = HtmlDocument::parse(r#"<input type="password"><input type="password"><input>"#);
        assert_eq!(doc.count("input[type='password']").unwrap(), 2);
        assert_eq!(doc.count("input, button").unwrap(), 3);
        assert_eq!(doc.count("button").unwrap(), 0);
    }

    #[test]
    fn test_invalid_selector() {
        let doc = HtmlDocument::parse("<input>");
        assert!(matches!(doc.count("input[[").unwrap_err(), ScopeError::Selector(_)));
    }

    #[test]
    fn test_srcdoc_frames_are_nested_documents() {
        let doc = HtmlDocument::parse(
            r#"<iframe srcdoc="<input name='passwd'>"></iframe>
               <iframe src="/no-srcdoc"></iframe>
               <iframe srcdoc="<p>second</p>"></iframe>"#,
        );

        let frames = doc.frames().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].describe(), "frame[0]");
        assert_eq!(frames[0].count("input[name='passwd']").unwrap(), 1);
        // Frame content is not part of the parent document
        assert_eq!(doc.count("input").unwrap(), 0);
    }

    #[test]
    fn test_attached_frames_are_labeled() {
        let grandchild = HtmlDocument::parse("<input type='email'>");
        let child = HtmlDocument::parse("<p>child</p>").with_frame(grandchild);
        let root = HtmlDocument::parse("<p>root</p>").with_frame(child);

        let child = &root.frames().unwrap()[0];
        assert_eq!(child.describe(), "frame[0]");
        assert_eq!(child.frames().unwrap()[0].describe(), "frame[0]/frame[0]");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("login.html");
        std::fs::write(&path, "<form><input type='email'></form>").unwrap();

        let doc = HtmlDocument::from_file(&path).unwrap();
        assert_eq!(doc.count("input[type='email']").unwrap(), 1);
        assert!(HtmlDocument::from_file(dir.path().join("missing.html")).is_err());
    }
}
