use tracing::{info, warn};
use webscope_core::config::DetectionConfig;
use webscope_core::{FieldSet, ScopeError};

use crate::classifier::FieldClassifier;
use crate::document::Document;

/// Frame-first search: a frame exposing a username or password field wins
/// over the root document's own scan.
pub struct FrameSearch {
    classifier: FieldClassifier,
    max_depth: usize,
}

impl FrameSearch {
    pub fn new(classifier: FieldClassifier, max_depth: usize) -> Self {
        Self {
            classifier,
            max_depth,
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(
            FieldClassifier::new(config.submit_reporting),
            config.frame_depth,
        )
    }

    /// Classify the root, then adopt the first frame that yields credentials.
    /// Frames are visited breadth-first: every frame at one nesting level,
    /// in document order, before any frame one level deeper.
    pub fn find<D: Document>(&self, root: &D) -> Result<FieldSet, ScopeError> {
        let root_fields = self.classifier.classify(root)?;

        if let Some((label, fields)) = self.search_frames(root) {
            info!("using login fields found in {}", label);
            return Ok(fields);
        }

        Ok(root_fields)
    }

    fn search_frames<D: Document>(&self, root: &D) -> Option<(String, FieldSet)> {
        if self.max_depth == 0 {
            return None;
        }
        let mut level = child_frames(root);

        for depth in 1..=self.max_depth {
            if level.is_empty() {
                break;
            }
            info!("checking {} frame(s) at depth {}", level.len(), depth);

            for frame in &level {
                match self.classifier.classify(frame) {
                    Ok(fields) if fields.has_credentials() => {
                        return Some((frame.describe(), fields))
                    }
                    Ok(_) => {}
                    Err(e) => warn!("could not scan {}: {}", frame.describe(), e),
                }
            }

            if depth < self.max_depth {
                level = level.iter().flat_map(child_frames).collect();
            }
        }

        None
    }
}

/// Direct child frames; a listing failure is logged and treated as none
fn child_frames<D: Document>(doc: &D) -> Vec<D> {
    match doc.frames() {
        Ok(frames) => frames,
        Err(e) => {
            warn!("could not list frames of {}: {}", doc.describe(), e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html_document::HtmlDocument;
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::rc::Rc;

    fn search(depth: usize) -> FrameSearch {
        FrameSearch::new(FieldClassifier::default(), depth)
    }

    /// Hand-built document tree with injectable failures
    #[derive(Clone, Default)]
    struct FakeDocument {
        label: String,
        hits: HashMap<&'static str, usize>,
        frames: Vec<FakeDocument>,
        broken_frames: bool,
        broken_queries: bool,
        frame_lookups: Rc<Cell<usize>>,
    }

    impl FakeDocument {
        fn new(label: &str) -> Self {
            Self {
                label: label.to_string(),
                ..Default::default()
            }
        }

        fn hit(mut self, selector: &'static str) -> Self {
            self.hits.insert(selector, 1);
            self
        }

        fn frame(mut self, frame: FakeDocument) -> Self {
            self.frames.push(frame);
            self
        }
    }

    impl Document for FakeDocument {
        fn describe(&self) -> String {
            self.label.clone()
        }

        fn count(&self, selector: &str) -> Result<usize, ScopeError> {
            if self.broken_queries {
                return Err(ScopeError::Frame(format!("{} detached", self.label)));
            }
            Ok(self.hits.get(selector).copied().unwrap_or(0))
        }

        fn frames(&self) -> Result<Vec<Self>, ScopeError> {
            self.frame_lookups.set(self.frame_lookups.get() + 1);
            if self.broken_frames {
                return Err(ScopeError::Frame("cross-origin".to_string()));
            }
            Ok(self.frames.clone())
        }
    }

    #[test]
    fn test_child_frame_wins_over_root() {
        let root = HtmlDocument::parse(
            r#"<button type="submit">Go</button>
               <iframe srcdoc="<input id='username'>"></iframe>"#,
        );

        let fields = search(1).find(&root).unwrap();
        assert_eq!(fields.username.as_deref(), Some("input[id*='user']"));
        // The frame result is adopted whole, root submit is not merged in
        assert_eq!(fields.submit, None);
    }

    #[test]
    fn test_adopted_frame_with_only_password() {
        let root = HtmlDocument::parse(
            r#"<h1>Welcome</h1><iframe srcdoc="<input name='passwd' type='text'>"></iframe>"#,
        );

        let fields = search(1).find(&root).unwrap();
        assert_eq!(fields.username, None);
        assert_eq!(fields.password.as_deref(), Some("input[name='passwd']"));
    }

    #[test]
    fn test_frame_preferred_even_when_root_has_fields() {
        let root = HtmlDocument::parse("<input type='email'>")
            .with_frame(HtmlDocument::parse("<input autocomplete='username'>"));

        let fields = search(1).find(&root).unwrap();
        assert_eq!(fields.username.as_deref(), Some("input[autocomplete='username']"));
    }

    #[test]
    fn test_falls_back_to_root_without_frame_credentials() {
        let root = HtmlDocument::parse(
            r#"<input type="email"><iframe srcdoc="<input name='otp'>"></iframe>"#,
        );

        let fields = search(2).find(&root).unwrap();
        assert_eq!(fields.username.as_deref(), Some("input[type='email']"));
        assert_eq!(fields.totp, None);
    }

    #[test]
    fn test_first_matching_frame_wins() {
        let root = HtmlDocument::parse("<p>root</p>")
            .with_frame(HtmlDocument::parse("<p>ads</p>"))
            .with_frame(HtmlDocument::parse("<input type='password'>"))
            .with_frame(HtmlDocument::parse("<input type='email'>"));

        let fields = search(1).find(&root).unwrap();
        assert_eq!(fields.password.as_deref(), Some("input[type='password']"));
        assert_eq!(fields.username, None);
    }

    #[test]
    fn test_depth_limits_nested_frames() {
        let nested = || {
            HtmlDocument::parse("<p>root</p>").with_frame(
                HtmlDocument::parse("<p>wrapper</p>")
                    .with_frame(HtmlDocument::parse("<input name='login'>")),
            )
        };

        assert_eq!(search(1).find(&nested()).unwrap(), FieldSet::default());

        let fields = search(2).find(&nested()).unwrap();
        assert_eq!(fields.username.as_deref(), Some("input[name='login']"));
    }

    #[test]
    fn test_sibling_frame_beats_nested_frame() {
        let root = HtmlDocument::parse("<p>root</p>")
            .with_frame(
                HtmlDocument::parse("<p>wrapper</p>")
                    .with_frame(HtmlDocument::parse("<input type='email'>")),
            )
            .with_frame(HtmlDocument::parse("<input type='password'>"));

        let fields = search(2).find(&root).unwrap();
        assert_eq!(fields.password.as_deref(), Some("input[type='password']"));
        assert_eq!(fields.username, None);
    }

    #[test]
    fn test_depth_one_never_lists_grandchildren() {
        let child = FakeDocument::new("frame[0]")
            .frame(FakeDocument::new("frame[0]/frame[0]").hit("input[type='password']"));
        let child_lookups = child.frame_lookups.clone();
        let root = FakeDocument::new("root").frame(child);

        assert_eq!(search(1).find(&root).unwrap(), FieldSet::default());
        assert_eq!(child_lookups.get(), 0);
    }

    #[test]
    fn test_depth_zero_never_lists_frames() {
        let root = FakeDocument::new("root")
            .hit("input[type='email']")
            .frame(FakeDocument::new("frame").hit("input[type='password']"));
        let lookups = root.frame_lookups.clone();

        let fields = search(0).find(&root).unwrap();
        assert_eq!(fields.username.as_deref(), Some("input[type='email']"));
        assert_eq!(fields.password, None);
        assert_eq!(lookups.get(), 0);
    }

    #[test]
    fn test_broken_frame_is_skipped() {
        let mut broken = FakeDocument::new("frame[0]").hit("input[type='email']");
        broken.broken_queries = true;

        let root = FakeDocument::new("root")
            .frame(broken)
            .frame(FakeDocument::new("frame[1]").hit("input[name='passwd']"));

        let fields = search(1).find(&root).unwrap();
        assert_eq!(fields.password.as_deref(), Some("input[name='passwd']"));
    }

    #[test]
    fn test_frame_listing_failure_falls_back_to_root() {
        let mut root = FakeDocument::new("root").hit("input[name='email']");
        root.broken_frames = true;

        let fields = search(2).find(&root).unwrap();
        assert_eq!(fields.username.as_deref(), Some("input[name='email']"));
    }

    #[test]
    fn test_root_query_failure_propagates() {
        let mut root = FakeDocument::new("root");
        root.broken_queries = true;

        assert!(search(1).find(&root).is_err());
    }
}
