use headless_chrome::Tab;
use serde_json::Value;
use std::sync::Arc;
use webscope_core::ScopeError;
use webscope_detection::Document;

/// One frame of a live tab, addressed by `window.frames` indices from the top
/// window. Cross-origin frames are listed but cannot be queried.
#[derive(Clone)]
pub struct TabDocument {
    tab: Arc<Tab>,
    path: Vec<usize>,
}

impl TabDocument {
    pub fn top(tab: Arc<Tab>) -> Self {
        Self {
            tab,
            path: Vec::new(),
        }
    }

    fn child(&self, index: usize) -> Self {
        let mut path = self.path.clone();
        path.push(index);
        Self {
            tab: self.tab.clone(),
            path,
        }
    }

    /// Evaluate `body` with `win`/`doc` bound to this frame, expecting a count
    fn eval_count(&self, body: &str) -> Result<usize, ScopeError> {
        let script = frame_script(&self.path, body);
        let result = self
            .tab
            .evaluate(&script, false)
            .map_err(|e| ScopeError::Frame(format!("{}: {}", self.describe(), e)))?;
        decode_count(result.value)
            .map_err(|e| ScopeError::Frame(format!("{}: {}", self.describe(), e)))
    }
}

impl Document for TabDocument {
    fn describe(&self) -> String {
        if self.path.is_empty() {
            return "root".to_string();
        }
        self.path
            .iter()
            .map(|i| format!("frame[{}]", i))
            .collect::<Vec<_>>()
            .join("/")
    }

    fn count(&self, selector: &str) -> Result<usize, ScopeError> {
        let literal = serde_json::to_string(selector)
            .map_err(|e| ScopeError::Selector(e.to_string()))?;
        self.eval_count(&format!("doc.querySelectorAll({}).length", literal))
    }

    fn frames(&self) -> Result<Vec<Self>, ScopeError> {
        let total = self.eval_count("win.frames.length")?;
        Ok((0..total).map(|i| self.child(i)).collect())
    }
}

/// Wrap an expression so it runs against the frame at `path`. Failures come
/// back as an `error: ...` string rather than a thrown exception.
pub(crate) fn frame_script(path: &[usize], body: &str) -> String {
    let indices = serde_json::to_string(path).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"(() => {{
    try {{
        let win = window;
        for (const i of {indices}) {{
            win = win.frames[i];
            if (!win) {{ throw new Error('frame ' + i + ' is gone'); }}
        }}
        const doc = win.document;
        return {body};
    }} catch (e) {{
        return 'error: ' + (e && e.message ? e.message : e);
    }}
}})()"#
    )
}

pub(crate) fn decode_count(value: Option<Value>) -> Result<usize, String> {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| format!("unexpected count {}", n)),
        Some(Value::String(msg)) => Err(msg),
        Some(other) => Err(format!("unexpected result {}", other)),
        None => Err("script returned nothing".to_string()),
    }
}
