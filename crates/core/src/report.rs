use serde::Serialize;

use crate::error::ScopeError;
use crate::types::PageResult;

/// Both renderings returned by the analyze endpoint
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub json: String,
    pub yaml: String,
}

impl Report {
    pub fn render(result: &PageResult) -> Result<Self, ScopeError> {
        Ok(Self {
            json: to_json(result)?,
            yaml: to_yaml(result)?,
        })
    }
}

/// Pretty JSON list with four-space indentation
pub fn to_json(result: &PageResult) -> Result<String, ScopeError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    [result]
        .serialize(&mut ser)
        .map_err(|e| ScopeError::Report(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| ScopeError::Report(e.to_string()))
}

/// Block-style YAML sequence
pub fn to_yaml(result: &PageResult) -> Result<String, ScopeError> {
    serde_yaml::to_string(&[result]).map_err(|e| ScopeError::Report(e.to_string()))
}
