use tracing::{debug, info};
use webscope_core::config::SubmitReporting;
use webscope_core::{FieldRole, FieldSet, ScopeError};

use crate::candidates::{candidates, CANONICAL_SUBMIT};
use crate::document::Document;

pub struct FieldClassifier {
    submit_reporting: SubmitReporting,
}

impl Default for FieldClassifier {
    fn default() -> Self {
        Self {
            submit_reporting: SubmitReporting::Canonical,
        }
    }
}

impl FieldClassifier {
    pub fn new(submit_reporting: SubmitReporting) -> Self {
        Self { submit_reporting }
    }

    /// Classify a single document (frames are not visited here)
    pub fn classify<D: Document>(&self, doc: &D) -> Result<FieldSet, ScopeError> {
        info!("scanning {} for login fields", doc.describe());

        let total = doc.count("input, button")?;
        info!("found {} total form elements in {}", total, doc.describe());

        let mut fields = FieldSet::default();
        for role in FieldRole::ALL {
            if let Some((selector, hits)) = self.first_match(doc, role)? {
                info!("found {} {} field(s): {}", hits, role, selector);
                fields.set(role, self.reported(role, selector));
            }
        }

        Ok(fields)
    }

    /// First candidate of the role with at least one hit
    fn first_match<D: Document>(
        &self,
        doc: &D,
        role: FieldRole,
    ) -> Result<Option<(&'static str, usize)>, ScopeError> {
        for &selector in candidates(role) {
            let hits = doc.count(selector)?;
            if hits > 0 {
                return Ok(Some((selector, hits)));
            }
        }
        debug!("no {} candidate matched in {}", role, doc.describe());
        Ok(None)
    }

    fn reported(&self, role: FieldRole, matched: &'static str) -> &'static str {
        match (role, self.submit_reporting) {
            (FieldRole::Submit, SubmitReporting::Canonical) => CANONICAL_SUBMIT,
            _ => matched,
        }
    }
}
