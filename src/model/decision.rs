//! The outcome of a policy evaluation.

use serde::{Deserialize, Serialize};

/// Whether an attachment may be viewed and/or saved.
///
/// Created fresh by [`crate::policy::evaluate`]; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// The attachment may be opened in an external handler.
    pub allow_view: bool,

    /// The attachment may be written to device storage.
    pub allow_save: bool,

    /// Content type the MIME rules were checked against (declared or inferred).
    pub effective_content_type: String,
}

impl EvaluationResult {
    /// An attachment is eligible for download if it can be viewed or saved (or both).
    pub fn eligible_for_download(&self) -> bool {
        self.allow_view || self.allow_save
    }
}
