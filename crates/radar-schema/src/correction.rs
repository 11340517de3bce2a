//! Correction payload - the patch batch the correction stage requests.
//!
//! Only flagged items appear here; the merge into extraction/delta is
//! done by the correction stage, which leaves unflagged items untouched.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Revised text for one flagged claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CorrectedClaim {
    /// Id of the claim being revised (must already exist)
    pub claim_id: String,
    pub corrected_text: String,
    pub correction_reason: String,
}

/// Revised content for one flagged delta axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CorrectedDelta {
    /// Axis being revised (must already exist)
    pub axis: String,
    pub old_approach: String,
    pub new_approach: String,
    pub why_better: String,
    pub correction_reason: String,
}

/// Correction output returned by the structured generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CorrectionBatch {
    pub paper_id: String,
    #[serde(default)]
    pub corrected_claims: Vec<CorrectedClaim>,
    #[serde(default)]
    pub corrected_deltas: Vec<CorrectedDelta>,
    /// Revised takeaway, when flagged
    #[serde(default)]
    pub corrected_takeaway: Option<String>,
    #[serde(default)]
    pub correction_summary: String,
}

impl CorrectionBatch {
    /// Batch that changes nothing
    #[must_use]
    pub fn empty(paper_id: &str, summary: &str) -> Self {
        Self {
            paper_id: paper_id.to_string(),
            corrected_claims: Vec::new(),
            corrected_deltas: Vec::new(),
            corrected_takeaway: None,
            correction_summary: summary.to_string(),
        }
    }

    /// Whether the batch carries any revision
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.corrected_claims.is_empty()
            && self.corrected_deltas.is_empty()
            && self.corrected_takeaway.is_none()
    }
}
