//! Delta payload - structural-change summary relative to prior work.

use crate::extraction::Evidence;
use crate::PayloadError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Minimum number of core deltas a valid payload carries
pub const MIN_CORE_DELTAS: usize = 1;

/// One structural change along a named axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CoreDelta {
    /// Axis of change (e.g. `control_paradigm`, `memory_structure`)
    pub axis: String,
    pub old_approach: String,
    pub new_approach: String,
    pub why_better: String,
    #[serde(default)]
    pub evidence: Evidence,
}

/// A benefit/cost tradeoff the paper acknowledges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Tradeoff {
    /// Aspect traded (e.g. latency, accuracy, cost)
    pub aspect: String,
    pub benefit: String,
    pub cost: String,
    #[serde(default)]
    pub when_acceptable: Option<String>,
    #[serde(default)]
    pub evidence: Evidence,
}

/// Delta output - the `delta.json` artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Delta {
    pub paper_id: String,
    /// Single-sentence takeaway in the form
    /// "solves [limitation A] of [method X] by introducing [change B]"
    pub one_line_takeaway: String,
    /// Core structural changes, at least [`MIN_CORE_DELTAS`]
    #[serde(default)]
    pub core_deltas: Vec<CoreDelta>,
    #[serde(default)]
    pub tradeoffs: Vec<Tradeoff>,
    #[serde(default)]
    pub when_to_use: String,
    #[serde(default)]
    pub when_not_to_use: String,
    /// Set when the generator failed and a placeholder was substituted
    #[serde(default)]
    pub degraded_reason: Option<String>,
}

impl Delta {
    /// Degraded placeholder used when structured generation fails
    #[must_use]
    pub fn placeholder(paper_id: &str, reason: &str) -> Self {
        Self {
            paper_id: paper_id.to_string(),
            one_line_takeaway: String::new(),
            core_deltas: Vec::new(),
            tradeoffs: Vec::new(),
            when_to_use: String::new(),
            when_not_to_use: String::new(),
            degraded_reason: Some(reason.to_string()),
        }
    }

    /// Whether this delta is a degraded placeholder
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded_reason.is_some()
    }

    /// Most significant delta, if any
    #[must_use]
    pub fn primary_delta(&self) -> Option<&CoreDelta> {
        self.core_deltas.first()
    }

    /// Validate structural invariants of a generated payload
    pub fn validate(&self) -> Result<(), PayloadError> {
        if self.is_degraded() {
            return Ok(());
        }
        if self.core_deltas.len() < MIN_CORE_DELTAS {
            return Err(PayloadError::Invariant(
                "delta needs at least one core delta".to_string(),
            ));
        }
        if self.one_line_takeaway.trim().is_empty() {
            return Err(PayloadError::Invariant(
                "delta needs a one-line takeaway".to_string(),
            ));
        }
        Ok(())
    }
}
