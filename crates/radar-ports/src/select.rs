//! Upstream candidate-selection port.

use async_trait::async_trait;
use radar_schema::PaperTask;

/// Errors from the candidate feed
#[derive(Debug, Clone, thiserror::Error)]
pub enum SelectionError {
    /// The upstream selection stage failed entirely
    #[error("candidate selection failed: {0}")]
    Upstream(String),
}

/// Prioritized candidate feed for one run date.
///
/// The filtering/ranking behind this is out of scope; the orchestrator
/// only consumes the resulting task list.
#[async_trait]
pub trait CandidateSelector: Send + Sync {
    /// Select candidate papers for `run_date` (YYYY-MM-DD).
    ///
    /// An empty list is a valid result (quiet day, not an error).
    ///
    /// # Errors
    /// Returns [`SelectionError`] only on total upstream failure.
    async fn select(&self, run_date: &str) -> Result<Vec<PaperTask>, SelectionError>;
}
