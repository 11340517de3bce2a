//! Downstream collaborator ports, consumed after a run settles.

use async_trait::async_trait;
use radar_schema::{Extraction, PaperTask};

/// Errors from downstream consumers
#[derive(Debug, Clone, thiserror::Error)]
pub enum DownstreamError {
    /// The collaborator failed; recorded, never fatal to the run
    #[error("downstream step failed: {0}")]
    Failed(String),
}

/// Builds the cross-paper run report from completed papers
#[async_trait]
pub trait ReportAggregator: Send + Sync {
    /// Build the aggregate report; returns its location.
    ///
    /// # Errors
    /// Returns [`DownstreamError`] on failure; the orchestrator records
    /// it and continues.
    async fn build(&self, run_date: &str, completed: &[String])
        -> Result<String, DownstreamError>;
}

/// Maintains the by-date and by-score indexes
#[async_trait]
pub trait IndexUpdater: Send + Sync {
    /// Record which papers completed on `run_date`
    async fn update_by_date(
        &self,
        run_date: &str,
        completed: &[String],
    ) -> Result<(), DownstreamError>;

    /// Record `(paper_id, total_score)` pairs
    async fn update_by_score(&self, scores: &[(String, u8)]) -> Result<(), DownstreamError>;
}

/// Optional implementation-mapping capability.
///
/// The orchestrator throttles this to at most one paper per run to bound
/// external API usage.
#[async_trait]
pub trait RepoExplorer: Send + Sync {
    /// Map the paper's methods onto its linked repository.
    ///
    /// Returns the number of methods located.
    ///
    /// # Errors
    /// Returns [`DownstreamError`] on failure.
    async fn map_implementation(
        &self,
        task: &PaperTask,
        extraction: &Extraction,
    ) -> Result<u32, DownstreamError>;

    /// Whether a mapping artifact already exists for `slug`
    async fn mapping_exists(&self, slug: &str) -> bool;
}
