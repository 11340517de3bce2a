//! Run options and the aggregated run summary.

use std::collections::BTreeMap;

use radar_schema::PaperTask;

/// Options for one orchestrator invocation.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Run date (YYYY-MM-DD), used for candidate selection and indexing
    pub run_date: String,
    /// Re-run papers whose terminal report already exists
    pub force_rerun: bool,
    /// Bypass the upstream selector with a fixed candidate list
    pub candidates: Option<Vec<PaperTask>>,
}

impl RunOptions {
    /// Options for an explicit run date
    #[must_use]
    pub fn new(run_date: impl Into<String>) -> Self {
        Self {
            run_date: run_date.into(),
            force_rerun: false,
            candidates: None,
        }
    }

    /// Options for today's date (UTC)
    #[must_use]
    pub fn today() -> Self {
        Self::new(chrono::Utc::now().format("%Y-%m-%d").to_string())
    }

    /// Re-run already-completed papers
    #[must_use]
    pub fn with_force_rerun(mut self, force: bool) -> Self {
        self.force_rerun = force;
        self
    }

    /// Use a fixed candidate list instead of the upstream selector
    #[must_use]
    pub fn with_candidates(mut self, candidates: Vec<PaperTask>) -> Self {
        self.candidates = Some(candidates);
        self
    }
}

/// Aggregated outcome of one orchestrator invocation.
///
/// Not persisted itself; its effects (artifacts, indexes, the aggregate
/// report) are what survive the run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Unique id for this invocation
    pub run_id: String,
    pub run_date: String,
    /// Paper ids selected upstream
    pub candidates: Vec<String>,
    /// Slugs with a terminal report, skipped-as-done included
    pub completed: Vec<String>,
    /// paper_id -> error for runs that did not reach a report
    pub failed: BTreeMap<String, String>,
    /// Location of the aggregate report, when one was built
    pub report_location: Option<String>,
    /// Papers mapped onto their repository this run (at most one)
    pub repos_mapped: u32,
}

impl RunSummary {
    /// Whether every candidate reached a terminal report
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_builder() {
        let options = RunOptions::new("2026-08-24")
            .with_force_rerun(true)
            .with_candidates(vec![PaperTask::new("1", "t")]);
        assert!(options.force_rerun);
        assert_eq!(options.candidates.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn today_is_iso_formatted() {
        let options = RunOptions::today();
        assert_eq!(options.run_date.len(), 10);
        assert_eq!(&options.run_date[4..5], "-");
    }

    #[test]
    fn clean_summary_has_no_failures() {
        let mut summary = RunSummary::default();
        assert!(summary.is_clean());
        summary.failed.insert("1".to_string(), "boom".to_string());
        assert!(!summary.is_clean());
    }
}
