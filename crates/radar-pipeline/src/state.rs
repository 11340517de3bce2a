//! Pipeline state - the accumulator threaded through one run.

use crate::graph::Stage;
use radar_schema::{
    paper_slug, Delta, Extraction, PaperTask, ParseMode, ParsedDocument, Scoring, Verification,
};

/// One recoverable degradation, annotated with the stage that hit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageError {
    pub stage: Stage,
    pub message: String,
}

/// Mutable state for one paper's run.
///
/// Exclusively owned by that run; parallel paper tasks never share one.
/// Fields populate progressively as stages execute; once `report` is
/// set the state is terminal.
#[derive(Debug, Clone)]
pub struct PipelineState {
    /// The immutable unit of work
    pub task: PaperTask,
    /// Run date (YYYY-MM-DD)
    pub run_date: String,
    /// Storage/idempotency key, fixed at construction
    pub slug: String,

    pub parsed: Option<ParsedDocument>,
    pub parse_mode: ParseMode,
    pub extraction: Option<Extraction>,
    pub delta: Option<Delta>,
    pub scoring: Option<Scoring>,
    pub verification: Option<Verification>,

    /// Correction attempts so far; never exceeds `max_retries`
    pub retry_count: u32,
    pub max_retries: u32,

    /// Terminal rendered artifact
    pub report: Option<String>,
    /// Append-only degradation log
    pub errors: Vec<StageError>,

    /// Set once correction has patched the extraction; the re-entered
    /// extract stage then passes it through instead of regenerating,
    /// while delta/score/verify re-derive from the patched data.
    pub(crate) corrected: bool,
}

impl PipelineState {
    /// Build initial state for a task
    #[must_use]
    pub fn new(task: PaperTask, run_date: impl Into<String>, max_retries: u32) -> Self {
        let slug = paper_slug(&task.paper_id, &task.title);
        Self {
            task,
            run_date: run_date.into(),
            slug,
            parsed: None,
            parse_mode: ParseMode::Full,
            extraction: None,
            delta: None,
            scoring: None,
            verification: None,
            retry_count: 0,
            max_retries,
            report: None,
            errors: Vec::new(),
            corrected: false,
        }
    }

    /// Record a recoverable degradation
    pub fn record_error(&mut self, stage: Stage, message: impl Into<String>) {
        self.errors.push(StageError {
            stage,
            message: message.into(),
        });
    }

    /// Full text recovered by the parse stage, if any
    #[must_use]
    pub fn full_text(&self) -> Option<&str> {
        self.parsed.as_ref().map(|p| p.text.as_str())
    }

    /// Whether a terminal report has been produced
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.report.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_derives_slug() {
        let task = PaperTask::new("2601.1", "Some Title");
        let state = PipelineState::new(task, "2026-08-24", 2);
        assert_eq!(state.slug, "2601.1-some-title");
        assert_eq!(state.retry_count, 0);
        assert!(!state.is_terminal());
    }

    #[test]
    fn errors_are_append_only() {
        let mut state = PipelineState::new(PaperTask::new("1", "t"), "2026-08-24", 2);
        state.record_error(Stage::Parse, "primary down");
        state.record_error(Stage::Extract, "provider down");
        assert_eq!(state.errors.len(), 2);
        assert_eq!(state.errors[0].stage, Stage::Parse);
    }
}
