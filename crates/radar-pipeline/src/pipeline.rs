//! The pipeline driver.
//!
//! Owns the capability ports and walks the stage graph for one paper.
//! Stage bodies live in `stages.rs`; transitions are validated against
//! the graph on every step, and a step bound derived from the retry
//! budget guarantees termination even if the graph is ever miswired.

use std::sync::Arc;

use radar_ports::{DocumentParser, StructuredGenerator};
use radar_store::ArtifactStore;

use crate::config::PipelineConfig;
use crate::graph::{self, IllegalTransition, Stage};
use crate::state::PipelineState;
use radar_schema::PaperTask;

/// Hard pipeline failures.
///
/// Everything else degrades in-state; these abort the run for one paper.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Persist precondition not met
    #[error("cannot persist {slug}: missing {what}")]
    MissingPersistInput { slug: String, what: &'static str },

    /// Driver attempted an edge outside the graph
    #[error(transparent)]
    IllegalTransition(#[from] IllegalTransition),

    /// Driver exceeded the step bound without reaching done
    #[error("pipeline for {slug} did not terminate within {bound} steps")]
    StepBoundExceeded { slug: String, bound: usize },
}

/// The deep-analysis pipeline for a single paper.
#[derive(Clone)]
pub struct DeepPipeline {
    pub(crate) generator: Arc<dyn StructuredGenerator>,
    pub(crate) parsers: Vec<Arc<dyn DocumentParser>>,
    pub(crate) store: ArtifactStore,
    pub(crate) config: PipelineConfig,
}

impl DeepPipeline {
    /// Build a pipeline over the given capabilities.
    ///
    /// `parsers` is the document-acquisition fallback chain, tried in
    /// order; an empty chain means every paper degrades to
    /// abstract-only.
    #[must_use]
    pub fn new(
        generator: Arc<dyn StructuredGenerator>,
        parsers: Vec<Arc<dyn DocumentParser>>,
        store: ArtifactStore,
        config: PipelineConfig,
    ) -> Self {
        Self {
            generator,
            parsers,
            store,
            config,
        }
    }

    /// Maximum stage executions one run can take: the linear path plus
    /// the five stages each correction iteration replays.
    fn step_bound(&self) -> usize {
        9 + self.config.max_retries as usize * 5
    }

    /// Run one paper through the full graph.
    ///
    /// Returns the terminal state; the report is in `state.report` and
    /// all degradations in `state.errors`.
    ///
    /// # Errors
    /// Returns [`PipelineError`] only for persist preconditions or a
    /// driver bug; capability failures degrade in-state instead.
    pub async fn run(
        &self,
        task: PaperTask,
        run_date: &str,
    ) -> Result<PipelineState, PipelineError> {
        let mut state = PipelineState::new(task, run_date, self.config.max_retries);
        tracing::info!(slug = %state.slug, run_date, "pipeline start");

        let bound = self.step_bound();
        let mut stage = Stage::Parse;
        let mut steps = 0usize;

        while stage != Stage::Done {
            steps += 1;
            if steps > bound {
                return Err(PipelineError::StepBoundExceeded {
                    slug: state.slug.clone(),
                    bound,
                });
            }

            tracing::debug!(slug = %state.slug, %stage, "stage start");
            self.execute(stage, &mut state).await?;

            let next = graph::next_stage(stage, &state);
            graph::validate_transition(stage, next)?;
            stage = next;
        }

        tracing::info!(
            slug = %state.slug,
            retries = state.retry_count,
            degradations = state.errors.len(),
            "pipeline done"
        );
        Ok(state)
    }

    async fn execute(&self, stage: Stage, state: &mut PipelineState) -> Result<(), PipelineError> {
        match stage {
            Stage::Parse => self.stage_parse(state).await,
            Stage::Extract => self.stage_extract(state).await,
            Stage::Delta => self.stage_delta(state).await,
            Stage::Score => self.stage_score(state).await,
            Stage::Verify => self.stage_verify(state).await,
            Stage::Correct => self.stage_correct(state).await,
            Stage::Report => self.stage_report(state),
            Stage::Persist => return self.stage_persist(state),
            Stage::Done => {}
        }
        Ok(())
    }
}
