//! The parallel multi-paper scheduler.
//!
//! Selects candidates, skips papers whose terminal report already
//! exists, fans the remainder out as independent tokio tasks, and
//! settles them all before aggregating. A paper failure becomes a
//! `failed` entry; it never aborts sibling tasks or the run.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use ulid::Ulid;

use radar_pipeline::DeepPipeline;
use radar_ports::{
    CandidateSelector, IndexUpdater, RepoExplorer, ReportAggregator, SelectionError,
};
use radar_schema::PaperTask;
use radar_store::{ArtifactStore, StoreError};

use crate::types::{RunOptions, RunSummary};

/// Top-level orchestrator failures.
///
/// Partial failure is not an error; only a total inability to obtain
/// candidates or an unreachable store surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// Upstream candidate selection failed
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Store infrastructure fault
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Construction-time orchestrator settings.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Run the repository-mapping sub-stage when an explorer is wired
    pub explore_repos: bool,
}

impl OrchestratorConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the repository-mapping sub-stage
    #[must_use]
    pub fn with_explore_repos(mut self, explore: bool) -> Self {
        self.explore_repos = explore;
        self
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            explore_repos: true,
        }
    }
}

/// Drives one run: selection, fan-out, aggregation, downstream triggers.
pub struct Orchestrator {
    pipeline: DeepPipeline,
    selector: Arc<dyn CandidateSelector>,
    store: ArtifactStore,
    config: OrchestratorConfig,
    aggregator: Option<Arc<dyn ReportAggregator>>,
    index: Option<Arc<dyn IndexUpdater>>,
    explorer: Option<Arc<dyn RepoExplorer>>,
}

impl Orchestrator {
    /// Build an orchestrator over the pipeline and its store.
    #[must_use]
    pub fn new(
        pipeline: DeepPipeline,
        selector: Arc<dyn CandidateSelector>,
        store: ArtifactStore,
    ) -> Self {
        Self {
            pipeline,
            selector,
            store,
            config: OrchestratorConfig::default(),
            aggregator: None,
            index: None,
            explorer: None,
        }
    }

    /// With construction-time settings
    #[must_use]
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Wire the aggregate-report collaborator
    #[must_use]
    pub fn with_aggregator(mut self, aggregator: Arc<dyn ReportAggregator>) -> Self {
        self.aggregator = Some(aggregator);
        self
    }

    /// Wire the index-update collaborator
    #[must_use]
    pub fn with_index(mut self, index: Arc<dyn IndexUpdater>) -> Self {
        self.index = Some(index);
        self
    }

    /// Wire the repository-mapping collaborator
    #[must_use]
    pub fn with_explorer(mut self, explorer: Arc<dyn RepoExplorer>) -> Self {
        self.explorer = Some(explorer);
        self
    }

    /// Execute one run end to end.
    ///
    /// # Errors
    /// Returns [`OrchestratorError`] when candidate selection fails;
    /// per-paper failures are aggregated into the summary instead.
    pub async fn run(&self, options: RunOptions) -> Result<RunSummary, OrchestratorError> {
        let run_id = Ulid::new().to_string();
        let run_date = options.run_date.clone();

        let candidates = match options.candidates {
            Some(candidates) => candidates,
            None => self.selector.select(&run_date).await?,
        };
        tracing::info!(run_id, run_date, candidates = candidates.len(), "run start");

        let mut summary = RunSummary {
            run_id,
            run_date: run_date.clone(),
            candidates: candidates.iter().map(|t| t.paper_id.clone()).collect(),
            ..RunSummary::default()
        };

        // Idempotency split: a slug with a terminal report counts as
        // completed without spending any capability calls.
        let mut to_run = Vec::new();
        for task in &candidates {
            let slug = task.slug();
            if !options.force_rerun && self.store.paper_exists(&slug) {
                tracing::info!(slug, "report exists, skipping");
                summary.completed.push(slug);
            } else {
                to_run.push(task.clone());
            }
        }

        self.fan_out(to_run, &run_date, &mut summary).await;

        summary.completed.sort();
        summary.completed.dedup();

        if summary.completed.is_empty() {
            tracing::warn!(run_id = summary.run_id, "no papers completed, downstream skipped");
        } else {
            self.run_downstream(&candidates, &mut summary).await;
        }

        tracing::info!(
            run_id = summary.run_id,
            completed = summary.completed.len(),
            failed = summary.failed.len(),
            "run done"
        );
        Ok(summary)
    }

    /// Launch the pipeline for each task and settle them all.
    ///
    /// Gather-all: a stuck or failed sibling never cancels the rest.
    async fn fan_out(&self, tasks: Vec<PaperTask>, run_date: &str, summary: &mut RunSummary) {
        let mut join_set = JoinSet::new();
        // Keyed by task id so the panic path can name the paper
        let mut by_task_id = HashMap::new();

        for task in tasks {
            let pipeline = self.pipeline.clone();
            let run_date = run_date.to_string();
            let paper_id = task.paper_id.clone();
            let id_for_panics = paper_id.clone();
            let handle = join_set.spawn(async move {
                let result = pipeline.run(task, &run_date).await;
                (paper_id, result)
            });
            by_task_id.insert(handle.id(), id_for_panics);
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((paper_id, Ok(state))) => {
                    if state.is_terminal() {
                        summary.completed.push(state.slug);
                    } else {
                        summary
                            .failed
                            .insert(paper_id, "pipeline ended without a report".to_string());
                    }
                }
                Ok((paper_id, Err(err))) => {
                    tracing::warn!(paper_id, error = %err, "paper failed");
                    summary.failed.insert(paper_id, err.to_string());
                }
                Err(join_err) => {
                    tracing::error!(error = %join_err, "paper task panicked");
                    let paper_id = by_task_id
                        .get(&join_err.id())
                        .cloned()
                        .unwrap_or_else(|| join_err.id().to_string());
                    summary
                        .failed
                        .insert(paper_id, format!("task panicked: {join_err}"));
                }
            }
        }
    }

    /// Trigger the aggregate report, index updates, and the throttled
    /// repository mapping. All best-effort: failures are logged, never
    /// propagated.
    async fn run_downstream(&self, candidates: &[PaperTask], summary: &mut RunSummary) {
        if let Some(aggregator) = &self.aggregator {
            match aggregator.build(&summary.run_date, &summary.completed).await {
                Ok(location) => {
                    tracing::info!(location, "aggregate report built");
                    summary.report_location = Some(location);
                }
                Err(err) => tracing::warn!(error = %err, "aggregate report failed"),
            }
        }

        if let Some(index) = &self.index {
            if let Err(err) = index
                .update_by_date(&summary.run_date, &summary.completed)
                .await
            {
                tracing::warn!(error = %err, "by-date index update failed");
            }

            let mut scores = Vec::new();
            for slug in &summary.completed {
                match self.store.paper_metadata(slug) {
                    Ok(Some(meta)) => {
                        if let Some(score) = meta.score {
                            scores.push((slug.clone(), score));
                        }
                    }
                    Ok(None) => {}
                    Err(err) => tracing::warn!(slug, error = %err, "metadata load failed"),
                }
            }
            if let Err(err) = index.update_by_score(&scores).await {
                tracing::warn!(error = %err, "by-score index update failed");
            }
        }

        if self.config.explore_repos {
            if let Some(explorer) = &self.explorer {
                self.map_one_repo(explorer.as_ref(), candidates, summary)
                    .await;
            }
        }
    }

    /// Map at most one completed paper onto its linked repository.
    ///
    /// The single-item throttle bounds external API usage per run; one
    /// attempt, successful or not, consumes the slot.
    async fn map_one_repo(
        &self,
        explorer: &dyn RepoExplorer,
        candidates: &[PaperTask],
        summary: &mut RunSummary,
    ) {
        for task in candidates {
            if task.repo_url.is_none() {
                continue;
            }
            let slug = task.slug();
            if !summary.completed.contains(&slug) {
                continue;
            }
            if explorer.mapping_exists(&slug).await {
                tracing::debug!(slug, "repo mapping exists, skipping");
                continue;
            }

            let extraction = match self.store.load_extraction(&slug) {
                Ok(Some(extraction)) => extraction,
                Ok(None) => {
                    tracing::warn!(slug, "no extraction on disk, skipping repo mapping");
                    continue;
                }
                Err(err) => {
                    tracing::warn!(slug, error = %err, "extraction load failed");
                    continue;
                }
            };

            match explorer.map_implementation(task, &extraction).await {
                Ok(methods) => {
                    tracing::info!(slug, methods, "repository mapped");
                    summary.repos_mapped = 1;
                }
                Err(err) => tracing::warn!(slug, error = %err, "repo mapping failed"),
            }
            return;
        }
    }
}
