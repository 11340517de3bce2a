//! Stage bodies.
//!
//! Every stage except persist is total: a capability failure is
//! recorded on the state and substituted with a degraded payload, so
//! downstream stages never see a missing input.

use radar_ports::{generate_structured, GenerationError, ParseError};
use radar_schema::{
    CorrectionBatch, CorrectionTarget, Delta, Extraction, ParseMode, Scoring, Verification,
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::config::VerificationFailurePolicy;
use crate::graph::Stage;
use crate::pipeline::{DeepPipeline, PipelineError};
use crate::prompts;
use crate::report::render_report;
use crate::state::PipelineState;

impl DeepPipeline {
    /// Structured generation with the configured time bound applied.
    async fn generate<T>(&self, prompt: String, system: &str) -> Result<T, GenerationError>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let duration_secs = self.config.call_timeout.as_secs();
        let call = generate_structured::<T>(self.generator.as_ref(), prompt, Some(system));
        match tokio::time::timeout(self.config.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout { duration_secs }),
        }
    }

    /// Walk the parser fallback chain.
    ///
    /// The first backend that succeeds wins: index zero yields a full
    /// parse, any later backend a partial one. An exhausted chain (or a
    /// task with no document URL) degrades to abstract-only - this stage
    /// cannot fail.
    pub(crate) async fn stage_parse(&self, state: &mut PipelineState) {
        let Some(url) = state.task.document_url.clone() else {
            state.parse_mode = ParseMode::AbstractOnly;
            state.record_error(Stage::Parse, "no document url on task");
            tracing::info!(slug = %state.slug, "no document url, abstract-only");
            return;
        };

        let duration_secs = self.config.call_timeout.as_secs();
        for (index, parser) in self.parsers.iter().enumerate() {
            let call = parser.parse(&url, &state.task.paper_id);
            let result = match tokio::time::timeout(self.config.call_timeout, call).await {
                Ok(result) => result,
                Err(_) => Err(ParseError::Timeout { duration_secs }),
            };

            match result {
                Ok(parsed) => {
                    state.parse_mode = if index == 0 {
                        ParseMode::Full
                    } else {
                        ParseMode::Partial
                    };
                    tracing::info!(
                        slug = %state.slug,
                        backend = parser.name(),
                        mode = state.parse_mode.as_str(),
                        chars = parsed.text.len(),
                        "document parsed"
                    );
                    state.parsed = Some(parsed);
                    return;
                }
                Err(err) => {
                    tracing::warn!(
                        slug = %state.slug,
                        backend = parser.name(),
                        error = %err,
                        "parse backend failed, falling through"
                    );
                    state.record_error(Stage::Parse, format!("{}: {err}", parser.name()));
                }
            }
        }

        state.parse_mode = ParseMode::AbstractOnly;
        tracing::warn!(slug = %state.slug, "parser chain exhausted, abstract-only");
    }

    /// Extract structured information, or substitute a placeholder.
    ///
    /// On correction re-entry the patched extraction passes through
    /// unchanged; regenerating it would discard the merge.
    pub(crate) async fn stage_extract(&self, state: &mut PipelineState) {
        if state.corrected {
            if let Some(extraction) = &state.extraction {
                tracing::info!(
                    slug = %state.slug,
                    claims = extraction.total_claims(),
                    "corrected extraction passed through"
                );
                return;
            }
        }

        let prompt = prompts::extraction_prompt(
            &state.task.paper_id,
            &state.task.title,
            &state.task.abstract_text,
            state.full_text(),
        );

        let extraction = match self
            .generate::<Extraction>(prompt, prompts::EXTRACTION_SYSTEM)
            .await
        {
            Ok(mut extraction) => {
                extraction.paper_id = state.task.paper_id.clone();
                extraction.title = state.task.title.clone();
                extraction.mode = state.parse_mode;
                match extraction.validate() {
                    Ok(()) => extraction,
                    Err(err) => {
                        state.record_error(Stage::Extract, err.to_string());
                        Extraction::placeholder(
                            &state.task.paper_id,
                            &state.task.title,
                            &state.task.abstract_text,
                            &err.to_string(),
                        )
                    }
                }
            }
            Err(err) => {
                tracing::warn!(slug = %state.slug, error = %err, "extraction degraded");
                state.record_error(Stage::Extract, err.to_string());
                Extraction::placeholder(
                    &state.task.paper_id,
                    &state.task.title,
                    &state.task.abstract_text,
                    &err.to_string(),
                )
            }
        };

        tracing::info!(
            slug = %state.slug,
            claims = extraction.total_claims(),
            components = extraction.method_components.len(),
            degraded = extraction.is_degraded(),
            "extraction ready"
        );
        state.extraction = Some(extraction);
    }

    /// Derive the structural delta, or substitute a placeholder.
    ///
    /// Always regenerates, including on correction re-entry: the loop
    /// re-derives delta/score/verify from the patched extraction, so a
    /// stale delta never outlives the extraction it described.
    pub(crate) async fn stage_delta(&self, state: &mut PipelineState) {
        let Some(extraction) = &state.extraction else {
            state.record_error(Stage::Delta, "no extraction available");
            state.delta = Some(Delta::placeholder(&state.task.paper_id, "no extraction"));
            return;
        };

        let prompt = prompts::delta_prompt(extraction);
        let delta = match self.generate::<Delta>(prompt, prompts::DELTA_SYSTEM).await {
            Ok(mut delta) => {
                delta.paper_id = state.task.paper_id.clone();
                match delta.validate() {
                    Ok(()) => delta,
                    Err(err) => {
                        state.record_error(Stage::Delta, err.to_string());
                        Delta::placeholder(&state.task.paper_id, &err.to_string())
                    }
                }
            }
            Err(err) => {
                tracing::warn!(slug = %state.slug, error = %err, "delta degraded");
                state.record_error(Stage::Delta, err.to_string());
                Delta::placeholder(&state.task.paper_id, &err.to_string())
            }
        };

        state.delta = Some(delta);
    }

    /// Score the paper, or substitute a zero score.
    pub(crate) async fn stage_score(&self, state: &mut PipelineState) {
        let (Some(extraction), Some(delta)) = (&state.extraction, &state.delta) else {
            state.record_error(Stage::Score, "no extraction/delta available");
            state.scoring = Some(Scoring::zero(&state.task.paper_id, "no analysis to score"));
            return;
        };

        let prompt = prompts::scoring_prompt(extraction, delta);
        let scoring = match self
            .generate::<Scoring>(prompt, prompts::SCORING_SYSTEM)
            .await
        {
            Ok(mut scoring) => {
                scoring.paper_id = state.task.paper_id.clone();
                scoring.normalize()
            }
            Err(err) => {
                tracing::warn!(slug = %state.slug, error = %err, "scoring degraded to zero");
                state.record_error(Stage::Score, err.to_string());
                Scoring::zero(&state.task.paper_id, &err.to_string())
            }
        };

        tracing::info!(
            slug = %state.slug,
            total = scoring.total(),
            recommendation = scoring.recommendation.as_str(),
            "paper scored"
        );
        state.scoring = Some(scoring);
    }

    /// Verify claims against the source, or substitute per policy.
    pub(crate) async fn stage_verify(&self, state: &mut PipelineState) {
        let (Some(extraction), Some(delta)) = (&state.extraction, &state.delta) else {
            state.record_error(Stage::Verify, "no extraction/delta available");
            state.verification = Some(Verification::fail_open(
                &state.task.paper_id,
                "no analysis to verify",
            ));
            return;
        };

        let prompt = prompts::verification_prompt(
            extraction,
            delta,
            &state.task.abstract_text,
            state.full_text(),
        );

        let verification = match self
            .generate::<Verification>(prompt, prompts::VERIFICATION_SYSTEM)
            .await
        {
            Ok(mut verification) => {
                verification.paper_id = state.task.paper_id.clone();
                verification.reclassify()
            }
            Err(err) => {
                state.record_error(Stage::Verify, err.to_string());
                match self.config.verification_failure_policy {
                    VerificationFailurePolicy::FailOpen => {
                        tracing::warn!(
                            slug = %state.slug,
                            error = %err,
                            "VERIFICATION UNAVAILABLE - passing paper through unverified"
                        );
                        Verification::fail_open(&state.task.paper_id, &err.to_string())
                    }
                    VerificationFailurePolicy::FailClosed => {
                        tracing::warn!(
                            slug = %state.slug,
                            error = %err,
                            "verification unavailable, holding paper for correction"
                        );
                        Verification::fail_closed(&state.task.paper_id, &err.to_string())
                    }
                }
            }
        };

        tracing::info!(
            slug = %state.slug,
            verified = verification.verified_count,
            contradicted = verification.contradicted_count,
            reliability = ?verification.overall_reliability,
            "verification ready"
        );
        state.verification = Some(verification);
    }

    /// Run one correction attempt and merge the flagged revisions.
    ///
    /// The retry counter increments on entry, so a failed correction
    /// call still consumes budget. Unflagged items are never touched;
    /// on any failure the originals stand.
    pub(crate) async fn stage_correct(&self, state: &mut PipelineState) {
        state.retry_count += 1;
        state.corrected = true;

        let Some(verification) = state.verification.clone() else {
            state.record_error(Stage::Correct, "no verification to correct against");
            return;
        };
        if !verification.needs_correction() {
            tracing::info!(
                slug = %state.slug,
                retry = state.retry_count,
                "reliability below high but nothing flagged, keeping analysis"
            );
            return;
        }
        let (Some(extraction), Some(delta)) = (&state.extraction, &state.delta) else {
            state.record_error(Stage::Correct, "no extraction/delta to correct");
            return;
        };

        let prompt =
            prompts::correction_prompt(extraction, delta, &verification, state.full_text());

        match self
            .generate::<CorrectionBatch>(prompt, prompts::CORRECTION_SYSTEM)
            .await
        {
            Ok(batch) => {
                let applied = apply_corrections(
                    state.extraction.as_mut(),
                    state.delta.as_mut(),
                    &verification,
                    &batch,
                );
                tracing::info!(
                    slug = %state.slug,
                    retry = state.retry_count,
                    flagged = verification.corrections_needed.len(),
                    applied,
                    "corrections merged"
                );
            }
            Err(err) => {
                tracing::warn!(
                    slug = %state.slug,
                    retry = state.retry_count,
                    error = %err,
                    "correction failed, keeping original analysis"
                );
                state.record_error(Stage::Correct, err.to_string());
            }
        }
    }

    /// Render the terminal report. Pure over the accumulated state.
    pub(crate) fn stage_report(&self, state: &mut PipelineState) {
        state.report = Some(render_report(state));
    }

    /// Persist every artifact under the paper's slug.
    ///
    /// The only hard preconditions are a slug and an extraction; each
    /// artifact then saves independently so one bad write never drops
    /// the rest.
    pub(crate) fn stage_persist(&self, state: &mut PipelineState) -> Result<(), PipelineError> {
        if state.slug.is_empty() {
            return Err(PipelineError::MissingPersistInput {
                slug: state.task.paper_id.clone(),
                what: "slug",
            });
        }
        let Some(extraction) = &state.extraction else {
            return Err(PipelineError::MissingPersistInput {
                slug: state.slug.clone(),
                what: "extraction",
            });
        };

        let slug = state.slug.clone();
        let mut failures = Vec::new();

        if let Err(err) = self.store.save_extraction(&slug, extraction) {
            failures.push(format!("extraction: {err}"));
        }
        if let Some(delta) = &state.delta {
            if let Err(err) = self.store.save_delta(&slug, delta) {
                failures.push(format!("delta: {err}"));
            }
        }
        if let Some(scoring) = &state.scoring {
            if let Err(err) = self.store.save_scoring(&slug, scoring) {
                failures.push(format!("scoring: {err}"));
            }
        }
        if let Some(verification) = &state.verification {
            if let Err(err) = self.store.save_verification(&slug, verification) {
                failures.push(format!("verification: {err}"));
            }
        }
        if let Some(report) = &state.report {
            if let Err(err) = self.store.save_report(&slug, report) {
                failures.push(format!("report: {err}"));
            }
        }

        for failure in failures {
            tracing::warn!(slug = %state.slug, %failure, "artifact save failed");
            state.record_error(Stage::Persist, failure);
        }
        Ok(())
    }
}

/// Merge a correction batch into the analysis, honoring the flag list.
///
/// Only items named in `verification.corrections_needed` are eligible;
/// anything else in the batch is discarded. Returns the number of
/// revisions applied.
pub(crate) fn apply_corrections(
    extraction: Option<&mut Extraction>,
    delta: Option<&mut Delta>,
    verification: &Verification,
    batch: &CorrectionBatch,
) -> usize {
    let mut applied = 0;

    let flagged_claims: Vec<&str> = verification
        .corrections_needed
        .iter()
        .filter_map(|t| match t {
            CorrectionTarget::Claim(id) => Some(id.as_str()),
            _ => None,
        })
        .collect();
    let flagged_axes: Vec<&str> = verification
        .corrections_needed
        .iter()
        .filter_map(|t| match t {
            CorrectionTarget::DeltaAxis(axis) => Some(axis.as_str()),
            _ => None,
        })
        .collect();
    let takeaway_flagged = verification
        .corrections_needed
        .iter()
        .any(|t| matches!(t, CorrectionTarget::Takeaway));

    if let Some(extraction) = extraction {
        for corrected in &batch.corrected_claims {
            if !flagged_claims.contains(&corrected.claim_id.as_str()) {
                continue;
            }
            if let Some(claim) = extraction
                .claims
                .iter_mut()
                .find(|c| c.claim_id == corrected.claim_id)
            {
                claim.text = corrected.corrected_text.clone();
                applied += 1;
            }
        }
    }

    if let Some(delta) = delta {
        for corrected in &batch.corrected_deltas {
            if !flagged_axes.contains(&corrected.axis.as_str()) {
                continue;
            }
            if let Some(core) = delta
                .core_deltas
                .iter_mut()
                .find(|d| d.axis == corrected.axis)
            {
                core.old_approach = corrected.old_approach.clone();
                core.new_approach = corrected.new_approach.clone();
                core.why_better = corrected.why_better.clone();
                applied += 1;
            }
        }

        if takeaway_flagged {
            if let Some(takeaway) = &batch.corrected_takeaway {
                delta.one_line_takeaway = takeaway.clone();
                applied += 1;
            }
        }
    }

    applied
}
