//! End-to-end runs of the deep pipeline over scripted capabilities.

use std::sync::Arc;
use std::time::Duration;

use radar_pipeline::{DeepPipeline, PipelineConfig, Stage, VerificationFailurePolicy};
use radar_ports::{DocumentParser, GenerationError};
use radar_schema::{
    CorrectionBatch, CorrectionTarget, Delta, Extraction, ParseMode, Recommendation, Reliability,
    Scoring, Verification,
};
use radar_store::{ArtifactKind, ArtifactStore};
use radar_test_utils::{
    correction_batch, init_tracing, sample_delta, sample_extraction, sample_scoring, sample_task,
    verification_high, verification_low, verification_medium, FailingParser, ScriptedGenerator,
    StaticParser,
};
use tempfile::TempDir;

const PAPER: &str = "2601.18491";
const TITLE: &str = "AgentDog";

fn flagged() -> Vec<CorrectionTarget> {
    vec![
        CorrectionTarget::Claim("c1".to_string()),
        CorrectionTarget::DeltaAxis("control_paradigm".to_string()),
    ]
}

/// Generator with happy-path defaults for everything except verification.
fn happy_generator() -> ScriptedGenerator {
    ScriptedGenerator::new()
        .with_default(&sample_extraction(PAPER, TITLE))
        .with_default(&sample_delta(PAPER))
        .with_default(&sample_scoring(PAPER, 5, 4, 4))
        .with_default(&correction_batch(PAPER))
}

fn pipeline(
    generator: Arc<ScriptedGenerator>,
    parsers: Vec<Arc<dyn DocumentParser>>,
    store: &ArtifactStore,
    config: PipelineConfig,
) -> DeepPipeline {
    DeepPipeline::new(generator, parsers, store.clone(), config)
}

fn open_store() -> (TempDir, ArtifactStore) {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::open(dir.path()).unwrap();
    (dir, store)
}

#[tokio::test]
async fn happy_path_persists_every_artifact() {
    init_tracing();
    let generator = Arc::new(happy_generator());
    generator.push_ok::<Verification>(&verification_high(PAPER));
    let (_guard, store) = open_store();

    let pipeline = pipeline(
        generator.clone(),
        vec![Arc::new(StaticParser::new("marker", "full text"))],
        &store,
        PipelineConfig::new(),
    );

    let state = pipeline
        .run(sample_task(PAPER, TITLE), "2026-08-24")
        .await
        .unwrap();

    assert_eq!(state.parse_mode, ParseMode::Full);
    assert_eq!(state.retry_count, 0);
    assert!(state.is_terminal());
    assert!(state.errors.is_empty());

    let slug = state.slug.as_str();
    for kind in ArtifactKind::all() {
        assert!(store.exists(slug, kind), "missing {kind}");
    }
    assert!(store.paper_exists(slug));
}

#[tokio::test]
async fn exhausted_parser_chain_degrades_to_abstract_only() {
    init_tracing();
    let generator = Arc::new(happy_generator());
    generator.push_ok::<Verification>(&verification_high(PAPER));
    let (_guard, store) = open_store();

    let pipeline = pipeline(
        generator,
        vec![
            Arc::new(FailingParser::new("marker", "service 500")),
            Arc::new(FailingParser::new("pypdf", "encrypted file")),
        ],
        &store,
        PipelineConfig::new(),
    );

    let state = pipeline
        .run(sample_task(PAPER, TITLE), "2026-08-24")
        .await
        .unwrap();

    assert_eq!(state.parse_mode, ParseMode::AbstractOnly);
    assert!(state.is_terminal(), "degraded parse still reports");

    let parse_errors: Vec<_> = state
        .errors
        .iter()
        .filter(|e| e.stage == Stage::Parse)
        .collect();
    assert_eq!(parse_errors.len(), 2);
    assert!(parse_errors[0].message.starts_with("marker:"));
    assert!(parse_errors[1].message.starts_with("pypdf:"));
}

#[tokio::test]
async fn fallback_parser_yields_partial_mode() {
    init_tracing();
    let generator = Arc::new(happy_generator());
    generator.push_ok::<Verification>(&verification_high(PAPER));
    let (_guard, store) = open_store();

    let pipeline = pipeline(
        generator,
        vec![
            Arc::new(FailingParser::new("marker", "service 500")),
            Arc::new(StaticParser::new("pypdf", "partial text")),
        ],
        &store,
        PipelineConfig::new(),
    );

    let state = pipeline
        .run(sample_task(PAPER, TITLE), "2026-08-24")
        .await
        .unwrap();

    assert_eq!(state.parse_mode, ParseMode::Partial);
    assert_eq!(state.full_text(), Some("partial text"));
}

#[tokio::test]
async fn medium_reliability_runs_exactly_one_correction() {
    init_tracing();
    let generator = Arc::new(happy_generator());
    generator.push_ok::<Verification>(&verification_medium(PAPER, flagged()));
    generator.push_ok::<Verification>(&verification_high(PAPER));
    let (_guard, store) = open_store();

    let pipeline = pipeline(
        generator.clone(),
        vec![Arc::new(StaticParser::new("marker", "full text"))],
        &store,
        PipelineConfig::new().with_max_retries(2),
    );

    let state = pipeline
        .run(sample_task(PAPER, TITLE), "2026-08-24")
        .await
        .unwrap();

    assert_eq!(state.retry_count, 1, "second verification was high");
    assert_eq!(
        state.verification.as_ref().unwrap().overall_reliability,
        Reliability::High
    );

    // The merge revised the flagged claim and left its sibling alone.
    let extraction = state.extraction.as_ref().unwrap();
    assert_eq!(extraction.claims[0].text, "claim c1 (revised)");
    assert_eq!(extraction.claims[1].text, "claim c2");

    // Delta was re-derived from the patched extraction, discarding the
    // pre-correction analysis.
    let delta = state.delta.as_ref().unwrap();
    assert_eq!(delta.core_deltas[0].old_approach, "open loop");

    // The patched extraction passes through: one extraction generation
    // despite two verify passes; delta/score/verify re-run.
    let calls = generator.calls();
    assert_eq!(calls.iter().filter(|c| *c == "Extraction").count(), 1);
    assert_eq!(calls.iter().filter(|c| *c == "Delta").count(), 2);
    assert_eq!(calls.iter().filter(|c| *c == "Scoring").count(), 2);
    assert_eq!(calls.iter().filter(|c| *c == "Verification").count(), 2);
    assert_eq!(calls.iter().filter(|c| *c == "CorrectionBatch").count(), 1);
}

#[tokio::test]
async fn persistent_low_reliability_stops_at_retry_budget() {
    init_tracing();
    let generator = Arc::new(
        happy_generator().with_default(&verification_low(PAPER, flagged())),
    );
    let (_guard, store) = open_store();

    let pipeline = pipeline(
        generator.clone(),
        vec![Arc::new(StaticParser::new("marker", "full text"))],
        &store,
        PipelineConfig::new().with_max_retries(2),
    );

    let state = pipeline
        .run(sample_task(PAPER, TITLE), "2026-08-24")
        .await
        .unwrap();

    assert_eq!(state.retry_count, 2, "budget consumed exactly");
    assert!(state.is_terminal(), "low reliability still reports");
    assert_eq!(
        state.verification.as_ref().unwrap().overall_reliability,
        Reliability::Low
    );
    assert_eq!(
        generator
            .calls()
            .iter()
            .filter(|c| *c == "CorrectionBatch")
            .count(),
        2
    );
    assert!(store.paper_exists(&state.slug));
}

#[tokio::test]
async fn total_capability_outage_still_produces_a_report() {
    init_tracing();
    let generator = Arc::new(ScriptedGenerator::new());
    generator.fail_everything("provider outage");
    let (_guard, store) = open_store();

    let pipeline = pipeline(
        generator,
        vec![Arc::new(FailingParser::new("marker", "service 500"))],
        &store,
        PipelineConfig::new(),
    );

    let state = pipeline
        .run(sample_task(PAPER, TITLE), "2026-08-24")
        .await
        .unwrap();

    assert!(state.is_terminal());
    assert!(state.extraction.as_ref().unwrap().is_degraded());
    assert!(state.delta.as_ref().unwrap().is_degraded());

    let scoring = state.scoring.as_ref().unwrap();
    assert_eq!(scoring.total(), 0);
    assert_eq!(scoring.recommendation, Recommendation::Skip);

    // Fail-open verification passes the paper through without retries.
    assert_eq!(state.retry_count, 0);
    assert_eq!(
        state.verification.as_ref().unwrap().overall_reliability,
        Reliability::High
    );
    assert!(store.paper_exists(&state.slug));
}

#[tokio::test]
async fn fail_closed_verification_engages_the_correction_loop() {
    init_tracing();
    let generator = Arc::new(happy_generator());
    generator.push::<Verification>(Err(GenerationError::Provider("verifier down".into())));
    generator.push::<Verification>(Err(GenerationError::Provider("verifier down".into())));
    generator.push::<Verification>(Err(GenerationError::Provider("verifier down".into())));
    let (_guard, store) = open_store();

    let pipeline = pipeline(
        generator.clone(),
        vec![Arc::new(StaticParser::new("marker", "full text"))],
        &store,
        PipelineConfig::new()
            .with_max_retries(2)
            .with_verification_failure_policy(VerificationFailurePolicy::FailClosed),
    );

    let state = pipeline
        .run(sample_task(PAPER, TITLE), "2026-08-24")
        .await
        .unwrap();

    // Each substitute is low with nothing flagged: the loop spins down
    // the budget without calling the corrector.
    assert_eq!(state.retry_count, 2);
    assert_eq!(
        state.verification.as_ref().unwrap().overall_reliability,
        Reliability::Low
    );
    assert_eq!(
        generator
            .calls()
            .iter()
            .filter(|c| *c == "CorrectionBatch")
            .count(),
        0
    );
    assert!(state.is_terminal());
}

#[tokio::test]
async fn schema_mismatch_degrades_like_any_other_failure() {
    init_tracing();
    let generator = Arc::new(happy_generator());
    generator.push::<Extraction>(Ok(serde_json::json!({"nonsense": true})));
    generator.push_ok::<Verification>(&verification_high(PAPER));
    let (_guard, store) = open_store();

    let pipeline = pipeline(
        generator,
        vec![Arc::new(StaticParser::new("marker", "full text"))],
        &store,
        PipelineConfig::new(),
    );

    let state = pipeline
        .run(sample_task(PAPER, TITLE), "2026-08-24")
        .await
        .unwrap();

    assert!(state.extraction.as_ref().unwrap().is_degraded());
    assert!(state
        .errors
        .iter()
        .any(|e| e.stage == Stage::Extract && e.message.contains("Extraction")));
    assert!(state.is_terminal());
}

#[tokio::test]
async fn slow_generator_times_out_and_degrades() {
    init_tracing();
    let generator = Arc::new(happy_generator().with_delay(Duration::from_millis(200)));
    let (_guard, store) = open_store();

    let pipeline = pipeline(
        generator,
        vec![Arc::new(StaticParser::new("marker", "full text"))],
        &store,
        PipelineConfig::new().with_call_timeout(Duration::from_millis(10)),
    );

    let state = pipeline
        .run(sample_task(PAPER, TITLE), "2026-08-24")
        .await
        .unwrap();

    assert!(state.extraction.as_ref().unwrap().is_degraded());
    assert!(state
        .errors
        .iter()
        .any(|e| e.message.contains("timed out")));
    assert!(state.is_terminal());
}

#[tokio::test]
async fn task_without_document_url_is_abstract_only() {
    init_tracing();
    let generator = Arc::new(happy_generator());
    generator.push_ok::<Verification>(&verification_high(PAPER));
    let (_guard, store) = open_store();

    let parser = Arc::new(StaticParser::new("marker", "never called"));
    let pipeline = pipeline(
        generator,
        vec![parser.clone()],
        &store,
        PipelineConfig::new(),
    );

    let task = radar_schema::PaperTask::new(PAPER, TITLE).with_abstract("only the abstract");
    let state = pipeline.run(task, "2026-08-24").await.unwrap();

    assert_eq!(state.parse_mode, ParseMode::AbstractOnly);
    assert_eq!(parser.call_count(), 0);
    assert!(state.is_terminal());
}

#[tokio::test]
async fn report_mentions_verdict_and_degradations() {
    init_tracing();
    let generator = Arc::new(happy_generator());
    generator.push::<Delta>(Err(GenerationError::Provider("delta provider down".into())));
    generator.push_ok::<Verification>(&verification_high(PAPER));
    let (_guard, store) = open_store();

    let pipeline = pipeline(
        generator,
        vec![Arc::new(StaticParser::new("marker", "full text"))],
        &store,
        PipelineConfig::new(),
    );

    let state = pipeline
        .run(sample_task(PAPER, TITLE), "2026-08-24")
        .await
        .unwrap();

    let report = store.load_report(&state.slug).unwrap().unwrap();
    assert!(report.starts_with("# AgentDog"));
    assert!(report.contains("## Verdict"));
    assert!(report.contains("## Degradations"));
    assert!(report.contains("delta provider down"));
}

#[tokio::test]
async fn rerun_overwrites_previous_artifacts() {
    init_tracing();
    let (_guard, store) = open_store();

    for scoring in [sample_scoring(PAPER, 2, 2, 2), sample_scoring(PAPER, 5, 4, 4)] {
        let generator = Arc::new(
            ScriptedGenerator::new()
                .with_default(&sample_extraction(PAPER, TITLE))
                .with_default(&sample_delta(PAPER))
                .with_default(&scoring)
                .with_default(&CorrectionBatch::empty(PAPER, ""))
                .with_default(&verification_high(PAPER)),
        );
        let pipeline = pipeline(
            generator,
            vec![Arc::new(StaticParser::new("marker", "full text"))],
            &store,
            PipelineConfig::new(),
        );
        pipeline
            .run(sample_task(PAPER, TITLE), "2026-08-24")
            .await
            .unwrap();
    }

    let slug = radar_schema::paper_slug(PAPER, TITLE);
    let scoring: Scoring = store.load_scoring(&slug).unwrap().unwrap();
    assert_eq!(scoring.total(), 13, "second run overwrote the first");
}
