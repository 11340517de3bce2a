//! Markdown report rendering.
//!
//! Pure over the accumulated state: no capability calls, deterministic
//! output. Missing payloads render as explicit "unavailable" sections
//! rather than being skipped, so a degraded run is visible in the
//! artifact itself.

use std::fmt::Write as _;

use radar_schema::Claim;

use crate::state::PipelineState;

/// Render the terminal `report.md` for one paper.
#[must_use]
pub fn render_report(state: &PipelineState) -> String {
    let mut out = String::new();

    let title = &state.task.title;
    let _ = writeln!(out, "# {title}");
    let _ = writeln!(out);
    let _ = writeln!(out, "- **Paper:** {}", state.task.paper_id);
    let _ = writeln!(out, "- **Run date:** {}", state.run_date);
    let _ = writeln!(out, "- **Parse mode:** {}", state.parse_mode.as_str());
    if let Some(url) = &state.task.document_url {
        let _ = writeln!(out, "- **Document:** {url}");
    }
    if let Some(url) = &state.task.repo_url {
        let _ = writeln!(out, "- **Code:** {url}");
    }

    render_scoring(&mut out, state);
    render_takeaway(&mut out, state);
    render_extraction(&mut out, state);
    render_verification(&mut out, state);
    render_degradations(&mut out, state);

    out
}

fn render_scoring(out: &mut String, state: &PipelineState) {
    let _ = writeln!(out, "\n## Verdict");
    let Some(scoring) = &state.scoring else {
        let _ = writeln!(out, "\nScoring unavailable.");
        return;
    };

    let _ = writeln!(
        out,
        "\n**{}** ({}/15)",
        scoring.recommendation.as_str(),
        scoring.total()
    );
    let _ = writeln!(out, "\n| Axis | Score |");
    let _ = writeln!(out, "| --- | --- |");
    let _ = writeln!(out, "| Practicality | {} |", scoring.practicality);
    let _ = writeln!(out, "| Codeability | {} |", scoring.codeability);
    let _ = writeln!(out, "| Signal | {} |", scoring.signal);
    if !scoring.reasoning.is_empty() {
        let _ = writeln!(out, "\n{}", scoring.reasoning);
    }
    if !scoring.key_strength.is_empty() {
        let _ = writeln!(out, "\n**Key strength:** {}", scoring.key_strength);
    }
    if !scoring.main_concern.is_empty() {
        let _ = writeln!(out, "\n**Main concern:** {}", scoring.main_concern);
    }
}

fn render_takeaway(out: &mut String, state: &PipelineState) {
    let _ = writeln!(out, "\n## What changed");
    let Some(delta) = &state.delta else {
        let _ = writeln!(out, "\nDelta analysis unavailable.");
        return;
    };
    if delta.is_degraded() {
        let _ = writeln!(out, "\nDelta analysis degraded.");
        return;
    }

    let _ = writeln!(out, "\n> {}", delta.one_line_takeaway);

    for core in &delta.core_deltas {
        let pointer = core.evidence.to_pointer();
        let _ = writeln!(
            out,
            "\n- **{}**: {} \u{2192} {}. {} {pointer}",
            core.axis, core.old_approach, core.new_approach, core.why_better
        );
    }

    if !delta.tradeoffs.is_empty() {
        let _ = writeln!(out, "\n### Tradeoffs");
        for tradeoff in &delta.tradeoffs {
            let _ = writeln!(
                out,
                "- **{}**: gains {}, costs {}",
                tradeoff.aspect, tradeoff.benefit, tradeoff.cost
            );
        }
    }
    if !delta.when_to_use.is_empty() {
        let _ = writeln!(out, "\n**Use when:** {}", delta.when_to_use);
    }
    if !delta.when_not_to_use.is_empty() {
        let _ = writeln!(out, "\n**Avoid when:** {}", delta.when_not_to_use);
    }
}

fn render_extraction(out: &mut String, state: &PipelineState) {
    let _ = writeln!(out, "\n## Method");
    let Some(extraction) = &state.extraction else {
        let _ = writeln!(out, "\nExtraction unavailable.");
        return;
    };
    if extraction.is_degraded() {
        let reason = extraction.degraded_reason.as_deref().unwrap_or("unknown");
        let _ = writeln!(out, "\nExtraction degraded ({reason}). Abstract:");
        let _ = writeln!(out, "\n{}", extraction.problem_definition.statement);
        return;
    }

    let _ = writeln!(out, "\n**Problem:** {}", extraction.problem_definition.statement);
    if !extraction.problem_definition.structural_limitation.is_empty() {
        let _ = writeln!(
            out,
            "\n**Limitation of prior work:** {}",
            extraction.problem_definition.structural_limitation
        );
    }

    if !extraction.method_components.is_empty() {
        let _ = writeln!(out, "\n### Components");
        for component in &extraction.method_components {
            let pointer = component
                .evidence
                .first()
                .map(|e| e.to_pointer())
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "- **{}**: {} {pointer}",
                component.name, component.description
            );
        }
    }

    if !extraction.baselines.is_empty() {
        let _ = writeln!(out, "\n### Baselines");
        for baseline in &extraction.baselines {
            let _ = writeln!(out, "- **{}**: {}", baseline.name, baseline.limitation);
        }
    }

    if !extraction.claims.is_empty() {
        let _ = writeln!(out, "\n### Claims");
        for claim in &extraction.claims {
            render_claim(out, claim, state);
        }
    }
}

fn render_claim(out: &mut String, claim: &Claim, state: &PipelineState) {
    let status = state
        .verification
        .as_ref()
        .and_then(|v| v.results.iter().find(|r| r.claim_id == claim.claim_id))
        .map(|r| format!("{:?}", r.status).to_lowercase());
    let pointer = claim
        .evidence
        .first()
        .map(|e| e.to_pointer())
        .unwrap_or_default();

    match status {
        Some(status) => {
            let _ = writeln!(
                out,
                "- [{status}] {} ({}) {pointer}",
                claim.text, claim.claim_id
            );
        }
        None => {
            let _ = writeln!(out, "- {} ({}) {pointer}", claim.text, claim.claim_id);
        }
    }
}

fn render_verification(out: &mut String, state: &PipelineState) {
    let _ = writeln!(out, "\n## Reliability");
    let Some(verification) = &state.verification else {
        let _ = writeln!(out, "\nVerification unavailable.");
        return;
    };

    let _ = writeln!(
        out,
        "\n**{:?}** \u{2013} {} verified, {} unverified, {} contradicted of {} claims \
         ({} correction pass{})",
        verification.overall_reliability,
        verification.verified_count,
        verification.unverified_count,
        verification.contradicted_count,
        verification.total_claims,
        state.retry_count,
        if state.retry_count == 1 { "" } else { "es" },
    );
    if !verification.summary.is_empty() {
        let _ = writeln!(out, "\n{}", verification.summary);
    }
}

fn render_degradations(out: &mut String, state: &PipelineState) {
    if state.errors.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n## Degradations");
    let _ = writeln!(out);
    for error in &state.errors {
        let _ = writeln!(out, "- `{}`: {}", error.stage, error.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Stage;
    use radar_test_utils::{
        sample_delta, sample_extraction, sample_scoring, sample_task, verification_high,
    };

    fn populated_state() -> PipelineState {
        let mut state =
            PipelineState::new(sample_task("2601.18491", "AgentDog"), "2026-08-24", 2);
        state.extraction = Some(sample_extraction("2601.18491", "AgentDog"));
        state.delta = Some(sample_delta("2601.18491"));
        state.scoring = Some(sample_scoring("2601.18491", 5, 4, 4));
        state.verification = Some(verification_high("2601.18491"));
        state
    }

    #[test]
    fn report_carries_verdict_and_takeaway() {
        let report = render_report(&populated_state());

        assert!(report.starts_with("# AgentDog\n"));
        assert!(report.contains("**must_read** (13/15)"));
        assert!(report.contains("> Replaces open-loop agents with a watchdog loop."));
        assert!(report.contains("**Watchdog Loop**"));
        assert!(report.contains("(Evidence: p.3 \u{a7}3.1)"));
    }

    #[test]
    fn claims_annotated_with_verification_status() {
        let report = render_report(&populated_state());
        assert!(report.contains("[verified] claim c1"));
    }

    #[test]
    fn missing_payloads_render_as_unavailable() {
        let state = PipelineState::new(sample_task("2601.1", "Bare"), "2026-08-24", 2);
        let report = render_report(&state);

        assert!(report.contains("Scoring unavailable."));
        assert!(report.contains("Delta analysis unavailable."));
        assert!(report.contains("Extraction unavailable."));
        assert!(report.contains("Verification unavailable."));
    }

    #[test]
    fn degradations_section_lists_stage_errors() {
        let mut state = populated_state();
        state.record_error(Stage::Parse, "primary backend down");
        let report = render_report(&state);
        assert!(report.contains("## Degradations"));
        assert!(report.contains("- `parse`: primary backend down"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let state = populated_state();
        assert_eq!(render_report(&state), render_report(&state));
    }
}
