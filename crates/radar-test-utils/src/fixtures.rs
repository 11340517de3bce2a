//! Payload fixture builders.

use radar_schema::{
    Baseline, Claim, ClaimStatus, ClaimType, ClaimVerification, ComponentRole, CoreDelta,
    CorrectedClaim, CorrectedDelta, CorrectionBatch, CorrectionTarget, Delta, Evidence,
    Extraction, MethodComponent, PaperTask, ProblemDefinition, Recommendation, Reliability,
    Scoring, Verification,
};

pub fn sample_task(paper_id: &str, title: &str) -> PaperTask {
    PaperTask::new(paper_id, title)
        .with_abstract(format!("Abstract of {title}."))
        .with_document_url(format!("https://papers.example.org/{paper_id}.pdf"))
}

fn evidence(page: u32, section: &str) -> Evidence {
    Evidence {
        page: Some(page),
        section: Some(section.to_string()),
        quote: None,
        kind: Default::default(),
    }
}

fn component(name: &str, role: ComponentRole) -> MethodComponent {
    MethodComponent {
        name: name.to_string(),
        description: format!("{name}: how it works."),
        inputs: vec!["input".to_string()],
        outputs: vec!["output".to_string()],
        implementation_hint: None,
        role: Some(role),
        evidence: vec![evidence(3, "3.1")],
    }
}

fn claim(id: &str, claim_type: ClaimType) -> Claim {
    Claim {
        claim_id: id.to_string(),
        text: format!("claim {id}"),
        claim_type,
        confidence: 0.9,
        evidence: vec![evidence(5, "4")],
    }
}

/// A valid extraction with two method components and two claims.
pub fn sample_extraction(paper_id: &str, title: &str) -> Extraction {
    Extraction {
        paper_id: paper_id.to_string(),
        title: title.to_string(),
        problem_definition: ProblemDefinition {
            statement: "Agents drift without supervision.".to_string(),
            baseline_methods: vec!["ReAct".to_string()],
            structural_limitation: "No feedback channel.".to_string(),
            evidence: vec![evidence(1, "1")],
        },
        baselines: vec![Baseline {
            name: "ReAct".to_string(),
            description: "Reason-act interleaving.".to_string(),
            limitation: "No self-correction.".to_string(),
            evidence: vec![evidence(2, "2")],
        }],
        method_components: vec![
            component("Watchdog Loop", ComponentRole::Novel),
            component("Trace Buffer", ComponentRole::Adapted),
        ],
        benchmarks: vec![],
        claims: vec![claim("c1", ClaimType::Method), claim("c2", ClaimType::Result)],
        mode: Default::default(),
        degraded_reason: None,
    }
}

/// A valid delta with one core delta.
pub fn sample_delta(paper_id: &str) -> Delta {
    Delta {
        paper_id: paper_id.to_string(),
        one_line_takeaway: "Replaces open-loop agents with a watchdog loop.".to_string(),
        core_deltas: vec![CoreDelta {
            axis: "control_paradigm".to_string(),
            old_approach: "open loop".to_string(),
            new_approach: "watchdog loop".to_string(),
            why_better: "bounded drift".to_string(),
            evidence: evidence(4, "3"),
        }],
        tradeoffs: vec![],
        when_to_use: "long-horizon tasks".to_string(),
        when_not_to_use: "single-shot calls".to_string(),
        degraded_reason: None,
    }
}

/// A scoring with the given axis values (recommendation left to the
/// pipeline's normalization).
pub fn sample_scoring(paper_id: &str, practicality: u8, codeability: u8, signal: u8) -> Scoring {
    Scoring {
        paper_id: paper_id.to_string(),
        practicality,
        codeability,
        signal,
        recommendation: Recommendation::from_total(practicality + codeability + signal),
        reasoning: "fixture".to_string(),
        key_strength: "simple".to_string(),
        main_concern: String::new(),
    }
}

fn verification(
    paper_id: &str,
    verified: u32,
    unverified: u32,
    contradicted: u32,
    corrections: Vec<CorrectionTarget>,
) -> Verification {
    let total = verified + unverified + contradicted;
    Verification {
        paper_id: paper_id.to_string(),
        total_claims: total,
        verified_count: verified,
        unverified_count: unverified,
        contradicted_count: contradicted,
        overall_reliability: Reliability::classify(verified, contradicted, total),
        results: vec![ClaimVerification {
            claim_id: "c1".to_string(),
            claim_text: "claim c1".to_string(),
            status: if contradicted > 0 {
                ClaimStatus::Contradicted
            } else {
                ClaimStatus::Verified
            },
            confidence: 0.8,
            evidence_found: None,
            notes: "fixture".to_string(),
            correction_hint: (contradicted > 0).then(|| "restate against §3".to_string()),
        }],
        summary: "fixture verification".to_string(),
        corrections_needed: corrections,
    }
}

/// Verification classifying as high reliability.
pub fn verification_high(paper_id: &str) -> Verification {
    verification(paper_id, 10, 0, 0, vec![])
}

/// Verification classifying as medium reliability with correction targets.
pub fn verification_medium(paper_id: &str, corrections: Vec<CorrectionTarget>) -> Verification {
    verification(paper_id, 7, 2, 1, corrections)
}

/// Verification classifying as low reliability with correction targets.
pub fn verification_low(paper_id: &str, corrections: Vec<CorrectionTarget>) -> Verification {
    verification(paper_id, 2, 5, 3, corrections)
}

/// A correction batch revising claim `c1` and the `control_paradigm` axis.
pub fn correction_batch(paper_id: &str) -> CorrectionBatch {
    CorrectionBatch {
        paper_id: paper_id.to_string(),
        corrected_claims: vec![CorrectedClaim {
            claim_id: "c1".to_string(),
            corrected_text: "claim c1 (revised)".to_string(),
            correction_reason: "contradicted §3".to_string(),
        }],
        corrected_deltas: vec![CorrectedDelta {
            axis: "control_paradigm".to_string(),
            old_approach: "open loop (revised)".to_string(),
            new_approach: "watchdog loop (revised)".to_string(),
            why_better: "bounded drift (revised)".to_string(),
            correction_reason: "misread baseline".to_string(),
        }],
        corrected_takeaway: None,
        correction_summary: "two items revised".to_string(),
    }
}
