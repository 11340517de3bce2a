//! Prompt assembly for the generation stages.
//!
//! The wording here is business content, kept minimal; the structural
//! contract lives in the schemas the requests declare.

use radar_schema::{Delta, Extraction, Verification};

/// Full text longer than this is truncated before prompting
const FULL_TEXT_MAX: usize = 50_000;

pub(crate) const EXTRACTION_SYSTEM: &str = "You are a research analyst extracting structured \
information from papers. Every claim needs an evidence pointer. Extract only what the paper \
explicitly states; list a method as a baseline only if the paper directly compares against it. \
Decompose the methodology into at least two components.";

pub(crate) const DELTA_SYSTEM: &str = "You are a research analyst summarizing what structurally \
changed relative to prior work. Produce at least one core delta and a single-sentence takeaway \
of the form: solves [limitation A] of [method X] by introducing [change B].";

pub(crate) const SCORING_SYSTEM: &str = "You are a reviewer scoring a paper on practicality, \
codeability and signal, each 0-5. Justify the scores from the extraction and delta only.";

pub(crate) const VERIFICATION_SYSTEM: &str = "You are a verification agent checking extracted \
analysis against the source. Classify each claim as verified, unverified or contradicted; \
prefer unverified when ambiguous. Flag contradicted claims, wrong baselines (baseline:{name}), \
wrong delta axes (delta:{axis}) and a wrong takeaway (one_line_takeaway) in corrections_needed.";

pub(crate) const CORRECTION_SYSTEM: &str = "You are a correction agent. Revise only the flagged \
items, grounded in the source text. Keep claim ids and claim types unchanged; state a reason \
for every revision.";

fn clipped(full_text: Option<&str>) -> String {
    match full_text {
        Some(text) if text.len() > FULL_TEXT_MAX => {
            let mut end = FULL_TEXT_MAX;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}\n... (truncated)", &text[..end])
        }
        Some(text) => text.to_string(),
        None => "(full text not available)".to_string(),
    }
}

pub(crate) fn extraction_prompt(
    paper_id: &str,
    title: &str,
    abstract_text: &str,
    full_text: Option<&str>,
) -> String {
    format!(
        "Extract structured information from this paper.\n\n\
         Paper: {title} ({paper_id})\n\nAbstract:\n{abstract_text}\n\n\
         Full text:\n{}\n",
        clipped(full_text)
    )
}

pub(crate) fn delta_prompt(extraction: &Extraction) -> String {
    let claims = extraction
        .claims
        .iter()
        .map(|c| format!("- [{}] {}", c.claim_id, c.text))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Summarize the structural change this paper makes.\n\n\
         Paper: {} ({})\n\nProblem: {}\nLimitation of prior work: {}\n\nClaims:\n{claims}\n",
        extraction.title,
        extraction.paper_id,
        extraction.problem_definition.statement,
        extraction.problem_definition.structural_limitation,
    )
}

pub(crate) fn scoring_prompt(extraction: &Extraction, delta: &Delta) -> String {
    format!(
        "Score this paper.\n\nPaper: {} ({})\n\nTakeaway: {}\n\n\
         Method components: {}\nClaims: {}\n",
        extraction.title,
        extraction.paper_id,
        delta.one_line_takeaway,
        extraction.method_components.len(),
        extraction.claims.len(),
    )
}

pub(crate) fn verification_prompt(
    extraction: &Extraction,
    delta: &Delta,
    abstract_text: &str,
    full_text: Option<&str>,
) -> String {
    let claims = extraction
        .claims
        .iter()
        .map(|c| format!("- [{}] {}", c.claim_id, c.text))
        .collect::<Vec<_>>()
        .join("\n");
    let deltas = delta
        .core_deltas
        .iter()
        .map(|d| {
            format!(
                "- [{}] {} -> {}: {}",
                d.axis, d.old_approach, d.new_approach, d.why_better
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Verify the extracted analysis against the source.\n\n\
         Paper: {} ({})\n\nAbstract:\n{abstract_text}\n\nFull text:\n{}\n\n\
         Claims:\n{claims}\n\nTakeaway: {}\n\nCore deltas:\n{deltas}\n",
        extraction.title,
        extraction.paper_id,
        clipped(full_text),
        delta.one_line_takeaway,
    )
}

pub(crate) fn correction_prompt(
    extraction: &Extraction,
    delta: &Delta,
    verification: &Verification,
    full_text: Option<&str>,
) -> String {
    let targets = verification
        .corrections_needed
        .iter()
        .map(|t| format!("- {}", String::from(t.clone())))
        .collect::<Vec<_>>()
        .join("\n");
    let hints = verification
        .results
        .iter()
        .filter(|r| r.correction_hint.is_some())
        .map(|r| {
            format!(
                "- [{}] {}: {}",
                r.claim_id,
                r.notes,
                r.correction_hint.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Fix the flagged items.\n\nPaper: {} ({})\n\nFlagged:\n{targets}\n\n\
         Hints:\n{hints}\n\nTakeaway: {}\n\nFull text:\n{}\n",
        extraction.title,
        extraction.paper_id,
        delta.one_line_takeaway,
        clipped(full_text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipped_truncates_long_text() {
        let long = "a".repeat(FULL_TEXT_MAX + 100);
        let clipped = clipped(Some(&long));
        assert!(clipped.ends_with("... (truncated)"));
        assert!(clipped.len() < long.len());
    }

    #[test]
    fn clipped_placeholder_when_missing() {
        assert_eq!(clipped(None), "(full text not available)");
    }
}
