//! The pipeline graph as data: stages, allowed transitions, and the one
//! conditional branch out of verify.

use crate::state::PipelineState;
use radar_schema::{Reliability, Verification};

/// Pipeline stage (state-machine node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Parse,
    Extract,
    Delta,
    Score,
    Verify,
    Correct,
    Report,
    Persist,
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Parse => "parse",
            Self::Extract => "extract",
            Self::Delta => "delta",
            Self::Score => "score",
            Self::Verify => "verify",
            Self::Correct => "correct",
            Self::Report => "report",
            Self::Persist => "persist",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Edges of the pipeline graph.
///
/// The only multi-successor node is verify; its choice is made by
/// [`VerificationOutcome::classify`].
#[must_use]
pub fn allowed_transitions(from: Stage) -> &'static [Stage] {
    use Stage::*;
    match from {
        Parse => &[Extract],
        Extract => &[Delta],
        Delta => &[Score],
        Score => &[Verify],
        Verify => &[Report, Correct],
        Correct => &[Extract],
        Report => &[Persist],
        Persist => &[Done],
        Done => &[],
    }
}

/// Validate one transition against the graph.
pub(crate) fn validate_transition(from: Stage, to: Stage) -> Result<(), IllegalTransition> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(IllegalTransition { from, to })
    }
}

/// A transition outside the graph - indicates a driver bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal stage transition: {from} -> {to}")]
pub struct IllegalTransition {
    pub from: Stage,
    pub to: Stage,
}

/// The branch decision out of verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Reliability is high - proceed to report
    Proceed,
    /// Not high, retry budget remains - run correction
    Correct,
    /// Not high, retries exhausted - report anyway
    RetriesExhausted,
}

impl VerificationOutcome {
    /// Classify the verification branch.
    ///
    /// Reliability is evaluated first; the retry budget is only
    /// consulted when it is not high, so a high-reliability paper never
    /// enters the correction loop even with retries remaining.
    #[must_use]
    pub fn classify(
        verification: Option<&Verification>,
        retry_count: u32,
        max_retries: u32,
    ) -> Self {
        let Some(verification) = verification else {
            return Self::Proceed;
        };

        if verification.overall_reliability == Reliability::High {
            return Self::Proceed;
        }

        if retry_count < max_retries {
            Self::Correct
        } else {
            Self::RetriesExhausted
        }
    }

    /// Successor stage this outcome selects
    #[must_use]
    pub fn next_stage(&self) -> Stage {
        match self {
            Self::Proceed | Self::RetriesExhausted => Stage::Report,
            Self::Correct => Stage::Correct,
        }
    }
}

/// Successor of `stage` given the current state.
///
/// Every node except verify has exactly one outgoing edge.
#[must_use]
pub(crate) fn next_stage(stage: Stage, state: &PipelineState) -> Stage {
    use Stage::*;
    match stage {
        Parse => Extract,
        Extract => Delta,
        Delta => Score,
        Score => Verify,
        Verify => VerificationOutcome::classify(
            state.verification.as_ref(),
            state.retry_count,
            state.max_retries,
        )
        .next_stage(),
        Correct => Extract,
        Report => Persist,
        Persist => Done,
        Done => Done,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verification(reliability: Reliability) -> Verification {
        let (verified, contradicted, total) = match reliability {
            Reliability::High => (10, 0, 10),
            Reliability::Medium => (7, 1, 10),
            Reliability::Low => (2, 3, 10),
        };
        Verification {
            paper_id: "x".to_string(),
            total_claims: total,
            verified_count: verified,
            unverified_count: total - verified - contradicted,
            contradicted_count: contradicted,
            overall_reliability: reliability,
            results: vec![],
            summary: String::new(),
            corrections_needed: vec![],
        }
    }

    #[test]
    fn linear_edges() {
        assert_eq!(allowed_transitions(Stage::Parse), &[Stage::Extract]);
        assert_eq!(allowed_transitions(Stage::Correct), &[Stage::Extract]);
        assert_eq!(allowed_transitions(Stage::Persist), &[Stage::Done]);
        assert!(allowed_transitions(Stage::Done).is_empty());
    }

    #[test]
    fn verify_has_two_successors() {
        assert_eq!(
            allowed_transitions(Stage::Verify),
            &[Stage::Report, Stage::Correct]
        );
    }

    #[test]
    fn illegal_transition_rejected() {
        assert!(validate_transition(Stage::Parse, Stage::Extract).is_ok());
        assert!(validate_transition(Stage::Parse, Stage::Report).is_err());
    }

    #[test]
    fn high_reliability_skips_correction_even_with_retries_left() {
        let v = verification(Reliability::High);
        assert_eq!(
            VerificationOutcome::classify(Some(&v), 0, 2),
            VerificationOutcome::Proceed
        );
    }

    #[test]
    fn not_high_with_budget_corrects() {
        let v = verification(Reliability::Medium);
        assert_eq!(
            VerificationOutcome::classify(Some(&v), 1, 2),
            VerificationOutcome::Correct
        );
    }

    #[test]
    fn not_high_without_budget_force_reports() {
        let v = verification(Reliability::Low);
        assert_eq!(
            VerificationOutcome::classify(Some(&v), 2, 2),
            VerificationOutcome::RetriesExhausted
        );
        assert_eq!(
            VerificationOutcome::RetriesExhausted.next_stage(),
            Stage::Report
        );
    }

    #[test]
    fn missing_verification_proceeds() {
        assert_eq!(
            VerificationOutcome::classify(None, 0, 2),
            VerificationOutcome::Proceed
        );
    }

    #[test]
    fn zero_retry_budget_never_corrects() {
        let v = verification(Reliability::Low);
        assert_eq!(
            VerificationOutcome::classify(Some(&v), 0, 0),
            VerificationOutcome::RetriesExhausted
        );
    }
}
