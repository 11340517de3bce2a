//! Scoring payload - 0-5 x 3 rubric with fixed recommendation thresholds.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Total at or above which a paper is top tier
pub const SCORE_MUST_READ: u8 = 12;
/// Total at or above which a paper is middle tier
pub const SCORE_WORTH_READING: u8 = 8;

/// Categorical recommendation derived from the total score.
///
/// The mapping is fixed: `total >= 12` is [`Recommendation::MustRead`],
/// `total >= 8` is [`Recommendation::WorthReading`], everything else is
/// [`Recommendation::Skip`]. No other mapping is possible; see
/// [`Scoring::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    MustRead,
    WorthReading,
    Skip,
}

impl Recommendation {
    /// Derive the recommendation from a total score
    #[must_use]
    pub fn from_total(total: u8) -> Self {
        if total >= SCORE_MUST_READ {
            Self::MustRead
        } else if total >= SCORE_WORTH_READING {
            Self::WorthReading
        } else {
            Self::Skip
        }
    }

    /// Stable string form used in reports
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MustRead => "must_read",
            Self::WorthReading => "worth_reading",
            Self::Skip => "skip",
        }
    }
}

/// Scoring output - the `scoring.json` artifact.
///
/// Three axes, each 0-5, for a 0-15 total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Scoring {
    pub paper_id: String,
    /// Real-world applicability (0-5)
    pub practicality: u8,
    /// How readily the method can be implemented (0-5)
    pub codeability: u8,
    /// Strength of the evidence behind the results (0-5)
    pub signal: u8,
    pub recommendation: Recommendation,
    /// Rationale for the scores
    pub reasoning: String,
    #[serde(default)]
    pub key_strength: String,
    #[serde(default)]
    pub main_concern: String,
}

impl Scoring {
    /// Zero score used when the scoring capability fails.
    ///
    /// The failure reason is preserved as the rationale so report
    /// generation never needs to null-check scoring.
    #[must_use]
    pub fn zero(paper_id: &str, reason: &str) -> Self {
        Self {
            paper_id: paper_id.to_string(),
            practicality: 0,
            codeability: 0,
            signal: 0,
            recommendation: Recommendation::Skip,
            reasoning: reason.to_string(),
            key_strength: String::new(),
            main_concern: String::new(),
        }
    }

    /// Total score (0-15)
    #[must_use]
    pub fn total(&self) -> u8 {
        self.practicality + self.codeability + self.signal
    }

    /// Clamp each axis to 0-5 and recompute the recommendation from the
    /// total, discarding whatever mapping the generator produced.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        self.practicality = self.practicality.min(5);
        self.codeability = self.codeability.min(5);
        self.signal = self.signal.min(5);
        self.recommendation = Recommendation::from_total(self.total());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_thresholds() {
        for total in 0..=15u8 {
            let expected = if total >= 12 {
                Recommendation::MustRead
            } else if total >= 8 {
                Recommendation::WorthReading
            } else {
                Recommendation::Skip
            };
            assert_eq!(Recommendation::from_total(total), expected, "total {total}");
        }
    }

    #[test]
    fn total_is_sum_of_axes() {
        for p in 0..=5u8 {
            for c in 0..=5u8 {
                for s in 0..=5u8 {
                    let scoring = Scoring {
                        paper_id: "x".to_string(),
                        practicality: p,
                        codeability: c,
                        signal: s,
                        recommendation: Recommendation::Skip,
                        reasoning: String::new(),
                        key_strength: String::new(),
                        main_concern: String::new(),
                    };
                    assert_eq!(scoring.total(), p + c + s);
                }
            }
        }
    }

    #[test]
    fn normalize_overrides_inconsistent_recommendation() {
        let scoring = Scoring {
            paper_id: "x".to_string(),
            practicality: 5,
            codeability: 5,
            signal: 4,
            recommendation: Recommendation::Skip, // inconsistent
            reasoning: String::new(),
            key_strength: String::new(),
            main_concern: String::new(),
        }
        .normalize();
        assert_eq!(scoring.recommendation, Recommendation::MustRead);
    }

    #[test]
    fn normalize_clamps_out_of_range_axes() {
        let scoring = Scoring {
            paper_id: "x".to_string(),
            practicality: 9,
            codeability: 0,
            signal: 0,
            recommendation: Recommendation::MustRead,
            reasoning: String::new(),
            key_strength: String::new(),
            main_concern: String::new(),
        }
        .normalize();
        assert_eq!(scoring.practicality, 5);
        assert_eq!(scoring.recommendation, Recommendation::Skip);
    }

    #[test]
    fn zero_score_preserves_reason() {
        let scoring = Scoring::zero("2601.1", "generation timed out");
        assert_eq!(scoring.total(), 0);
        assert_eq!(scoring.recommendation, Recommendation::Skip);
        assert_eq!(scoring.reasoning, "generation timed out");
    }
}
