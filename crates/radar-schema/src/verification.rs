//! Verification payload - per-claim reliability judgment.

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Verified fraction at or above which reliability is high
const HIGH_VERIFIED_RATE: f64 = 0.8;
/// Verified fraction below which reliability is low
const LOW_VERIFIED_RATE: f64 = 0.6;
/// Contradiction count at or above which reliability is low
const LOW_CONTRADICTIONS: u32 = 3;

/// Verification status of one claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Direct supporting evidence found in the source
    Verified,
    /// No explicit evidence found
    Unverified,
    /// Conflicts with the source
    Contradicted,
}

/// Overall reliability of an extraction+delta pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Reliability {
    High,
    Medium,
    Low,
}

impl Reliability {
    /// Derive overall reliability from verification counts.
    ///
    /// High: >= 80% verified and zero contradictions.
    /// Low: < 60% verified or >= 3 contradictions.
    /// Medium: everything else. Zero claims classify as high.
    #[must_use]
    pub fn classify(verified: u32, contradicted: u32, total: u32) -> Self {
        let rate = if total == 0 {
            1.0
        } else {
            f64::from(verified) / f64::from(total)
        };

        if rate >= HIGH_VERIFIED_RATE && contradicted == 0 {
            Self::High
        } else if rate < LOW_VERIFIED_RATE || contradicted >= LOW_CONTRADICTIONS {
            Self::Low
        } else {
            Self::Medium
        }
    }
}

/// An item the correction stage must revise.
///
/// Serializes to the compact string forms used in the on-disk artifact:
/// a bare claim id, `delta:{axis}`, `baseline:{name}`, or
/// `one_line_takeaway`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CorrectionTarget {
    /// A claim, by id
    Claim(String),
    /// A delta axis
    DeltaAxis(String),
    /// A baseline, by name
    Baseline(String),
    /// The one-line takeaway
    Takeaway,
}

impl From<String> for CorrectionTarget {
    fn from(s: String) -> Self {
        if s == "one_line_takeaway" {
            Self::Takeaway
        } else if let Some(axis) = s.strip_prefix("delta:") {
            Self::DeltaAxis(axis.to_string())
        } else if let Some(name) = s.strip_prefix("baseline:") {
            Self::Baseline(name.to_string())
        } else {
            Self::Claim(s)
        }
    }
}

impl From<CorrectionTarget> for String {
    fn from(t: CorrectionTarget) -> Self {
        match t {
            CorrectionTarget::Claim(id) => id,
            CorrectionTarget::DeltaAxis(axis) => format!("delta:{axis}"),
            CorrectionTarget::Baseline(name) => format!("baseline:{name}"),
            CorrectionTarget::Takeaway => "one_line_takeaway".to_string(),
        }
    }
}

impl JsonSchema for CorrectionTarget {
    fn schema_name() -> String {
        "CorrectionTarget".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        // String on the wire; the tagged form exists only in memory
        String::json_schema(gen)
    }
}

/// Verification result for one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClaimVerification {
    pub claim_id: String,
    pub claim_text: String,
    pub status: ClaimStatus,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub evidence_found: Option<String>,
    #[serde(default)]
    pub notes: String,
    /// How to fix the claim, when contradicted
    #[serde(default)]
    pub correction_hint: Option<String>,
}

fn default_confidence() -> f64 {
    1.0
}

/// Verification output - the `verification.json` artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Verification {
    pub paper_id: String,
    pub total_claims: u32,
    pub verified_count: u32,
    pub unverified_count: u32,
    pub contradicted_count: u32,
    pub overall_reliability: Reliability,
    #[serde(default)]
    pub results: Vec<ClaimVerification>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub corrections_needed: Vec<CorrectionTarget>,
}

impl Verification {
    /// Pass-through produced when verification fails and the pipeline is
    /// configured fail-open: everything counts as reliable.
    #[must_use]
    pub fn fail_open(paper_id: &str, reason: &str) -> Self {
        Self {
            paper_id: paper_id.to_string(),
            total_claims: 0,
            verified_count: 0,
            unverified_count: 0,
            contradicted_count: 0,
            overall_reliability: Reliability::High,
            results: Vec::new(),
            summary: format!("verification unavailable, passed through: {reason}"),
            corrections_needed: Vec::new(),
        }
    }

    /// Low-reliability substitute produced when verification fails and
    /// the pipeline is configured fail-closed.
    #[must_use]
    pub fn fail_closed(paper_id: &str, reason: &str) -> Self {
        Self {
            paper_id: paper_id.to_string(),
            total_claims: 0,
            verified_count: 0,
            unverified_count: 0,
            contradicted_count: 0,
            overall_reliability: Reliability::Low,
            results: Vec::new(),
            summary: format!("verification unavailable, held back: {reason}"),
            corrections_needed: Vec::new(),
        }
    }

    /// Recompute the overall reliability from the counts, discarding
    /// whatever the generator claimed.
    #[must_use]
    pub fn reclassify(mut self) -> Self {
        self.overall_reliability = Reliability::classify(
            self.verified_count,
            self.contradicted_count,
            self.total_claims,
        );
        self
    }

    /// Whether any correction targets were flagged
    #[must_use]
    pub fn needs_correction(&self) -> bool {
        !self.corrections_needed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_high_requires_rate_and_no_contradictions() {
        assert_eq!(Reliability::classify(8, 0, 10), Reliability::High);
        assert_eq!(Reliability::classify(9, 1, 10), Reliability::Medium);
        assert_eq!(Reliability::classify(0, 0, 0), Reliability::High);
    }

    #[test]
    fn classify_low_on_rate_or_contradictions() {
        assert_eq!(Reliability::classify(5, 0, 10), Reliability::Low);
        assert_eq!(Reliability::classify(7, 3, 10), Reliability::Low);
    }

    #[test]
    fn classify_medium_band() {
        assert_eq!(Reliability::classify(7, 0, 10), Reliability::Medium);
        assert_eq!(Reliability::classify(6, 2, 10), Reliability::Medium);
    }

    #[test]
    fn correction_target_string_round_trip() {
        let cases = [
            (CorrectionTarget::Claim("c3".to_string()), "c3"),
            (
                CorrectionTarget::DeltaAxis("control_paradigm".to_string()),
                "delta:control_paradigm",
            ),
            (
                CorrectionTarget::Baseline("ReAct".to_string()),
                "baseline:ReAct",
            ),
            (CorrectionTarget::Takeaway, "one_line_takeaway"),
        ];
        for (target, s) in cases {
            assert_eq!(String::from(target.clone()), s);
            assert_eq!(CorrectionTarget::from(s.to_string()), target);
        }
    }

    #[test]
    fn correction_target_serializes_as_string() {
        let json =
            serde_json::to_string(&CorrectionTarget::DeltaAxis("memory".to_string())).unwrap();
        assert_eq!(json, "\"delta:memory\"");
        let back: CorrectionTarget = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CorrectionTarget::DeltaAxis("memory".to_string()));
    }

    #[test]
    fn reclassify_overrides_generator_judgment() {
        let v = Verification {
            paper_id: "x".to_string(),
            total_claims: 10,
            verified_count: 4,
            unverified_count: 6,
            contradicted_count: 0,
            overall_reliability: Reliability::High, // generator overclaims
            results: vec![],
            summary: String::new(),
            corrections_needed: vec![],
        }
        .reclassify();
        assert_eq!(v.overall_reliability, Reliability::Low);
    }

    #[test]
    fn fail_open_passes_fail_closed_holds() {
        let open = Verification::fail_open("x", "outage");
        assert_eq!(open.overall_reliability, Reliability::High);

        let closed = Verification::fail_closed("x", "outage");
        assert_eq!(closed.overall_reliability, Reliability::Low);
    }
}
