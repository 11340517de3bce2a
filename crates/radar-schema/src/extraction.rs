//! Extraction payload - structured claims + methodology with evidence.

use crate::PayloadError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Minimum number of methodology components a valid extraction carries
pub const MIN_METHOD_COMPONENTS: usize = 2;

/// Kind of supporting evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    Quote,
    Table,
    Figure,
    Equation,
}

impl Default for EvidenceKind {
    fn default() -> Self {
        Self::Quote
    }
}

/// Pointer into the source document backing a claim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Evidence {
    /// Page number, if known
    #[serde(default)]
    pub page: Option<u32>,
    /// Section name, if known
    #[serde(default)]
    pub section: Option<String>,
    /// Supporting quote
    #[serde(default)]
    pub quote: Option<String>,
    /// Evidence kind
    #[serde(default)]
    pub kind: EvidenceKind,
}

impl Evidence {
    /// Render as an inline pointer, e.g. `(Evidence: p.3 §4.1)`.
    ///
    /// Returns an empty string when neither page nor section is known.
    #[must_use]
    pub fn to_pointer(&self) -> String {
        let mut parts = Vec::new();
        if let Some(page) = self.page {
            parts.push(format!("p.{page}"));
        }
        if let Some(section) = &self.section {
            parts.push(format!("\u{a7}{section}"));
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!("(Evidence: {})", parts.join(" "))
        }
    }
}

/// Problem the paper addresses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProblemDefinition {
    /// Problem statement
    pub statement: String,
    /// Prior methods addressing the same problem
    #[serde(default)]
    pub baseline_methods: Vec<String>,
    /// Structural limitation of the prior methods
    #[serde(default)]
    pub structural_limitation: String,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

/// A directly-compared baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Baseline {
    pub name: String,
    pub description: String,
    /// Limitation the paper claims for this baseline
    pub limitation: String,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

/// Role a methodology component plays in the contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComponentRole {
    /// New contribution
    Novel,
    /// Existing technique, adapted
    Adapted,
    /// Standard technique, used as-is
    Standard,
}

/// One methodology building block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MethodComponent {
    /// Component name (e.g. "Multi-Head Attention")
    pub name: String,
    /// What the component is and how it works
    pub description: String,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    /// Core equation or algorithm sketch, if stated
    #[serde(default)]
    pub implementation_hint: Option<String>,
    #[serde(default)]
    pub role: Option<ComponentRole>,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

/// Benchmark results reported by the paper
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Benchmark {
    pub dataset: String,
    #[serde(default)]
    pub metrics: Vec<String>,
    #[serde(default)]
    pub baseline_results: std::collections::BTreeMap<String, String>,
    #[serde(default)]
    pub proposed_results: std::collections::BTreeMap<String, String>,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

/// Category of an extracted claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    Method,
    Result,
    Comparison,
    Limitation,
    Architecture,
    Efficiency,
    Ablation,
}

/// One evidence-backed claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Claim {
    /// Stable claim id, referenced by verification and correction
    pub claim_id: String,
    pub text: String,
    pub claim_type: ClaimType,
    /// Extractor confidence in [0, 1]
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

fn default_confidence() -> f64 {
    1.0
}

/// Extraction output - the `extraction.json` artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Extraction {
    pub paper_id: String,
    pub title: String,
    pub problem_definition: ProblemDefinition,
    #[serde(default)]
    pub baselines: Vec<Baseline>,
    /// Methodology components, at least [`MIN_METHOD_COMPONENTS`]
    #[serde(default)]
    pub method_components: Vec<MethodComponent>,
    #[serde(default)]
    pub benchmarks: Vec<Benchmark>,
    #[serde(default)]
    pub claims: Vec<Claim>,
    /// Parse mode this extraction was produced under
    #[serde(default)]
    pub mode: crate::ParseMode,
    /// Set when the generator failed and a placeholder was substituted
    #[serde(default)]
    pub degraded_reason: Option<String>,
}

impl Extraction {
    /// Degraded placeholder used when structured generation fails.
    ///
    /// The pipeline must stay total: downstream stages consume this
    /// instead of null-checking, and the failure reason rides along.
    #[must_use]
    pub fn placeholder(paper_id: &str, title: &str, abstract_text: &str, reason: &str) -> Self {
        Self {
            paper_id: paper_id.to_string(),
            title: title.to_string(),
            problem_definition: ProblemDefinition {
                statement: abstract_text.to_string(),
                ..ProblemDefinition::default()
            },
            baselines: Vec::new(),
            method_components: Vec::new(),
            benchmarks: Vec::new(),
            claims: Vec::new(),
            mode: crate::ParseMode::AbstractOnly,
            degraded_reason: Some(reason.to_string()),
        }
    }

    /// Whether this extraction is a degraded placeholder
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded_reason.is_some()
    }

    /// Total number of claims
    #[must_use]
    pub fn total_claims(&self) -> usize {
        self.claims.len()
    }

    /// Fraction of claims carrying at least one evidence pointer
    #[must_use]
    pub fn evidence_coverage(&self) -> f64 {
        if self.claims.is_empty() {
            return 0.0;
        }
        let with_evidence = self.claims.iter().filter(|c| !c.evidence.is_empty()).count();
        with_evidence as f64 / self.claims.len() as f64
    }

    /// Validate structural invariants of a generated extraction.
    ///
    /// Placeholders are exempt; a generated payload must carry at least
    /// [`MIN_METHOD_COMPONENTS`] methodology components.
    pub fn validate(&self) -> Result<(), PayloadError> {
        if self.is_degraded() {
            return Ok(());
        }
        if self.method_components.len() < MIN_METHOD_COMPONENTS {
            return Err(PayloadError::Invariant(format!(
                "extraction needs >= {MIN_METHOD_COMPONENTS} method components, got {}",
                self.method_components.len()
            )));
        }
        Ok(())
    }
}
