//! Radar Schema - typed payloads for the deep-analysis pipeline
//!
//! Defines the artifact payloads produced by the pipeline stages:
//! - Extraction (claims + methodology, evidence-backed)
//! - Delta (structural-change summary)
//! - Scoring (0-5 x 3 rubric)
//! - Verification (per-claim reliability judgment)
//! - Correction (patch batch applied to flagged items)
//!
//! plus the paper task type, parse-mode tags, and the deterministic
//! slug used as the storage/idempotency key.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod correction;
pub mod delta;
pub mod extraction;
pub mod paper;
pub mod parsed;
pub mod scoring;
pub mod slug;
pub mod verification;

pub use correction::{CorrectedClaim, CorrectedDelta, CorrectionBatch};
pub use delta::{CoreDelta, Delta, Tradeoff};
pub use extraction::{
    Baseline, Benchmark, Claim, ClaimType, ComponentRole, Evidence, EvidenceKind, Extraction,
    MethodComponent, ProblemDefinition,
};
pub use paper::PaperTask;
pub use parsed::{ParseMode, ParsedDocument};
pub use scoring::{Recommendation, Scoring, SCORE_MUST_READ, SCORE_WORTH_READING};
pub use slug::paper_slug;
pub use verification::{
    ClaimStatus, ClaimVerification, CorrectionTarget, Reliability, Verification,
};

/// Payload invariant violation, raised at the schema-validation boundary.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// A structural invariant on a generated payload was violated
    #[error("payload invariant violated: {0}")]
    Invariant(String),
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
