//! Radar Pipeline - the deep-analysis state machine
//!
//! Drives one paper through:
//!
//! ```text
//! parse -> extract -> delta -> score -> verify
//! verify --[reliability high]--------------------> report
//! verify --[not high, retries left]--> correct --> extract (loop)
//! verify --[not high, retries spent]-------------> report
//! report -> persist -> done
//! ```
//!
//! Every stage except persist is total: capability failure degrades the
//! payload and annotates the state, it never aborts the run. The only
//! hard failure is a persist precondition (missing slug or extraction).

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod graph;
mod pipeline;
mod prompts;
pub mod report;
pub mod state;
mod stages;

pub use config::{PipelineConfig, VerificationFailurePolicy};
pub use graph::{Stage, VerificationOutcome};
pub use pipeline::{DeepPipeline, PipelineError};
pub use report::render_report;
pub use state::{PipelineState, StageError};
