//! Radar Core - the parallel multi-paper orchestrator
//!
//! Wraps the deep pipeline with:
//!
//! - upstream candidate selection (or a fixed override list)
//! - the idempotency skip: a slug with a terminal report never re-runs
//! - parallel per-paper fan-out with gather-all aggregation
//! - downstream triggers (aggregate report, indexes, repo mapping)

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod orchestrator;
mod types;

pub use orchestrator::{Orchestrator, OrchestratorConfig, OrchestratorError};
pub use types::{RunOptions, RunSummary};
