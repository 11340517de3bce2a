//! Radar Store - slug-keyed artifact persistence
//!
//! One directory per paper slug under `reports/`, one file per artifact
//! kind. The report file's existence is the idempotency marker the
//! orchestrator checks before re-running a paper.
//!
//! Writes are full overwrites, never patches; different slugs touch
//! disjoint directories, so concurrent paper tasks need no coordination.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod kind;
mod store;

pub use kind::ArtifactKind;
pub use store::{ArtifactStore, PaperMetadata, StoreError};
