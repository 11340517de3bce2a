//! Testing utilities for the radar workspace
//!
//! Scripted fakes for every capability port plus payload fixture
//! builders. No mock codegen; fakes record their calls so tests can
//! assert on capability usage (idempotency = zero additional calls).

#![allow(missing_docs)]

mod fakes;
mod fixtures;

pub use fakes::{
    FailingParser, RecordingAggregator, RecordingIndex, ScriptedGenerator, StaticExplorer,
    StaticParser, StaticSelector,
};
pub use fixtures::{
    correction_batch, sample_delta, sample_extraction, sample_scoring, sample_task,
    verification_high, verification_low, verification_medium,
};

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize a test tracing subscriber once per process.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Schema title schemars derives for `T` (its type name).
#[must_use]
pub fn schema_title<T: schemars::JsonSchema>() -> String {
    T::schema_name()
}
