//! Radar Ports - abstract capability interfaces
//!
//! Every external, possibly-failing service the core depends on is an
//! object-safe async trait here:
//! - [`StructuredGenerator`] - schema-bound LLM generation
//! - [`DocumentParser`] - source-document acquisition (fallback chain)
//! - [`CandidateSelector`] - upstream candidate feed
//! - [`ReportAggregator`] / [`IndexUpdater`] - downstream consumers
//! - [`RepoExplorer`] - optional implementation mapping
//!
//! Implementations live outside the core; tests substitute scripted
//! fakes without touching any global state.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod downstream;
pub mod generate;
pub mod parse;
pub mod select;

pub use downstream::{DownstreamError, IndexUpdater, RepoExplorer, ReportAggregator};
pub use generate::{generate_structured, GenerateRequest, GenerationError, StructuredGenerator};
pub use parse::{DocumentParser, ParseError};
pub use select::{CandidateSelector, SelectionError};
