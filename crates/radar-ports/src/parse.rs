//! Document-parsing port.

use async_trait::async_trait;
use radar_schema::ParsedDocument;

/// Errors from a document-parsing backend
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    /// Could not fetch the document
    #[error("document fetch failed: {0}")]
    Fetch(String),

    /// Backend failed to extract text
    #[error("parser backend failed: {0}")]
    Backend(String),

    /// The call exceeded its time bound
    #[error("parse timed out after {duration_secs}s")]
    Timeout { duration_secs: u64 },
}

/// One rung of the document-acquisition fallback chain.
///
/// The pipeline tries backends in order; a backend that fails simply
/// hands off to the next one, and the pipeline degrades to abstract-only
/// when the chain is exhausted.
#[async_trait]
pub trait DocumentParser: Send + Sync {
    /// Backend name, used in degradation error notes
    fn name(&self) -> &'static str;

    /// Fetch and parse the document at `url`.
    ///
    /// # Errors
    /// Returns [`ParseError`] when the document cannot be acquired or
    /// yields no usable text.
    async fn parse(&self, url: &str, paper_id: &str) -> Result<ParsedDocument, ParseError>;
}
