//! Parsed-document payload and parse-mode tag.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the source document was acquired.
///
/// The parse stage never fails outright; this tag records which rung of
/// the fallback chain produced the text the downstream stages saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ParseMode {
    /// Primary parser succeeded (full structured text)
    Full,
    /// Secondary best-effort extractor succeeded
    Partial,
    /// Both parsers failed; only the abstract is available
    AbstractOnly,
}

impl Default for ParseMode {
    fn default() -> Self {
        Self::Full
    }
}

impl ParseMode {
    /// Stable string form used in artifacts and logs
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Partial => "partial",
            Self::AbstractOnly => "abstract-only",
        }
    }
}

impl std::fmt::Display for ParseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full text recovered from a source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub paper_id: String,
    /// Concatenated body text
    pub text: String,
}

impl ParsedDocument {
    #[must_use]
    pub fn new(paper_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            paper_id: paper_id.into(),
            text: text.into(),
        }
    }
}
