//! Artifact kinds and their on-disk names.

/// Named artifact written by the pipeline for one paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Extraction,
    Delta,
    Scoring,
    Verification,
    /// Terminal artifact; its existence marks the paper as processed
    Report,
}

impl ArtifactKind {
    /// File name inside the paper's slug directory
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Extraction => "extraction.json",
            Self::Delta => "delta.json",
            Self::Scoring => "scoring.json",
            Self::Verification => "verification.json",
            Self::Report => "report.md",
        }
    }

    /// All kinds, in save order
    #[must_use]
    pub fn all() -> [Self; 5] {
        [
            Self::Extraction,
            Self::Delta,
            Self::Scoring,
            Self::Verification,
            Self::Report,
        ]
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Extraction => "extraction",
            Self::Delta => "delta",
            Self::Scoring => "scoring",
            Self::Verification => "verification",
            Self::Report => "report",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_stable() {
        assert_eq!(ArtifactKind::Extraction.file_name(), "extraction.json");
        assert_eq!(ArtifactKind::Report.file_name(), "report.md");
    }

    #[test]
    fn display_names() {
        assert_eq!(ArtifactKind::Scoring.to_string(), "scoring");
    }
}
