//! Paper task - one unit of work through the deep pipeline.

use serde::{Deserialize, Serialize};

/// One candidate paper, produced by the upstream selector.
///
/// Immutable once created: the pipeline builds its own state around a
/// task and never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperTask {
    /// Stable external identifier (e.g. a catalog id like `2601.18491`)
    pub paper_id: String,
    /// Paper title
    pub title: String,
    /// Abstract text (may be empty)
    #[serde(default)]
    pub abstract_text: String,
    /// Source document URL, if known
    #[serde(default)]
    pub document_url: Option<String>,
    /// Reference implementation repository, if the paper links one
    #[serde(default)]
    pub repo_url: Option<String>,
}

impl PaperTask {
    /// Create a task with just identity fields
    #[must_use]
    pub fn new(paper_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            paper_id: paper_id.into(),
            title: title.into(),
            abstract_text: String::new(),
            document_url: None,
            repo_url: None,
        }
    }

    /// With abstract text
    #[must_use]
    pub fn with_abstract(mut self, text: impl Into<String>) -> Self {
        self.abstract_text = text.into();
        self
    }

    /// With document URL
    #[must_use]
    pub fn with_document_url(mut self, url: impl Into<String>) -> Self {
        self.document_url = Some(url.into());
        self
    }

    /// With repository URL
    #[must_use]
    pub fn with_repo_url(mut self, url: impl Into<String>) -> Self {
        self.repo_url = Some(url.into());
        self
    }

    /// Storage slug for this task
    #[must_use]
    pub fn slug(&self) -> String {
        crate::slug::paper_slug(&self.paper_id, &self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_builder() {
        let task = PaperTask::new("2601.18491", "AgentDog: Watchdogs for Agents")
            .with_abstract("We propose...")
            .with_document_url("https://example.org/2601.18491.pdf");

        assert_eq!(task.paper_id, "2601.18491");
        assert!(task.document_url.is_some());
        assert!(task.repo_url.is_none());
    }

    #[test]
    fn task_slug_is_deterministic() {
        let a = PaperTask::new("2601.18491", "AgentDog: Watchdogs for Agents");
        let b = PaperTask::new("2601.18491", "AgentDog: Watchdogs for Agents");
        assert_eq!(a.slug(), b.slug());
    }
}
