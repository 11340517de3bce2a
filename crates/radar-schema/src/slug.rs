//! Deterministic paper slug.
//!
//! The slug is the artifact storage key and the idempotency marker, so it
//! must be a pure function of `(paper_id, title)` and stable across
//! process restarts.

/// Maximum length of the title portion of a slug
const TITLE_SLUG_MAX: usize = 30;

/// Build the storage slug for a paper.
///
/// The title is lowercased, stripped to alphanumerics and whitespace,
/// hyphen-joined and truncated to [`TITLE_SLUG_MAX`] bytes, then appended
/// to the paper id: `2601.18491-agentdog-watchdogs-for-agents`.
#[must_use]
pub fn paper_slug(paper_id: &str, title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    let mut title_slug = cleaned.split_whitespace().collect::<Vec<_>>().join("-");
    title_slug.truncate(TITLE_SLUG_MAX);
    let title_slug = title_slug.trim_end_matches('-');

    format!("{paper_id}-{title_slug}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_lowercases_and_hyphenates() {
        assert_eq!(
            paper_slug("2601.18491", "AgentDog: Watchdogs for Agents"),
            "2601.18491-agentdog-watchdogs-for-agents"
        );
    }

    #[test]
    fn slug_strips_punctuation() {
        let slug = paper_slug("1234.5678", "Self-Correcting LLMs (v2)!");
        assert_eq!(slug, "1234.5678-selfcorrecting-llms-v2");
    }

    #[test]
    fn slug_bounded_length() {
        let slug = paper_slug(
            "1234.5678",
            "A Very Long Title That Goes On And On And Never Really Stops Anywhere",
        );
        let title_part = slug.strip_prefix("1234.5678-").unwrap();
        assert!(title_part.len() <= 30);
        assert!(!title_part.ends_with('-'));
    }

    #[test]
    fn slug_deterministic() {
        let a = paper_slug("2602.00001", "Retrieval Is All You Need");
        let b = paper_slug("2602.00001", "Retrieval Is All You Need");
        assert_eq!(a, b);
    }

    #[test]
    fn slug_empty_title() {
        assert_eq!(paper_slug("2602.00001", ""), "2602.00001-");
    }
}
