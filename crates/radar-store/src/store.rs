//! Filesystem-backed artifact store.

use crate::ArtifactKind;
use radar_schema::{Delta, Extraction, Recommendation, Scoring, Verification};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("store io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact file exists but does not decode
    #[error("corrupt {kind} artifact for {slug}: {detail}")]
    Corrupt {
        slug: String,
        kind: ArtifactKind,
        detail: String,
    },

    /// Payload failed to encode
    #[error("could not encode {kind} artifact for {slug}: {detail}")]
    Encode {
        slug: String,
        kind: ArtifactKind,
        detail: String,
    },
}

/// Summary row for one stored paper, used by the index update step.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperMetadata {
    pub slug: String,
    pub paper_id: String,
    pub title: String,
    pub score: Option<u8>,
    pub recommendation: Option<Recommendation>,
}

/// Slug-keyed artifact persistence under `<base>/reports/`.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    reports_dir: PathBuf,
}

impl ArtifactStore {
    /// Open (and create if needed) the store under `base_dir`.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] when the reports directory cannot be
    /// created.
    pub fn open(base_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let reports_dir = base_dir.as_ref().join("reports");
        fs::create_dir_all(&reports_dir).map_err(|source| StoreError::Io {
            path: reports_dir.clone(),
            source,
        })?;
        Ok(Self { reports_dir })
    }

    /// Directory holding the reports
    #[must_use]
    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    fn artifact_path(&self, slug: &str, kind: ArtifactKind) -> PathBuf {
        self.reports_dir.join(slug).join(kind.file_name())
    }

    fn paper_dir(&self, slug: &str) -> Result<PathBuf, StoreError> {
        let dir = self.reports_dir.join(slug);
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    fn save_json<T: Serialize>(
        &self,
        slug: &str,
        kind: ArtifactKind,
        payload: &T,
    ) -> Result<PathBuf, StoreError> {
        let dir = self.paper_dir(slug)?;
        let path = dir.join(kind.file_name());
        let json = serde_json::to_string_pretty(payload).map_err(|e| StoreError::Encode {
            slug: slug.to_string(),
            kind,
            detail: e.to_string(),
        })?;
        fs::write(&path, json).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(slug, %kind, path = %path.display(), "artifact saved");
        Ok(path)
    }

    fn load_json<T: DeserializeOwned>(
        &self,
        slug: &str,
        kind: ArtifactKind,
    ) -> Result<Option<T>, StoreError> {
        let path = self.artifact_path(slug, kind);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let payload = serde_json::from_str(&text).map_err(|e| StoreError::Corrupt {
            slug: slug.to_string(),
            kind,
            detail: e.to_string(),
        })?;
        Ok(Some(payload))
    }

    /// Save `extraction.json`
    pub fn save_extraction(&self, slug: &str, data: &Extraction) -> Result<PathBuf, StoreError> {
        self.save_json(slug, ArtifactKind::Extraction, data)
    }

    /// Save `delta.json`
    pub fn save_delta(&self, slug: &str, data: &Delta) -> Result<PathBuf, StoreError> {
        self.save_json(slug, ArtifactKind::Delta, data)
    }

    /// Save `scoring.json`
    pub fn save_scoring(&self, slug: &str, data: &Scoring) -> Result<PathBuf, StoreError> {
        self.save_json(slug, ArtifactKind::Scoring, data)
    }

    /// Save `verification.json`
    pub fn save_verification(
        &self,
        slug: &str,
        data: &Verification,
    ) -> Result<PathBuf, StoreError> {
        self.save_json(slug, ArtifactKind::Verification, data)
    }

    /// Save `report.md` - the terminal artifact
    pub fn save_report(&self, slug: &str, markdown: &str) -> Result<PathBuf, StoreError> {
        let dir = self.paper_dir(slug)?;
        let path = dir.join(ArtifactKind::Report.file_name());
        fs::write(&path, markdown).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(slug, path = %path.display(), "report saved");
        Ok(path)
    }

    /// Load `extraction.json`, if present
    pub fn load_extraction(&self, slug: &str) -> Result<Option<Extraction>, StoreError> {
        self.load_json(slug, ArtifactKind::Extraction)
    }

    /// Load `delta.json`, if present
    pub fn load_delta(&self, slug: &str) -> Result<Option<Delta>, StoreError> {
        self.load_json(slug, ArtifactKind::Delta)
    }

    /// Load `scoring.json`, if present
    pub fn load_scoring(&self, slug: &str) -> Result<Option<Scoring>, StoreError> {
        self.load_json(slug, ArtifactKind::Scoring)
    }

    /// Load `verification.json`, if present
    pub fn load_verification(&self, slug: &str) -> Result<Option<Verification>, StoreError> {
        self.load_json(slug, ArtifactKind::Verification)
    }

    /// Load `report.md`, if present
    pub fn load_report(&self, slug: &str) -> Result<Option<String>, StoreError> {
        let path = self.artifact_path(slug, ArtifactKind::Report);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StoreError::Io { path, source })
    }

    /// Whether an artifact of `kind` exists for `slug`
    #[must_use]
    pub fn exists(&self, slug: &str, kind: ArtifactKind) -> bool {
        self.artifact_path(slug, kind).exists()
    }

    /// Idempotency check: a paper counts as processed once its terminal
    /// report artifact exists.
    #[must_use]
    pub fn paper_exists(&self, slug: &str) -> bool {
        self.exists(slug, ArtifactKind::Report)
    }

    /// Slugs of stored papers with a report, newest slug first
    pub fn list_papers(&self) -> Result<Vec<String>, StoreError> {
        let entries = fs::read_dir(&self.reports_dir).map_err(|source| StoreError::Io {
            path: self.reports_dir.clone(),
            source,
        })?;

        let mut slugs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.reports_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_dir() && path.join(ArtifactKind::Report.file_name()).exists() {
                slugs.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        slugs.sort_by(|a, b| b.cmp(a));
        Ok(slugs)
    }

    /// Metadata row for one stored paper, if its extraction exists
    pub fn paper_metadata(&self, slug: &str) -> Result<Option<PaperMetadata>, StoreError> {
        let Some(extraction) = self.load_extraction(slug)? else {
            return Ok(None);
        };
        let scoring = self.load_scoring(slug)?;
        Ok(Some(PaperMetadata {
            slug: slug.to_string(),
            paper_id: extraction.paper_id,
            title: extraction.title,
            score: scoring.as_ref().map(Scoring::total),
            recommendation: scoring.map(|s| s.recommendation),
        }))
    }
}
