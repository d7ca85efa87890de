//! Snapshot ingestion with the literal fallback document.

use std::path::{Path, PathBuf};

use contracts::Snapshot;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no snapshot source configured")]
    Unconfigured,
}

/// Where the dashboard document comes from.
pub trait SnapshotSource {
    fn describe(&self) -> String;
    fn fetch(&self) -> Result<Snapshot, SnapshotError>;
}

#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SnapshotSource for FileSnapshotSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Snapshot, SnapshotError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| SnapshotError::Read {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// An in-memory JSON document, mostly for tests and embedding.
#[derive(Debug, Clone)]
pub struct InlineSnapshotSource {
    document: String,
}

impl InlineSnapshotSource {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
        }
    }
}

impl SnapshotSource for InlineSnapshotSource {
    fn describe(&self) -> String {
        "inline".to_string()
    }

    fn fetch(&self) -> Result<Snapshot, SnapshotError> {
        Ok(serde_json::from_str(&self.document)?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoSnapshotSource;

impl SnapshotSource for NoSnapshotSource {
    fn describe(&self) -> String {
        "none".to_string()
    }

    fn fetch(&self) -> Result<Snapshot, SnapshotError> {
        Err(SnapshotError::Unconfigured)
    }
}

/// Fetches the snapshot, logging and substituting `Snapshot::fallback()` on failure.
pub fn load_or_fallback(source: &dyn SnapshotSource) -> Snapshot {
    match source.fetch() {
        Ok(snapshot) => {
            tracing::info!(
                source = %source.describe(),
                users = snapshot.users.len(),
                templates = snapshot.activity_templates.len(),
                "snapshot loaded"
            );
            snapshot
        }
        Err(err) => {
            tracing::warn!(source = %source.describe(), error = %err, "snapshot load failed; using fallback");
            Snapshot::fallback()
        }
    }
}
