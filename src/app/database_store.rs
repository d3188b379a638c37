//! File-backed holder for the most recently uploaded story database.
//!
//! There is exactly one slot on disk. Every upload overwrites it and concurrent uploads
//! race without locking, so the last write wins.

use crate::domain::story::{Database, StoryError};
use serde_json::Value as JsonValue;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct DatabaseStore {
    path: PathBuf,
}

impl DatabaseStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the raw upload to the slot, creating the parent directory if needed.
    pub async fn save(&self, bytes: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    anyhow::anyhow!("Failed to create {}: {}", parent.display(), e)
                })?;
            }
        }
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", self.path.display(), e))?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "stored uploaded database");
        Ok(())
    }

    /// Reads the stored upload as untyped JSON. `Ok(None)` means nothing was uploaded yet.
    pub async fn load_raw(&self) -> anyhow::Result<Option<JsonValue>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                ))
            }
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Loads the stored upload as a typed database, failing with `NoDatabase` when the
    /// slot is empty.
    pub async fn load(&self) -> anyhow::Result<Database> {
        let raw = self.load_raw().await?.ok_or(StoryError::NoDatabase)?;
        Ok(Database::from_value(raw)?)
    }
}
