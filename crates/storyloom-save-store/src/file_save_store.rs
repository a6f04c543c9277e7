//! File-system implementation of the `SaveStore` trait.
//!
//! Each slot is one JSON file under the root directory. Writes go to a
//! temporary sibling first and are renamed into place, so a slot is never
//! partially persisted.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use storyloom_core::error::DomainError;
use storyloom_core::store::SaveStore;

/// Directory-backed save store.
#[derive(Debug, Clone)]
pub struct FileSaveStore {
    root: PathBuf,
}

impl FileSaveStore {
    /// Creates a store rooted at `root`. The directory is created on first
    /// write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing slot `key`.
    ///
    /// Characters outside `[A-Za-z0-9_-]` are replaced with `_` so a key can
    /// never escape the root directory.
    #[must_use]
    pub fn slot_path(&self, key: &str) -> PathBuf {
        let file_stem: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let file_stem = if file_stem.is_empty() {
            "_".to_owned()
        } else {
            file_stem
        };
        self.root.join(format!("{file_stem}.json"))
    }
}

#[async_trait]
impl SaveStore for FileSaveStore {
    async fn read(&self, key: &str) -> Result<Option<String>, DomainError> {
        let path = self.slot_path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => {
                tracing::debug!(path = %path.display(), bytes = raw.len(), "read save slot");
                Ok(Some(raw))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::Infrastructure(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn write(&self, key: &str, raw: &str) -> Result<(), DomainError> {
        let path = self.slot_path(key);
        let staging = path.with_extension("json.tmp");

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            DomainError::Infrastructure(format!(
                "failed to create {}: {e}",
                self.root.display()
            ))
        })?;
        tokio::fs::write(&staging, raw).await.map_err(|e| {
            DomainError::Infrastructure(format!("failed to write {}: {e}", staging.display()))
        })?;
        tokio::fs::rename(&staging, &path).await.map_err(|e| {
            DomainError::Infrastructure(format!(
                "failed to move {} into place: {e}",
                staging.display()
            ))
        })?;

        tracing::debug!(path = %path.display(), bytes = raw.len(), "wrote save slot");
        Ok(())
    }
}
