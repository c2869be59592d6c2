use super::{StorageBackend, StorageKey};
use crate::error::{Result, SidenotesError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// File-backed storage: each key lives in `<root>/<key>.json`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn key_path(&self, key: StorageKey) -> PathBuf {
        self.root.join(format!("{}.json", key.as_str()))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(SidenotesError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read(&self, key: StorageKey) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(SidenotesError::Io)?;
        Ok(Some(content))
    }

    fn write(&self, key: StorageKey, value: &str) -> Result<()> {
        self.ensure_dir()?;

        let target = self.key_path(key);

        // Atomic write
        let tmp = self.root.join(format!(".{}-{}.tmp", key.as_str(), Uuid::new_v4()));
        fs::write(&tmp, value).map_err(SidenotesError::Io)?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(SidenotesError::Io(e));
        }

        debug!(key = %key, bytes = value.len(), "Wrote storage key");
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path).map_err(SidenotesError::Io)?;
        }
        Ok(())
    }
}
