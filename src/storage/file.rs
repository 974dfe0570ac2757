use super::contract::{StateKey, StateStore};
use crate::error::StorageError;
use std::path::{Path, PathBuf};

/// Stores each key as `<dir>/<key>.json`.
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: StateKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

impl StateStore for FileStateStore {
    fn load(&self, key: StateKey) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    fn save(&self, key: StateKey, blob: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        std::fs::write(&staging, blob)?;
        std::fs::rename(&staging, &path)?;
        tracing::debug!(key = %key, path = %path.display(), bytes = blob.len(), "state saved");
        Ok(())
    }

    fn clear(&self, key: StateKey) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}
