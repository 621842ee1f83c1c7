//! File-backed key-value store.
//!
//! Each slot is one file, `<dir>/<key>.json`. Writes go to a temporary file
//! first and are renamed into place, so a crash never leaves a half-written
//! slot behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use poppin_deli_core::storage::{KeyValueStore, StorageError};

/// Storage handle shared between the cart and the content cache.
pub type SharedStore = Arc<dyn KeyValueStore + Send + Sync>;

/// Key-value store persisting each slot as a file in one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "Opened file store");
        Ok(Self { dir })
    }

    /// Directory holding the slot files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Wrap this store for sharing.
    #[must_use]
    pub fn shared(self) -> SharedStore {
        Arc::new(self)
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
