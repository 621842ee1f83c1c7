//! Bundled JSON files served when the feed is unavailable.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::sheets::SheetKind;

/// Errors loading a fallback file.
#[derive(Debug, Error)]
pub enum FallbackError {
    /// The content type ships no fallback file.
    #[error("no fallback file for {0}")]
    Unavailable(SheetKind),

    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid JSON of the expected shape.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Reads fallback files from one directory.
#[derive(Debug, Clone)]
pub struct FallbackData {
    dir: PathBuf,
}

impl FallbackData {
    /// Serve files from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the files are read from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load and decode the fallback file for `kind`.
    ///
    /// # Errors
    ///
    /// Returns error if `kind` has no fallback file, or the file cannot be
    /// read or decoded as `T`.
    pub async fn load<T: DeserializeOwned>(&self, kind: SheetKind) -> Result<T, FallbackError> {
        let file = kind.fallback_file().ok_or(FallbackError::Unavailable(kind))?;
        let path = self.dir.join(file);

        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FallbackError::Io {
                path: path.clone(),
                source,
            })?;
        let data = serde_json::from_str(&raw).map_err(|source| FallbackError::Parse {
            path: path.clone(),
            source,
        })?;

        debug!(%kind, path = %path.display(), "Loaded fallback data");
        Ok(data)
    }
}
