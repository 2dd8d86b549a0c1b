//! File-backed store: one file per key under a data directory.
//!
//! Keys are percent-encoded into portable file names
//! (`@GoMarketplace:cart-products` becomes `%40GoMarketplace%3Acart-products.kv`). Writes go to a temporary
//! file that is then renamed over the target, so a crash mid-write leaves the
//! previous value intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::{KeyValueStore, StoreError};

const FILE_EXTENSION: &str = "kv";

/// [`KeyValueStore`] that keeps each key in its own file.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Directory holding the store's files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKey`] if `key` is empty.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self
            .root
            .join(format!("{}.{FILE_EXTENSION}", urlencoding::encode(key))))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No stored value");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, value), fields(root = %self.root.display(), bytes = value.len()))]
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension(format!("{FILE_EXTENSION}.tmp"));

        let _guard = self.write_lock.lock().await;
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}
