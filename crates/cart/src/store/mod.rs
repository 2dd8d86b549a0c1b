//! Persistent key-value storage used to keep the cart across restarts.
//!
//! The cart only needs two operations from its storage engine: read a string
//! by key and overwrite a string by key. Anything that can do that (platform
//! key-value storage, a file per key, an embedded database) can back a cart
//! by implementing [`KeyValueStore`].

mod file;
mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be used by this backend.
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    /// The backend refused or could not complete the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous string key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
