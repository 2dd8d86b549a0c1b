//! Cart error types.
//!
//! Only setup mistakes reach callers. Hydration problems are recovered by
//! starting with an empty cart and persistence failures are logged and
//! dropped; those variants exist so the recovery paths can log a typed cause.

use thiserror::Error;

use crate::store::StoreError;

/// Errors produced by the cart library.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart was accessed through a session that has not been started.
    #[error("Cart accessed before the cart session was started")]
    NotInitialized,

    /// `start` was called on a session that is already running.
    #[error("Cart session is already started")]
    AlreadyStarted,

    /// The stored cart could not be read or parsed.
    #[error("Hydration error: {0}")]
    Hydration(String),

    /// The cart could not be serialized for storage.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
