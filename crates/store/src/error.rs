//! Store error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors from cart mutations.
///
/// Reads never fail: an unreadable or missing record is an empty cart. Only
/// writing the updated record back can go wrong.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend rejected a write or remove.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be encoded.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;
