//! Key-value backends for persisted cart records.
//!
//! A cart is persisted as one flat record: a string key mapped to the JSON
//! text of the cart. Backends only move strings around; encoding, decoding
//! and the fallback to an empty cart happen in the store.

mod file;
mod memory;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be used by this backend.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// A previous writer panicked while holding the records lock.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// A synchronous key-value record store.
///
/// Implementations use interior mutability so one handle can be shared
/// (`Arc<S>` forwards to `S`). Each call is complete when it returns.
pub trait CartStorage: Send + Sync {
    /// Read the record for `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the record for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the record for `key`. Deleting a missing record succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Delete every record not read or written within `max_idle`, returning
    /// how many were deleted. Backends that do not track access keep
    /// everything.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn purge_idle(&self, _max_idle: Duration) -> Result<usize, StorageError> {
        Ok(0)
    }
}

impl<S: CartStorage + ?Sized> CartStorage for Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn purge_idle(&self, max_idle: Duration) -> Result<usize, StorageError> {
        (**self).purge_idle(max_idle)
    }
}

impl<S: CartStorage + ?Sized> CartStorage for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn purge_idle(&self, max_idle: Duration) -> Result<usize, StorageError> {
        (**self).purge_idle(max_idle)
    }
}
