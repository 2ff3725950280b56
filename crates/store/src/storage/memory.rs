//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use super::{CartStorage, StorageError};

#[derive(Debug)]
struct Record {
    value: String,
    touched: Instant,
}

impl Record {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_owned(),
            touched: Instant::now(),
        }
    }
}

/// Records held in a process-local map.
///
/// Nothing survives the process. Used by tests and by the storefront, where
/// each session's cart lives under its own key. Every read or write marks a
/// record as touched, and [`CartStorage::purge_idle`] drops the ones left
/// alone for too long.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: RwLock<HashMap<String, Record>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn purge_idle_at(&self, now: Instant, max_idle: Duration) -> Result<usize, StorageError> {
        let mut records = self.records.write().map_err(|_| StorageError::Poisoned)?;
        let before = records.len();
        records.retain(|_, record| now.saturating_duration_since(record.touched) <= max_idle);
        Ok(before - records.len())
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        // Write lock: reading refreshes the touch time.
        let mut records = self.records.write().map_err(|_| StorageError::Poisoned)?;
        Ok(records.get_mut(key).map(|record| {
            record.touched = Instant::now();
            record.value.clone()
        }))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut records = self.records.write().map_err(|_| StorageError::Poisoned)?;
        records.insert(key.to_owned(), Record::new(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut records = self.records.write().map_err(|_| StorageError::Poisoned)?;
        records.remove(key);
        Ok(())
    }

    fn purge_idle(&self, max_idle: Duration) -> Result<usize, StorageError> {
        self.purge_idle_at(Instant::now(), max_idle)
    }
}
