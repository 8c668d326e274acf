//! # In-Memory Ledger
//!
//! Ordered, thread-safe `KeyValueStore` for tests and the `memory` backend.

use crate::domain::errors::LedgerError;
use crate::ports::outbound::KeyValueStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory key-value store with lexicographic key order.
#[derive(Default)]
pub struct InMemoryKVStore {
    data: RwLock<BTreeMap<String, Vec<u8>>>,
    offline: AtomicBool,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an unreachable ledger: every call fails with an I/O error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    fn check_online(&self) -> Result<(), LedgerError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(LedgerError::Io {
                message: "in-memory ledger is offline".to_string(),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.check_online()?;
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.check_online()?;
        self.data.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), LedgerError> {
        self.check_online()?;
        self.data.write().remove(key);
        Ok(())
    }

    fn scan(&self, start: &str, end: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        self.check_online()?;

        if !start.is_empty() && !end.is_empty() && start >= end {
            return Ok(Vec::new());
        }

        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start)
        };
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end)
        };

        let data = self.data.read();
        Ok(data
            .range::<str, _>((lower, upper))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
