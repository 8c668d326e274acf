//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the registry service. The host application
//! supplies the ledger, the record codec and the clock.

use crate::domain::entities::{Node, Timestamp};
use crate::domain::errors::{CodecError, LedgerError};
use std::sync::Arc;

/// Ordered key-value ledger holding one document per node id.
///
/// Single-key reads and writes are atomic. There is no compare-and-swap
/// and no multi-key transaction.
///
/// Production: `RocksDbStore` (registry-runtime/adapters/storage/rocksdb_adapter.rs)
/// Testing: `InMemoryKVStore` (adapters/memory.rs)
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Write a value, replacing whatever was stored under the key.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError>;

    /// Remove a key. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), LedgerError>;

    /// Entries with `start <= key < end` in ascending key order.
    ///
    /// An empty `start` scans from the first key, an empty `end` to the last.
    fn scan(&self, start: &str, end: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool, LedgerError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), LedgerError> {
        (**self).delete(key)
    }

    fn scan(&self, start: &str, end: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        (**self).scan(start, end)
    }

    fn exists(&self, key: &str) -> Result<bool, LedgerError> {
        (**self).exists(key)
    }
}

/// Node record serialization.
///
/// `decode(encode(n)) == n` for every node.
pub trait NodeCodec: Send + Sync {
    /// Serialize a node to the bytes stored under its id.
    fn encode(&self, node: &Node) -> Result<Vec<u8>, CodecError>;

    /// Deserialize stored bytes.
    fn decode(&self, data: &[u8]) -> Result<Node, CodecError>;
}

/// Abstract clock (for testability).
pub trait TimeSource: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> Timestamp;
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
