//! # RocksDB Ledger Adapter
//!
//! Durable implementation of the registry's `KeyValueStore` port.
//!
//! Node documents live in the default column family keyed by node id.
//! RocksDB's bytewise comparator keeps keys in the same order as the
//! in-memory ledger, so range scans behave identically on both backends.
//!
//! ## Configuration
//!
//! - Snappy compression
//! - Bloom filters (10 bits per key)
//! - fsync on write for durability

use node_registry::{KeyValueStore, LedgerError};
use parking_lot::RwLock;
use rocksdb::{Direction, IteratorMode, Options, WriteOptions, DB};
use std::path::Path;
use std::sync::Arc;

/// RocksDB configuration for production use
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: String,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// Maximum number of write buffers (default: 3)
    pub max_write_buffer_number: i32,
    /// Enable fsync after each write (default: true for durability)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/ledger".to_string(),
            block_cache_size: 64 * 1024 * 1024,  // 64MB
            write_buffer_size: 16 * 1024 * 1024, // 16MB
            max_write_buffer_number: 3,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (smaller buffers, no sync)
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024,  // 8MB
            write_buffer_size: 4 * 1024 * 1024, // 4MB
            max_write_buffer_number: 2,
            sync_writes: false,
        }
    }
}

/// RocksDB-backed ledger implementing the KeyValueStore trait
pub struct RocksDbStore {
    db: Arc<RwLock<DB>>,
    config: RocksDbConfig,
}

impl RocksDbStore {
    /// Open or create a RocksDB database
    pub fn open(config: RocksDbConfig) -> Result<Self, LedgerError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_max_write_buffer_number(config.max_write_buffer_number);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        // Bloom filter for faster point lookups
        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let db = DB::open(&opts, &config.path).map_err(|e| LedgerError::Io {
            message: format!("Failed to open RocksDB: {}", e),
        })?;

        Ok(Self {
            db: Arc::new(RwLock::new(db)),
            config,
        })
    }

    /// Open with default tuning at `path`
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let config = RocksDbConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        };
        Self::open(config)
    }

    fn write_options(&self) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        write_opts
    }
}

impl KeyValueStore for RocksDbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let db = self.db.read();
        db.get(key.as_bytes()).map_err(|e| LedgerError::Io {
            message: format!("RocksDB get failed: {}", e),
        })
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        let db = self.db.write();
        db.put_opt(key.as_bytes(), value, &self.write_options())
            .map_err(|e| LedgerError::Io {
                message: format!("RocksDB put failed: {}", e),
            })
    }

    fn delete(&self, key: &str) -> Result<(), LedgerError> {
        let db = self.db.write();
        db.delete_opt(key.as_bytes(), &self.write_options())
            .map_err(|e| LedgerError::Io {
                message: format!("RocksDB delete failed: {}", e),
            })
    }

    fn scan(&self, start: &str, end: &str) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        let db = self.db.read();
        let mode = if start.is_empty() {
            IteratorMode::Start
        } else {
            IteratorMode::From(start.as_bytes(), Direction::Forward)
        };

        let mut entries = Vec::new();
        for item in db.iterator(mode) {
            let (key, value) = item.map_err(|e| LedgerError::Io {
                message: format!("RocksDB iteration failed: {}", e),
            })?;
            if !end.is_empty() && key.as_ref() >= end.as_bytes() {
                break;
            }
            let key = String::from_utf8(key.into_vec()).map_err(|e| LedgerError::Corruption {
                message: format!("non UTF-8 ledger key: {}", e),
            })?;
            entries.push((key, value.into_vec()));
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_temp() -> (RocksDbStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let config = RocksDbConfig::for_testing(dir.path().to_string_lossy().to_string());
        let store = RocksDbStore::open(config).unwrap();
        (store, dir)
    }

    #[test]
    fn test_open_and_basic_ops() {
        let (store, _dir) = open_temp();

        store.put("sat-1", b"value1").unwrap();
        assert_eq!(store.get("sat-1").unwrap(), Some(b"value1".to_vec()));
        assert!(store.exists("sat-1").unwrap());

        store.delete("sat-1").unwrap();
        assert_eq!(store.get("sat-1").unwrap(), None);

        // Absent keys delete silently
        store.delete("sat-1").unwrap();
    }

    #[test]
    fn test_scan_ranges() {
        let (store, _dir) = open_temp();
        for key in ["u2", "sat-1", "u1", "sat-2"] {
            store.put(key, key.as_bytes()).unwrap();
        }

        let keys = |start: &str, end: &str| -> Vec<String> {
            store
                .scan(start, end)
                .unwrap()
                .into_iter()
                .map(|(k, _)| k)
                .collect()
        };

        assert_eq!(keys("", ""), vec!["sat-1", "sat-2", "u1", "u2"]);
        assert_eq!(keys("sat-2", "u2"), vec!["sat-2", "u1"]);
    }

    #[test]
    fn test_persistence_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_string_lossy().to_string();

        {
            let store = RocksDbStore::open(RocksDbConfig::for_testing(path.clone())).unwrap();
            store.put("u1", b"doc").unwrap();
        }

        let store = RocksDbStore::open_default(&path).unwrap();
        assert_eq!(store.get("u1").unwrap(), Some(b"doc".to_vec()));
    }
}
