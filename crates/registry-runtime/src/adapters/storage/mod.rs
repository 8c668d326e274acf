//! # Storage Adapters
//!
//! Ledger backends plugged into the registry's `KeyValueStore` port.
//!
//! - `InMemoryKVStore` (from `node-registry`): always available
//! - `RocksDbStore`: durable ledger, behind the `rocksdb` feature

#[cfg(feature = "rocksdb")]
mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore};

use crate::config::{Backend, RuntimeConfig};
use node_registry::{InMemoryKVStore, KeyValueStore, LedgerError};
use std::sync::Arc;
use tracing::info;

/// Ledger shared by the service and its callers.
pub type SharedLedger = Arc<dyn KeyValueStore>;

/// Open the ledger selected by `config.backend`.
pub fn open_ledger(config: &RuntimeConfig) -> Result<SharedLedger, LedgerError> {
    match config.backend {
        Backend::Memory => {
            info!("[registry-runtime] Using in-memory ledger");
            Ok(Arc::new(InMemoryKVStore::new()))
        }
        Backend::RocksDb => open_rocksdb(config),
    }
}

#[cfg(feature = "rocksdb")]
fn open_rocksdb(config: &RuntimeConfig) -> Result<SharedLedger, LedgerError> {
    let path = config.ledger_path();
    info!("[registry-runtime] Opening RocksDB ledger at {}", path.display());
    let store = RocksDbStore::open(RocksDbConfig {
        path: path.to_string_lossy().into_owned(),
        ..RocksDbConfig::default()
    })?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "rocksdb"))]
fn open_rocksdb(_config: &RuntimeConfig) -> Result<SharedLedger, LedgerError> {
    Err(LedgerError::Io {
        message: "rocksdb backend not compiled in (enable the `rocksdb` feature)".to_string(),
    })
}
