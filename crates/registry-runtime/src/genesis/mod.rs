//! # Genesis Module
//!
//! Ledger seeding at start-up.
//!
//! A genesis file lists the nodes every fresh ledger starts with. It is
//! either a bare JSON array of seed entries or an object with a `nodes`
//! array (the `InitLedger` request shape):
//!
//! ```json
//! {"nodes": [
//!   {"nodeType": "satellite", "id": "sat-1", "publicKey": "pk1"},
//!   {"nodeType": "user", "id": "user-1", "macAddr": "macAddr1", "publicKey": "publicKey1"}
//! ]}
//! ```
//!
//! Seeding goes through `InitLedger`, so entries already present are
//! skipped and a restart against a durable ledger is harmless.

pub mod loader;

pub use loader::{load_genesis_file, parse_genesis, GenesisError};
