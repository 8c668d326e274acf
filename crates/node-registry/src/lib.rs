//! # Node Registry
//!
//! Tracks network-identity nodes (satellites and user devices) and the
//! history of access sessions between them, persisted in an ordered
//! key-value ledger.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Unique Ids | One ledger key per node id; creation checks non-existence |
//! | 2 | Single Satellite Key | A satellite holds exactly one public key |
//! | 3 | Immutable Aliases | A registered device key is never overwritten |
//! | 4 | Registered Devices Only | Sessions are logged only for registered devices |
//! | 5 | Append-Only Log | Sessions are never removed or reordered |
//! | 6 | Forward-Only Status | Uncertified -> Certified, never back |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Pure domain logic (entities, key directory, session log)
//! - `ports/` - Port traits (inbound API, outbound ledger/codec/clock)
//! - `adapters/` - In-memory ledger, JSON codec, clocks, request handler
//! - `service/` - Node repository and the registry service
//!
//! ## Usage
//!
//! ```ignore
//! use node_registry::{
//!     InMemoryKVStore, JsonNodeCodec, NodeRegistryApi, RegistryConfig,
//!     RegistryDependencies, RegistryService, SystemTimeSource,
//! };
//!
//! let deps = RegistryDependencies {
//!     kv_store: InMemoryKVStore::new(),
//!     codec: JsonNodeCodec,
//!     time_source: SystemTimeSource::utc(),
//! };
//! let registry = RegistryService::new(deps, RegistryConfig::default());
//!
//! registry.register_satellite("sat-1", "pk1")?;
//! registry.register_user_device("u1", "aa:bb:cc:dd:ee:ff", "pkA")?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export key types for convenience
pub use adapters::{
    ApiGatewayHandler, ApiQueryError, FixedTimeSource, InMemoryKVStore, JsonNodeCodec,
    SystemTimeSource,
};
pub use domain::entities::{
    AccessSessionRecord, AccessType, AuthStatus, Node, NodeKind, NodePayload, Timestamp,
    TIMESTAMP_FORMAT,
};
pub use domain::errors::{CodecError, LedgerError, RegistryError, RegistryResult};
pub use domain::public_keys::SATELLITE_KEY_ALIAS;
pub use domain::value_objects::{RegistryConfig, SeedNode};
pub use ports::inbound::NodeRegistryApi;
pub use ports::outbound::{KeyValueStore, NodeCodec, TimeSource};
pub use service::{NodeRepository, RegistryDependencies, RegistryService};
