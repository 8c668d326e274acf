//! Shared fixtures for registry tests.

use crate::adapters::{FixedTimeSource, InMemoryKVStore, JsonNodeCodec};
use crate::domain::entities::{AccessSessionRecord, Timestamp};
use crate::domain::value_objects::RegistryConfig;
use crate::service::{RegistryDependencies, RegistryService};
use std::sync::Arc;

pub const GENESIS_TIME: &str = "2024-03-01 08:00:00";

pub type TestRegistry = RegistryService<Arc<InMemoryKVStore>, JsonNodeCodec, Arc<FixedTimeSource>>;

/// Parse a timestamp literal.
pub fn ts(value: &str) -> Timestamp {
    Timestamp::parse(value).expect("valid timestamp literal")
}

/// Service over a fresh in-memory ledger and a clock fixed at `GENESIS_TIME`.
///
/// The ledger and clock handles are returned for direct manipulation.
pub fn make_test_registry(
    config: RegistryConfig,
) -> (TestRegistry, Arc<InMemoryKVStore>, Arc<FixedTimeSource>) {
    let store = Arc::new(InMemoryKVStore::new());
    let clock = Arc::new(FixedTimeSource::new(ts(GENESIS_TIME)));
    let deps = RegistryDependencies {
        kv_store: store.clone(),
        codec: JsonNodeCodec,
        time_source: clock.clone(),
    };
    (RegistryService::new(deps, config), store, clock)
}

/// A normal attach to `satellite_id` between `start` and `end`.
pub fn session(satellite_id: &str, start: &str, end: &str) -> AccessSessionRecord {
    AccessSessionRecord::normal(satellite_id, ts(start), ts(end))
}
