//! End-to-end registry behaviour over the public API.

use node_registry::{
    AccessSessionRecord, AuthStatus, FixedTimeSource, InMemoryKVStore, JsonNodeCodec, Node,
    NodeCodec, NodeRegistryApi, RegistryConfig, RegistryDependencies, RegistryError,
    RegistryService, Timestamp,
};
use std::sync::Arc;

type Registry = RegistryService<Arc<InMemoryKVStore>, JsonNodeCodec, Arc<FixedTimeSource>>;

fn ts(value: &str) -> Timestamp {
    Timestamp::parse(value).unwrap()
}

fn registry() -> (Registry, Arc<FixedTimeSource>) {
    let clock = Arc::new(FixedTimeSource::new(ts("2024-03-01 08:00:00")));
    let deps = RegistryDependencies {
        kv_store: Arc::new(InMemoryKVStore::new()),
        codec: JsonNodeCodec,
        time_source: clock.clone(),
    };
    (RegistryService::new(deps, RegistryConfig::default()), clock)
}

#[test]
fn codec_round_trips_every_node_shape() {
    let (registry, clock) = registry();
    registry.register_satellite("sat-1", "pk1").unwrap();
    registry.register_user_device("u1", "mac-A", "pkA").unwrap();
    registry.register_user_device("u1", "mac-B", "pkB").unwrap();
    clock.set(ts("2024-03-01 08:30:00"));
    registry
        .create_access_record(
            "u1",
            "mac-B",
            AccessSessionRecord::handover(
                "sat-1",
                "sat-0",
                ts("2024-03-01 08:20:00"),
                ts("2024-03-01 08:25:00"),
            ),
        )
        .unwrap();
    registry.register_user_device("u2", "mac-C", "pkC").unwrap();
    registry.change_auth_status("u2").unwrap();

    let codec = JsonNodeCodec;
    let nodes = registry.list_nodes().unwrap();
    assert_eq!(nodes.len(), 3);
    for node in nodes {
        let decoded: Node = codec.decode(&codec.encode(&node).unwrap()).unwrap();
        assert_eq!(decoded, node);
    }
}

#[test]
fn duplicate_satellite_keeps_original_key() {
    let (registry, _) = registry();

    registry.register_satellite("sat-1", "pk1").unwrap();
    let second = registry.register_satellite("sat-1", "pk2");

    assert!(matches!(second, Err(RegistryError::AlreadyExists { .. })));
    assert_eq!(registry.get_satellite_public_key("sat-1").unwrap(), "pk1");
}

#[test]
fn user_devices_accumulate() {
    let (registry, _) = registry();

    registry.register_user_device("u1", "mac-A", "pkA").unwrap();
    registry.register_user_device("u1", "mac-B", "pkB").unwrap();

    assert_eq!(registry.get_user_public_key("u1", "mac-A").unwrap(), "pkA");
    assert_eq!(registry.get_user_public_key("u1", "mac-B").unwrap(), "pkB");

    let again = registry.register_user_device("u1", "mac-A", "pkA");
    assert!(matches!(again, Err(RegistryError::AliasAlreadyExists { .. })));
}

#[test]
fn sessions_require_registered_device_and_keep_order() {
    let (registry, _) = registry();
    let r1 = AccessSessionRecord::normal(
        "sat-1",
        ts("2024-03-01 08:00:00"),
        ts("2024-03-01 08:05:00"),
    );
    let r2 = AccessSessionRecord::handover(
        "sat-2",
        "sat-1",
        ts("2024-03-01 08:05:00"),
        ts("2024-03-01 08:15:00"),
    );
    let r3 = AccessSessionRecord::fast(
        "sat-2",
        ts("2024-03-01 10:00:00"),
        ts("2024-03-01 10:02:00"),
    );

    registry.register_user_device("u1", "mac-B", "pkB").unwrap();
    let early = registry.create_access_record("u1", "mac-A", r1.clone());
    assert!(matches!(early, Err(RegistryError::DeviceNotRegistered { .. })));

    registry.register_user_device("u1", "mac-A", "pkA").unwrap();
    for record in [&r1, &r2, &r3] {
        registry
            .create_access_record("u1", "mac-A", record.clone())
            .unwrap();
    }

    let node = registry.get_node("u1").unwrap();
    assert_eq!(node.access_records("mac-A"), &[r1, r2, r3]);
    assert!(node.access_records("mac-B").is_empty());
}

#[test]
fn certification_is_idempotent() {
    let (registry, clock) = registry();
    registry.register_user_device("u1", "mac-A", "pkA").unwrap();

    clock.set(ts("2024-03-02 00:00:00"));
    let first = registry.change_auth_status("u1").unwrap();
    assert_eq!(first.status(), Some(AuthStatus::Certified));
    assert_eq!(first.updated_at.as_str(), "2024-03-02 00:00:00");

    let second = registry.change_auth_status("u1").unwrap();
    assert_eq!(second.status(), Some(AuthStatus::Certified));
}

#[test]
fn deleted_node_disappears() {
    let (registry, _) = registry();
    assert!(registry.list_nodes().unwrap().is_empty());

    registry.register_user_device("u1", "mac-A", "pkA").unwrap();
    registry.register_satellite("sat-1", "pk1").unwrap();
    registry.delete_node("u1").unwrap();

    assert!(matches!(
        registry.get_node("u1"),
        Err(RegistryError::NotFound { .. })
    ));
    assert!(registry.list_nodes().unwrap().iter().all(|n| n.id != "u1"));
}
