//! # Access Session Log
//!
//! Append-only, per-device session history of a user node.
//!
//! The log is keyed by device alias only; the serving satellite travels
//! inside each record. Per-(device, satellite) views are derived by
//! filtering, never stored.

use super::entities::{AccessSessionRecord, AccessType, Node, NodeKind, NodePayload};
use super::errors::{RegistryError, RegistryResult};
use super::public_keys::has_alias;

/// Append `record` to the session log of device `alias`.
///
/// The node must be a user and the device must already hold a key. The
/// record is stored as supplied; see [`validate_record`] for the shape
/// checks applied at the service boundary.
pub fn append(node: &mut Node, alias: &str, record: AccessSessionRecord) -> RegistryResult<()> {
    node.ensure_kind(NodeKind::User)?;

    if !has_alias(node, alias) {
        return Err(RegistryError::DeviceNotRegistered {
            id: node.id.clone(),
            alias: alias.to_string(),
        });
    }

    if let NodePayload::User { access_log, .. } = &mut node.payload {
        access_log.entry(alias.to_string()).or_default().push(record);
    }
    Ok(())
}

/// Sessions of device `alias` served by `satellite_id`, in append order.
pub fn sessions_with_satellite<'a>(
    node: &'a Node,
    alias: &str,
    satellite_id: &'a str,
) -> impl Iterator<Item = &'a AccessSessionRecord> + 'a {
    node.access_records(alias)
        .iter()
        .filter(move |r| r.satellite_id == satellite_id)
}

/// Shape checks on a caller-supplied record.
///
/// - `satelliteId` is non-empty
/// - `startAt <= endAt`
/// - `previousSatelliteId` is set iff the access type is `Handover`
///
/// Continuity with the device's previous session is not checked.
pub fn validate_record(record: &AccessSessionRecord) -> RegistryResult<()> {
    let invalid = |reason: String| Err(RegistryError::InvalidAccessRecord { reason });

    if record.satellite_id.is_empty() {
        return invalid("satelliteId is empty".to_string());
    }
    if record.start_at > record.end_at {
        return invalid(format!(
            "session starts at {} after it ends at {}",
            record.start_at, record.end_at
        ));
    }

    match record.access_type {
        AccessType::Handover if record.previous_satellite_id.is_empty() => {
            invalid("handover record without previousSatelliteId".to_string())
        }
        AccessType::Normal | AccessType::Fast if !record.previous_satellite_id.is_empty() => {
            invalid(format!(
                "previousSatelliteId {} set on a non-handover record",
                record.previous_satellite_id
            ))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Timestamp;

    fn ts(value: &str) -> Timestamp {
        Timestamp::parse(value).unwrap()
    }

    fn user() -> Node {
        Node::new_user("u1", "mac-A", "pkA", ts("2024-03-01 08:00:00"))
    }

    fn attach(satellite_id: &str) -> AccessSessionRecord {
        AccessSessionRecord::normal(
            satellite_id,
            ts("2024-03-01 08:00:00"),
            ts("2024-03-01 08:10:00"),
        )
    }

    #[test]
    fn test_append_preserves_order() {
        let mut node = user();
        let r1 = AccessSessionRecord::normal(
            "sat-1",
            ts("2024-03-01 08:00:00"),
            ts("2024-03-01 08:10:00"),
        );
        let r2 = AccessSessionRecord::handover(
            "sat-2",
            "sat-1",
            ts("2024-03-01 08:10:00"),
            ts("2024-03-01 08:20:00"),
        );
        let r3 = AccessSessionRecord::fast(
            "sat-1",
            ts("2024-03-01 09:00:00"),
            ts("2024-03-01 09:05:00"),
        );

        append(&mut node, "mac-A", r1.clone()).unwrap();
        append(&mut node, "mac-A", r2.clone()).unwrap();
        append(&mut node, "mac-A", r3.clone()).unwrap();

        assert_eq!(node.access_records("mac-A"), &[r1.clone(), r2, r3.clone()]);

        let with_sat1: Vec<_> = sessions_with_satellite(&node, "mac-A", "sat-1")
            .cloned()
            .collect();
        assert_eq!(with_sat1, vec![r1, r3]);
    }

    #[test]
    fn test_append_requires_registered_device() {
        let mut node = user();
        let record = attach("sat-1");

        let result = append(&mut node, "mac-B", record);
        assert!(matches!(
            result,
            Err(RegistryError::DeviceNotRegistered { .. })
        ));
        assert!(node.access_records("mac-B").is_empty());
    }

    #[test]
    fn test_append_rejects_satellite() {
        let mut node = Node::new_satellite("sat-1", "pk1", ts("2024-03-01 08:00:00"));
        let record = attach("sat-1");

        assert!(matches!(
            append(&mut node, "mac-A", record),
            Err(RegistryError::WrongNodeKind { .. })
        ));
    }

    #[test]
    fn test_validate_record() {
        let start = ts("2024-03-01 08:00:00");
        let end = ts("2024-03-01 08:10:00");

        let normal = AccessSessionRecord::normal("sat-1", start.clone(), end.clone());
        let handover = AccessSessionRecord::handover("sat-2", "sat-1", start.clone(), end.clone());
        assert!(validate_record(&normal).is_ok());
        assert!(validate_record(&handover).is_ok());

        // Reversed interval
        let reversed = AccessSessionRecord::normal("sat-1", end.clone(), start.clone());
        assert!(validate_record(&reversed).is_err());

        // Handover without predecessor
        let orphan = AccessSessionRecord::handover("sat-2", "", start.clone(), end.clone());
        assert!(validate_record(&orphan).is_err());

        // Predecessor on a plain attach
        let mut fast = AccessSessionRecord::fast("sat-1", start.clone(), end.clone());
        fast.previous_satellite_id = "sat-0".to_string();
        assert!(validate_record(&fast).is_err());

        assert!(validate_record(&AccessSessionRecord::normal("", start, end)).is_err());
    }
}
