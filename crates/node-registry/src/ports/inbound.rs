//! # Inbound Ports (Driving Ports)
//!
//! The operations callers invoke on the registry.

use crate::domain::entities::{AccessSessionRecord, Node};
use crate::domain::errors::RegistryResult;
use crate::domain::value_objects::SeedNode;

/// Primary API of the Node Registry.
///
/// Mutating operations read the node, apply the change in memory and write
/// it back with a single put, stamping `updatedAt`. On error nothing is
/// written. Reads never mutate.
pub trait NodeRegistryApi: Send + Sync {
    /// Create a satellite node holding `public_key`.
    ///
    /// ## Errors
    ///
    /// - `AlreadyExists`: a node with this id is already stored
    fn register_satellite(&self, id: &str, public_key: &str) -> RegistryResult<Node>;

    /// Register a device of a user, creating the user on first registration.
    ///
    /// ## Errors
    ///
    /// - `WrongNodeKind`: the id belongs to a satellite
    /// - `AliasAlreadyExists`: the device already holds a key
    fn register_user_device(
        &self,
        id: &str,
        mac_addr: &str,
        public_key: &str,
    ) -> RegistryResult<Node>;

    /// Append an access session to the log of a registered device.
    ///
    /// ## Errors
    ///
    /// - `NotFound`, `WrongNodeKind`, `DeviceNotRegistered`
    /// - `InvalidAccessRecord`: when record validation is enabled
    fn create_access_record(
        &self,
        id: &str,
        mac_addr: &str,
        record: AccessSessionRecord,
    ) -> RegistryResult<Node>;

    /// Mark a user as certified. Certifying twice is a no-op on the status.
    ///
    /// ## Errors
    ///
    /// - `NotFound`, `WrongNodeKind`
    fn change_auth_status(&self, id: &str) -> RegistryResult<Node>;

    /// The key of a satellite.
    fn get_satellite_public_key(&self, id: &str) -> RegistryResult<String>;

    /// The key of one device of a user.
    fn get_user_public_key(&self, id: &str, mac_addr: &str) -> RegistryResult<String>;

    /// Sessions of one device in append order.
    fn get_access_records(
        &self,
        id: &str,
        mac_addr: &str,
    ) -> RegistryResult<Vec<AccessSessionRecord>>;

    /// Sessions of one device served by `satellite_id`, in append order.
    fn get_access_records_with_satellite(
        &self,
        id: &str,
        mac_addr: &str,
        satellite_id: &str,
    ) -> RegistryResult<Vec<AccessSessionRecord>>;

    /// Load a node.
    fn get_node(&self, id: &str) -> RegistryResult<Node>;

    /// Check whether a node is stored under `id`.
    fn node_exists(&self, id: &str) -> RegistryResult<bool>;

    /// Remove a node entirely.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: nothing stored under `id`
    fn delete_node(&self, id: &str) -> RegistryResult<()>;

    /// Every node in ledger key order.
    ///
    /// ## Errors
    ///
    /// - `CorruptRecord`: any entry fails to decode (no partial results)
    fn list_nodes(&self) -> RegistryResult<Vec<Node>>;

    /// Apply the initial ledger contents, skipping entries already present.
    ///
    /// Returns the number of entries applied.
    fn init_ledger(&self, seed: &[SeedNode]) -> RegistryResult<usize>;
}
