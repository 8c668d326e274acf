//! # Registry Service
//!
//! The application service implementing `NodeRegistryApi`.
//!
//! ## Architecture
//!
//! This service:
//! 1. Loads the affected node through the `NodeRepository`
//! 2. Checks node kind, alias and record rules in the domain layer
//! 3. Mutates the node in memory and writes it back with a single put
//! 4. Serializes mutations per node id through `KeyLocks`

mod locks;
mod repository;

pub use locks::KeyLocks;
pub use repository::NodeRepository;

use crate::domain::access_log;
use crate::domain::entities::{AccessSessionRecord, Node, NodeKind};
use crate::domain::errors::{RegistryError, RegistryResult};
use crate::domain::public_keys::{self, SATELLITE_KEY_ALIAS};
use crate::domain::value_objects::{RegistryConfig, SeedNode};
use crate::ports::inbound::NodeRegistryApi;
use crate::ports::outbound::{KeyValueStore, NodeCodec, TimeSource};

/// The Node Registry service.
pub struct RegistryService<KV, C, TS>
where
    KV: KeyValueStore,
    C: NodeCodec,
    TS: TimeSource,
{
    /// Node persistence.
    repository: NodeRepository<KV, C>,
    /// Clock for `createdAt` / `updatedAt`.
    time_source: TS,
    /// Per-id mutation serialization.
    locks: KeyLocks,
    /// Service configuration.
    config: RegistryConfig,
}

/// Dependencies for RegistryService
pub struct RegistryDependencies<KV, C, TS> {
    pub kv_store: KV,
    pub codec: C,
    pub time_source: TS,
}

impl<KV, C, TS> RegistryService<KV, C, TS>
where
    KV: KeyValueStore,
    C: NodeCodec,
    TS: TimeSource,
{
    /// Create a new registry service with the given dependencies.
    pub fn new(deps: RegistryDependencies<KV, C, TS>, config: RegistryConfig) -> Self {
        Self {
            repository: NodeRepository::new(deps.kv_store, deps.codec),
            time_source: deps.time_source,
            locks: KeyLocks::new(),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Load a node, apply `mutate` and write it back stamped with the
    /// current time. The node is not written if `mutate` fails.
    fn update_node<F>(&self, id: &str, mutate: F) -> RegistryResult<Node>
    where
        F: FnOnce(&mut Node) -> RegistryResult<()>,
    {
        self.locks.with_lock(id, || {
            let mut node = self.repository.get(id)?;
            mutate(&mut node)?;
            node.touch(self.time_source.now());
            self.repository.put(&node)?;
            Ok(node)
        })
    }

    /// Load a user node and check `mac_addr` is registered on it.
    fn load_user_device(&self, id: &str, mac_addr: &str) -> RegistryResult<Node> {
        self.config.check_id("id", id)?;
        self.config.check_alias(mac_addr)?;

        let node = self.repository.get(id)?;
        node.ensure_kind(NodeKind::User)?;
        if !public_keys::has_alias(&node, mac_addr) {
            return Err(RegistryError::DeviceNotRegistered {
                id: id.to_string(),
                alias: mac_addr.to_string(),
            });
        }
        Ok(node)
    }

    fn insert_satellite(&self, id: &str, public_key: &str) -> RegistryResult<Node> {
        self.config.check_id("id", id)?;
        self.config.check_public_key(public_key)?;

        self.locks.with_lock(id, || {
            if self.repository.exists(id)? {
                return Err(RegistryError::AlreadyExists { id: id.to_string() });
            }

            let node = Node::new_satellite(id, public_key, self.time_source.now());
            self.repository.put(&node)?;
            Ok(node)
        })
    }

    fn insert_user_device(
        &self,
        id: &str,
        mac_addr: &str,
        public_key: &str,
    ) -> RegistryResult<Node> {
        self.config.check_id("id", id)?;
        self.config.check_alias(mac_addr)?;
        self.config.check_public_key(public_key)?;

        self.locks.with_lock(id, || {
            let now = self.time_source.now();

            let node = match self.repository.find(id)? {
                None => Node::new_user(id, mac_addr, public_key, now),
                Some(mut node) => {
                    node.ensure_kind(NodeKind::User)?;
                    public_keys::add_key(&mut node, mac_addr, public_key)?;
                    node.touch(now);
                    node
                }
            };
            self.repository.put(&node)?;
            Ok(node)
        })
    }

    fn append_session(
        &self,
        id: &str,
        mac_addr: &str,
        record: AccessSessionRecord,
    ) -> RegistryResult<Node> {
        self.config.check_id("id", id)?;
        self.config.check_alias(mac_addr)?;
        if self.config.validate_access_records {
            access_log::validate_record(&record)?;
        }

        self.update_node(id, |node| access_log::append(node, mac_addr, record))
    }

    fn remove_node(&self, id: &str) -> RegistryResult<()> {
        self.config.check_id("id", id)?;
        self.locks.with_lock(id, || self.repository.delete(id))
    }

    fn apply_seed(&self, entry: &SeedNode) -> RegistryResult<()> {
        match entry {
            SeedNode::Satellite { id, public_key } => {
                self.register_satellite(id, public_key).map(|_| ())
            }
            SeedNode::User {
                id,
                mac_addr,
                public_key,
            } => self
                .register_user_device(id, mac_addr, public_key)
                .map(|_| ()),
        }
    }
}

/// Log a rejected mutation and pass the outcome through.
fn log_rejection<T>(
    operation: &'static str,
    id: &str,
    result: RegistryResult<T>,
) -> RegistryResult<T> {
    if let Err(e) = &result {
        tracing::warn!(
            id,
            operation,
            code = e.code(),
            "[node-registry] Mutation rejected: {}",
            e
        );
    }
    result
}

impl<KV, C, TS> NodeRegistryApi for RegistryService<KV, C, TS>
where
    KV: KeyValueStore,
    C: NodeCodec,
    TS: TimeSource,
{
    fn register_satellite(&self, id: &str, public_key: &str) -> RegistryResult<Node> {
        let node = log_rejection(
            "register_satellite",
            id,
            self.insert_satellite(id, public_key),
        )?;

        tracing::info!(id, "[node-registry] 🛰 Registered satellite");
        Ok(node)
    }

    fn register_user_device(
        &self,
        id: &str,
        mac_addr: &str,
        public_key: &str,
    ) -> RegistryResult<Node> {
        let node = log_rejection(
            "register_user_device",
            id,
            self.insert_user_device(id, mac_addr, public_key),
        )?;

        tracing::info!(id, alias = mac_addr, "[node-registry] Registered user device");
        Ok(node)
    }

    fn create_access_record(
        &self,
        id: &str,
        mac_addr: &str,
        record: AccessSessionRecord,
    ) -> RegistryResult<Node> {
        let access_type = record.access_type;
        let satellite_id = record.satellite_id.clone();
        let node = log_rejection(
            "create_access_record",
            id,
            self.append_session(id, mac_addr, record),
        )?;

        tracing::info!(
            id,
            alias = mac_addr,
            satellite = %satellite_id,
            ?access_type,
            "[node-registry] Logged access session"
        );
        Ok(node)
    }

    fn change_auth_status(&self, id: &str) -> RegistryResult<Node> {
        let result = self
            .config
            .check_id("id", id)
            .and_then(|()| self.update_node(id, Node::certify));
        let node = log_rejection("change_auth_status", id, result)?;

        tracing::info!(id, "[node-registry] ✅ User certified");
        Ok(node)
    }

    fn get_satellite_public_key(&self, id: &str) -> RegistryResult<String> {
        self.config.check_id("id", id)?;

        let node = self.repository.get(id)?;
        node.ensure_kind(NodeKind::Satellite)?;
        tracing::debug!(id, "[node-registry] Satellite key lookup");
        public_keys::get_key(&node, SATELLITE_KEY_ALIAS).map(str::to_string)
    }

    fn get_user_public_key(&self, id: &str, mac_addr: &str) -> RegistryResult<String> {
        let node = self.load_user_device(id, mac_addr)?;
        tracing::debug!(id, alias = mac_addr, "[node-registry] User key lookup");
        public_keys::get_key(&node, mac_addr).map(str::to_string)
    }

    fn get_access_records(
        &self,
        id: &str,
        mac_addr: &str,
    ) -> RegistryResult<Vec<AccessSessionRecord>> {
        let node = self.load_user_device(id, mac_addr)?;
        Ok(node.access_records(mac_addr).to_vec())
    }

    fn get_access_records_with_satellite(
        &self,
        id: &str,
        mac_addr: &str,
        satellite_id: &str,
    ) -> RegistryResult<Vec<AccessSessionRecord>> {
        let node = self.load_user_device(id, mac_addr)?;
        Ok(access_log::sessions_with_satellite(&node, mac_addr, satellite_id)
            .cloned()
            .collect())
    }

    fn get_node(&self, id: &str) -> RegistryResult<Node> {
        self.config.check_id("id", id)?;
        self.repository.get(id)
    }

    fn node_exists(&self, id: &str) -> RegistryResult<bool> {
        self.config.check_id("id", id)?;
        self.repository.exists(id)
    }

    fn delete_node(&self, id: &str) -> RegistryResult<()> {
        log_rejection("delete_node", id, self.remove_node(id))?;

        tracing::info!(id, "[node-registry] Deleted node");
        Ok(())
    }

    fn list_nodes(&self) -> RegistryResult<Vec<Node>> {
        let nodes = self.repository.list_all()?;
        tracing::debug!(count = nodes.len(), "[node-registry] Listed nodes");
        Ok(nodes)
    }

    fn init_ledger(&self, seed: &[SeedNode]) -> RegistryResult<usize> {
        let mut applied = 0;

        for entry in seed {
            match self.apply_seed(entry) {
                Ok(()) => applied += 1,
                Err(
                    RegistryError::AlreadyExists { .. } | RegistryError::AliasAlreadyExists { .. },
                ) => {
                    tracing::info!(
                        id = entry.id(),
                        "[node-registry] Seed entry already present, skipping"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(applied, total = seed.len(), "[node-registry] 💾 Ledger seeded");
        Ok(applied)
    }
}
