//! # Node Repository
//!
//! Owns the node-id keyspace: every node lives under its own id as a single
//! encoded document.

use crate::domain::entities::Node;
use crate::domain::errors::{RegistryError, RegistryResult};
use crate::ports::outbound::{KeyValueStore, NodeCodec};

/// Node persistence over the ledger and the record codec.
pub struct NodeRepository<KV, C> {
    kv_store: KV,
    codec: C,
}

impl<KV, C> NodeRepository<KV, C>
where
    KV: KeyValueStore,
    C: NodeCodec,
{
    pub fn new(kv_store: KV, codec: C) -> Self {
        Self { kv_store, codec }
    }

    /// True iff a value is stored under `id`.
    pub fn exists(&self, id: &str) -> RegistryResult<bool> {
        Ok(self.kv_store.exists(id)?)
    }

    /// Load and decode a node.
    pub fn get(&self, id: &str) -> RegistryResult<Node> {
        let data = self
            .kv_store
            .get(id)?
            .ok_or_else(|| RegistryError::not_found(id))?;
        self.decode(id, &data)
    }

    /// Load a node if present.
    pub fn find(&self, id: &str) -> RegistryResult<Option<Node>> {
        match self.kv_store.get(id)? {
            Some(data) => self.decode(id, &data).map(Some),
            None => Ok(None),
        }
    }

    /// Encode and write a node under its id, replacing any prior value.
    ///
    /// Encoding happens before the write, so a codec failure persists nothing.
    pub fn put(&self, node: &Node) -> RegistryResult<()> {
        let data = self
            .codec
            .encode(node)
            .map_err(|e| RegistryError::CorruptRecord {
                key: node.id.clone(),
                reason: e.message,
            })?;
        self.kv_store.put(&node.id, &data)?;
        Ok(())
    }

    /// Remove a node. Fails `NotFound` if nothing was stored.
    pub fn delete(&self, id: &str) -> RegistryResult<()> {
        if !self.kv_store.exists(id)? {
            return Err(RegistryError::not_found(id));
        }
        self.kv_store.delete(id)?;
        Ok(())
    }

    /// Decode every stored node in ledger key order.
    ///
    /// One undecodable entry fails the whole enumeration.
    pub fn list_all(&self) -> RegistryResult<Vec<Node>> {
        self.kv_store
            .scan("", "")?
            .into_iter()
            .map(|(key, data)| self.decode(&key, &data))
            .collect()
    }

    fn decode(&self, key: &str, data: &[u8]) -> RegistryResult<Node> {
        let node = self.codec.decode(data).map_err(|e| {
            tracing::warn!(key, error = %e, "[node-registry] Undecodable node record");
            RegistryError::CorruptRecord {
                key: key.to_string(),
                reason: e.message,
            }
        })?;

        if node.id != key {
            tracing::warn!(
                key,
                stored_id = %node.id,
                "[node-registry] Node stored under foreign key"
            );
            return Err(RegistryError::CorruptRecord {
                key: key.to_string(),
                reason: format!("record carries id {}", node.id),
            });
        }
        Ok(node)
    }
}
