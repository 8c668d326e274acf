//! # Public-Key Directory
//!
//! Alias -> public key lookups over a node's key material.
//!
//! A satellite exposes its single key under [`SATELLITE_KEY_ALIAS`]; a user
//! keeps one key per device MAC address. Keys are opaque strings and an alias,
//! once present, is never overwritten.

use super::entities::{Node, NodeKind, NodePayload};
use super::errors::{RegistryError, RegistryResult};

/// Reserved alias under which a satellite's key is addressed.
///
/// Contains characters that never appear in a MAC address.
pub const SATELLITE_KEY_ALIAS: &str = "@satellite";

/// Check whether `alias` holds a key on this node.
pub fn has_alias(node: &Node, alias: &str) -> bool {
    match &node.payload {
        NodePayload::Satellite { .. } => alias == SATELLITE_KEY_ALIAS,
        NodePayload::User { public_keys, .. } => public_keys.contains_key(alias),
    }
}

/// Look up the key stored under `alias`.
///
/// Fails `DeviceNotRegistered` when the alias is absent.
pub fn get_key<'a>(node: &'a Node, alias: &str) -> RegistryResult<&'a str> {
    let key = match &node.payload {
        NodePayload::Satellite { public_key } if alias == SATELLITE_KEY_ALIAS => {
            Some(public_key.as_str())
        }
        NodePayload::Satellite { .. } => None,
        NodePayload::User { public_keys, .. } => public_keys.get(alias).map(String::as_str),
    };

    key.ok_or_else(|| RegistryError::DeviceNotRegistered {
        id: node.id.clone(),
        alias: alias.to_string(),
    })
}

/// Insert a new key under `alias`.
///
/// Satellites hold exactly one key, so adding to one either collides with
/// the reserved alias or is the wrong operation for the node kind.
pub fn add_key(node: &mut Node, alias: &str, key: impl Into<String>) -> RegistryResult<()> {
    if has_alias(node, alias) {
        return Err(RegistryError::AliasAlreadyExists {
            id: node.id.clone(),
            alias: alias.to_string(),
        });
    }

    match &mut node.payload {
        NodePayload::User { public_keys, .. } => {
            public_keys.insert(alias.to_string(), key.into());
            Ok(())
        }
        NodePayload::Satellite { .. } => Err(RegistryError::wrong_kind(
            &node.id,
            NodeKind::User,
            NodeKind::Satellite,
        )),
    }
}
