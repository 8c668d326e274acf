//! # Value Objects
//!
//! Configuration and immutable value types for the Node Registry.

use super::errors::{RegistryError, RegistryResult};
use super::public_keys::SATELLITE_KEY_ALIAS;
use serde::{Deserialize, Serialize};

/// Configuration for the registry service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Reject inconsistent access records (reversed interval, handover
    /// metadata on the wrong access type). Default: true.
    pub validate_access_records: bool,

    /// Maximum length of a node id or device alias (default: 256).
    pub max_id_len: usize,

    /// Maximum length of a public key string (default: 8192).
    pub max_public_key_len: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            validate_access_records: true,
            max_id_len: 256,
            max_public_key_len: 8192,
        }
    }
}

impl RegistryConfig {
    /// Config that stores caller-supplied records unchecked.
    pub fn permissive() -> Self {
        Self {
            validate_access_records: false,
            ..Self::default()
        }
    }

    pub(crate) fn check_id(&self, name: &'static str, value: &str) -> RegistryResult<()> {
        check_len(name, value, self.max_id_len)
    }

    pub(crate) fn check_alias(&self, value: &str) -> RegistryResult<()> {
        check_len("macAddr", value, self.max_id_len)?;
        if value == SATELLITE_KEY_ALIAS {
            return Err(RegistryError::InvalidArgument {
                name: "macAddr",
                reason: format!("`{}` is reserved for satellite keys", value),
            });
        }
        Ok(())
    }

    pub(crate) fn check_public_key(&self, value: &str) -> RegistryResult<()> {
        check_len("publicKey", value, self.max_public_key_len)
    }
}

fn check_len(name: &'static str, value: &str, max: usize) -> RegistryResult<()> {
    if value.is_empty() {
        return Err(RegistryError::InvalidArgument {
            name,
            reason: "must not be empty".to_string(),
        });
    }
    if value.len() > max {
        return Err(RegistryError::InvalidArgument {
            name,
            reason: format!("{} bytes exceeds limit of {}", value.len(), max),
        });
    }
    Ok(())
}

/// An entry of the initial ledger contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "nodeType", rename_all = "lowercase")]
pub enum SeedNode {
    Satellite {
        id: String,
        #[serde(rename = "publicKey")]
        public_key: String,
    },
    User {
        id: String,
        #[serde(rename = "macAddr")]
        mac_addr: String,
        #[serde(rename = "publicKey")]
        public_key: String,
    },
}

impl SeedNode {
    pub fn id(&self) -> &str {
        match self {
            SeedNode::Satellite { id, .. } | SeedNode::User { id, .. } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_checks() {
        let config = RegistryConfig::default();

        assert!(config.check_id("id", "sat-1").is_ok());
        assert!(config.check_id("id", "").is_err());
        assert!(config.check_id("id", &"x".repeat(257)).is_err());

        assert!(config.check_alias("aa:bb:cc:dd:ee:ff").is_ok());
        assert!(config.check_alias(SATELLITE_KEY_ALIAS).is_err());
    }

    #[test]
    fn test_seed_node_json() {
        let seeds: Vec<SeedNode> = serde_json::from_str(
            r#"[
                {"nodeType": "satellite", "id": "sat-1", "publicKey": "pk1"},
                {"nodeType": "user", "id": "user-1",
                 "macAddr": "macAddr1", "publicKey": "publicKey1"}
            ]"#,
        )
        .unwrap();

        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[0].id(), "sat-1");
        assert!(matches!(&seeds[1], SeedNode::User { mac_addr, .. } if mac_addr == "macAddr1"));
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: RegistryConfig =
            serde_json::from_str(r#"{"validate_access_records": false}"#).unwrap();
        assert!(!config.validate_access_records);
        assert_eq!(config.max_id_len, 256);
    }
}
