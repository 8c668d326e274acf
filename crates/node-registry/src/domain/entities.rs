//! # Domain Entities
//!
//! The node identity model and the access session records embedded in it.
//!
//! A node's payload is a tagged variant selected by its kind: satellites
//! carry a single public key, users carry a per-device key directory, an
//! access session log and a certification status. The serialized form
//! keeps the ledger document shape (`nodeType` discriminant, `publicKey`
//! as either a string or an alias map).

use super::errors::RegistryError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fixed-width timestamp layout used at every boundary.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Width of a formatted timestamp (`YYYY-MM-DD HH:MM:SS`).
pub const TIMESTAMP_LEN: usize = 19;

/// A wall-clock instant in `YYYY-MM-DD HH:MM:SS` form.
///
/// Always holds a canonical, zero-padded value, so lexicographic order
/// equals chronological order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(String);

impl Timestamp {
    /// Parse and validate a fixed-width timestamp string.
    pub fn parse(value: &str) -> Result<Self, RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidArgument {
            name: "timestamp",
            reason,
        };

        if value.len() != TIMESTAMP_LEN {
            return Err(invalid(format!(
                "expected {} characters in `{}`, got {}",
                TIMESTAMP_LEN,
                value,
                value.len()
            )));
        }
        let parsed = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
            .map_err(|e| invalid(format!("`{}`: {}", value, e)))?;

        // chrono accepts unpadded fields, so require the canonical rendering
        let canonical = Self::from_datetime(&parsed);
        if canonical.0 != value {
            return Err(invalid(format!(
                "`{}` is not in YYYY-MM-DD HH:MM:SS layout",
                value
            )));
        }
        Ok(canonical)
    }

    /// Format a calendar datetime.
    pub fn from_datetime(datetime: &NaiveDateTime) -> Self {
        Self(datetime.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Timestamp {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Timestamp::parse(&value)
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discriminant of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Satellite,
    User,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Satellite => write!(f, "satellite"),
            NodeKind::User => write!(f, "user"),
        }
    }
}

/// Certification state of a user node. Only ever moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStatus {
    #[default]
    Uncertified,
    Certified,
}

/// How a device attached to the serving satellite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    Normal,
    Fast,
    Handover,
}

/// One logged access session of a user device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessSessionRecord {
    pub access_type: AccessType,
    /// Satellite serving the session.
    pub satellite_id: String,
    /// Satellite the device was handed over from; empty unless `Handover`.
    #[serde(default)]
    pub previous_satellite_id: String,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
}

impl AccessSessionRecord {
    /// A regular attach to `satellite_id`.
    pub fn normal(satellite_id: impl Into<String>, start_at: Timestamp, end_at: Timestamp) -> Self {
        Self {
            access_type: AccessType::Normal,
            satellite_id: satellite_id.into(),
            previous_satellite_id: String::new(),
            start_at,
            end_at,
        }
    }

    /// A fast re-attach to `satellite_id`.
    pub fn fast(satellite_id: impl Into<String>, start_at: Timestamp, end_at: Timestamp) -> Self {
        Self {
            access_type: AccessType::Fast,
            ..Self::normal(satellite_id, start_at, end_at)
        }
    }

    /// A session handed over from `previous_satellite_id` to `satellite_id`.
    pub fn handover(
        satellite_id: impl Into<String>,
        previous_satellite_id: impl Into<String>,
        start_at: Timestamp,
        end_at: Timestamp,
    ) -> Self {
        Self {
            access_type: AccessType::Handover,
            satellite_id: satellite_id.into(),
            previous_satellite_id: previous_satellite_id.into(),
            start_at,
            end_at,
        }
    }
}

/// Kind-specific part of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "nodeType", rename_all = "lowercase")]
pub enum NodePayload {
    Satellite {
        #[serde(rename = "publicKey")]
        public_key: String,
    },
    User {
        /// Device MAC address -> public key.
        #[serde(rename = "publicKey")]
        public_keys: BTreeMap<String, String>,
        /// Device MAC address -> sessions in append order.
        #[serde(rename = "accessRecords", default)]
        access_log: BTreeMap<String, Vec<AccessSessionRecord>>,
        #[serde(rename = "authStatus", default)]
        status: AuthStatus,
    },
}

/// A registered identity: a satellite or a user with its devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Globally unique id, also the ledger key.
    pub id: String,
    #[serde(flatten)]
    pub payload: NodePayload,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Node {
    /// A new satellite node holding one public key.
    pub fn new_satellite(
        id: impl Into<String>,
        public_key: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            payload: NodePayload::Satellite {
                public_key: public_key.into(),
            },
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// A new, uncertified user node with its first device.
    pub fn new_user(
        id: impl Into<String>,
        mac_addr: impl Into<String>,
        public_key: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        let mut public_keys = BTreeMap::new();
        public_keys.insert(mac_addr.into(), public_key.into());

        Self {
            id: id.into(),
            payload: NodePayload::User {
                public_keys,
                access_log: BTreeMap::new(),
                status: AuthStatus::Uncertified,
            },
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.payload {
            NodePayload::Satellite { .. } => NodeKind::Satellite,
            NodePayload::User { .. } => NodeKind::User,
        }
    }

    /// Certification status; `None` for satellites.
    pub fn status(&self) -> Option<AuthStatus> {
        match &self.payload {
            NodePayload::Satellite { .. } => None,
            NodePayload::User { status, .. } => Some(*status),
        }
    }

    /// Sessions logged for a device, empty when there are none.
    pub fn access_records(&self, alias: &str) -> &[AccessSessionRecord] {
        match &self.payload {
            NodePayload::User { access_log, .. } => {
                access_log.get(alias).map(Vec::as_slice).unwrap_or(&[])
            }
            NodePayload::Satellite { .. } => &[],
        }
    }

    /// Fail with `WrongNodeKind` unless this node is of `expected` kind.
    pub fn ensure_kind(&self, expected: NodeKind) -> Result<(), RegistryError> {
        let actual = self.kind();
        if actual != expected {
            return Err(RegistryError::wrong_kind(&self.id, expected, actual));
        }
        Ok(())
    }

    /// Move the node to `Certified`. Repeated calls are no-ops.
    pub fn certify(&mut self) -> Result<(), RegistryError> {
        match &mut self.payload {
            NodePayload::User { status, .. } => {
                *status = AuthStatus::Certified;
                Ok(())
            }
            NodePayload::Satellite { .. } => Err(RegistryError::wrong_kind(
                &self.id,
                NodeKind::User,
                NodeKind::Satellite,
            )),
        }
    }

    /// Stamp a successful mutation.
    pub fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}
