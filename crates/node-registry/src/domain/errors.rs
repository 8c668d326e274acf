//! # Domain Errors
//!
//! Error types for the Node Registry.
//!
//! Every failure is terminal for the operation that raised it: nothing is
//! retried internally and nothing is written on the error path.

use super::entities::NodeKind;
use thiserror::Error;

/// Result alias used across the registry.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors surfaced by registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A node with this id is already registered.
    #[error("node {id} already exists")]
    AlreadyExists { id: String },

    /// No node is stored under this id.
    #[error("node {id} does not exist")]
    NotFound { id: String },

    /// The operation does not apply to this kind of node.
    #[error("node {id} is a {actual} node, expected {expected}")]
    WrongNodeKind {
        id: String,
        expected: NodeKind,
        actual: NodeKind,
    },

    /// The alias already holds a public key; keys are never overwritten.
    #[error("public key for alias {alias} of node {id} already registered")]
    AliasAlreadyExists { id: String, alias: String },

    /// Sessions or keys were requested for a device that was never registered.
    #[error("device {alias} of node {id} is not registered, register it first")]
    DeviceNotRegistered { id: String, alias: String },

    /// The stored bytes under this key could not be decoded.
    #[error("corrupt record under key {key}: {reason}")]
    CorruptRecord { key: String, reason: String },

    /// Underlying ledger failure, propagated verbatim.
    #[error(transparent)]
    LedgerUnavailable(#[from] LedgerError),

    /// A caller-supplied argument is empty, oversized or reserved.
    #[error("invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// A caller-supplied access session record is internally inconsistent.
    #[error("invalid access record: {reason}")]
    InvalidAccessRecord { reason: String },
}

impl RegistryError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::AlreadyExists { .. } => "ALREADY_EXISTS",
            RegistryError::NotFound { .. } => "NOT_FOUND",
            RegistryError::WrongNodeKind { .. } => "WRONG_NODE_KIND",
            RegistryError::AliasAlreadyExists { .. } => "ALIAS_ALREADY_EXISTS",
            RegistryError::DeviceNotRegistered { .. } => "DEVICE_NOT_REGISTERED",
            RegistryError::CorruptRecord { .. } => "CORRUPT_RECORD",
            RegistryError::LedgerUnavailable(_) => "LEDGER_UNAVAILABLE",
            RegistryError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            RegistryError::InvalidAccessRecord { .. } => "INVALID_ACCESS_RECORD",
        }
    }

    pub(crate) fn not_found(id: &str) -> Self {
        RegistryError::NotFound { id: id.to_string() }
    }

    pub(crate) fn wrong_kind(id: &str, expected: NodeKind, actual: NodeKind) -> Self {
        RegistryError::WrongNodeKind {
            id: id.to_string(),
            expected,
            actual,
        }
    }
}

/// Ledger adapter errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// I/O error during read/write.
    #[error("ledger I/O error: {message}")]
    Io { message: String },

    /// The adapter reported damage in its own storage.
    #[error("ledger corruption: {message}")]
    Corruption { message: String },
}

/// Node record encode/decode failure.
#[derive(Debug, Error)]
#[error("codec error: {message}")]
pub struct CodecError {
    pub message: String,
}

impl CodecError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
