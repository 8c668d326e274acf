//! # Runtime Configuration
//!
//! Settings are resolved in three layers: built-in defaults, then
//! `REGISTRY_*` environment variables, then command line flags (applied by
//! `main`).
//!
//! | Variable | Field |
//! |----------|-------|
//! | `REGISTRY_DATA_DIR` | `data_dir` |
//! | `REGISTRY_BACKEND` | `backend` (`memory` or `rocksdb`) |
//! | `REGISTRY_UTC_OFFSET_HOURS` | `utc_offset_hours` |
//! | `REGISTRY_LOG_LEVEL` | `log_level` |
//! | `REGISTRY_GENESIS_FILE` | `genesis_file` |
//! | `REGISTRY_VALIDATE_RECORDS` | `registry.validate_access_records` |

use node_registry::RegistryConfig;
use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Smallest accepted UTC offset in hours.
pub const MIN_UTC_OFFSET_HOURS: i32 = -12;
/// Largest accepted UTC offset in hours.
pub const MAX_UTC_OFFSET_HOURS: i32 = 14;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("utc offset {0}h outside -12..=14")]
    UtcOffsetOutOfRange(i32),

    #[error("backend {0} is not compiled into this binary")]
    BackendUnavailable(Backend),
}

/// Ledger backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Backend {
    /// Process-local ordered map, lost on exit.
    #[default]
    Memory,
    /// RocksDB database under `data_dir`.
    #[value(name = "rocksdb")]
    RocksDb,
}

impl Backend {
    pub fn is_available(self) -> bool {
        match self {
            Backend::Memory => true,
            Backend::RocksDb => cfg!(feature = "rocksdb"),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Memory => write!(f, "memory"),
            Backend::RocksDb => write!(f, "rocksdb"),
        }
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "rocksdb" => Ok(Backend::RocksDb),
            _ => Err(ConfigError::InvalidValue {
                name: "REGISTRY_BACKEND",
                value: s.to_string(),
                reason: "expected memory or rocksdb".to_string(),
            }),
        }
    }
}

/// Host configuration for the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Directory holding durable ledger data.
    pub data_dir: PathBuf,
    pub backend: Backend,
    /// Fixed zone used when stamping `createdAt` / `updatedAt`.
    pub utc_offset_hours: i32,
    /// Default filter when `REGISTRY_LOG` is unset.
    pub log_level: String,
    /// Seed list applied at start-up.
    pub genesis_file: Option<PathBuf>,
    pub registry: RegistryConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            backend: Backend::Memory,
            utc_offset_hours: 8,
            log_level: "info".to_string(),
            genesis_file: None,
            registry: RegistryConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("REGISTRY_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(backend) = lookup("REGISTRY_BACKEND") {
            config.backend = backend.parse()?;
        }
        if let Some(offset) = lookup("REGISTRY_UTC_OFFSET_HOURS") {
            config.utc_offset_hours = offset.trim().parse().map_err(|e: ParseIntError| {
                ConfigError::InvalidValue {
                    name: "REGISTRY_UTC_OFFSET_HOURS",
                    value: offset.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(level) = lookup("REGISTRY_LOG_LEVEL") {
            config.log_level = level;
        }
        if let Some(file) = lookup("REGISTRY_GENESIS_FILE") {
            config.genesis_file = Some(PathBuf::from(file));
        }
        if let Some(flag) = lookup("REGISTRY_VALIDATE_RECORDS") {
            config.registry.validate_access_records =
                parse_bool("REGISTRY_VALIDATE_RECORDS", &flag)?;
        }

        Ok(config)
    }

    /// Reject settings the runtime cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_UTC_OFFSET_HOURS..=MAX_UTC_OFFSET_HOURS).contains(&self.utc_offset_hours) {
            return Err(ConfigError::UtcOffsetOutOfRange(self.utc_offset_hours));
        }
        if !self.backend.is_available() {
            return Err(ConfigError::BackendUnavailable(self.backend));
        }
        Ok(())
    }

    /// Location of the RocksDB ledger inside `data_dir`.
    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join("ledger")
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}
