//! # Registry Runtime
//!
//! Hosts the node registry: resolves configuration, opens the selected
//! ledger, seeds it from a genesis file and serves JSON requests through
//! the registry's API handler.
//!
//! ## Start-up Sequence
//!
//! 1. Validate `RuntimeConfig`
//! 2. Open the ledger (in-memory or RocksDB)
//! 3. Wire `RegistryService` with the JSON codec and a fixed-offset clock
//! 4. Apply the genesis seed list through `InitLedger`

pub mod adapters;
pub mod config;
pub mod genesis;

pub use adapters::storage::{open_ledger, SharedLedger};
pub use config::{Backend, ConfigError, RuntimeConfig};
pub use genesis::GenesisError;

use node_registry::{
    ApiGatewayHandler, JsonNodeCodec, LedgerError, NodeRegistryApi, RegistryDependencies,
    RegistryError, RegistryService, SystemTimeSource,
};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

/// Registry service as wired by the runtime.
pub type Registry = RegistryService<SharedLedger, JsonNodeCodec, SystemTimeSource>;

/// Start-up failures.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("ledger unavailable: {0}")]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Genesis(#[from] GenesisError),

    #[error("genesis seeding failed: {0}")]
    Seed(#[from] RegistryError),
}

/// One entry of a batch file.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// A started registry ready to serve requests.
pub struct RegistryRuntime {
    handler: ApiGatewayHandler<Registry>,
}

impl RegistryRuntime {
    /// Validate `config`, open the ledger and apply the genesis file.
    pub fn start(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        config.validate()?;

        let ledger = open_ledger(&config)?;
        Self::seed_and_serve(config, ledger)
    }

    /// Validate `config` and start on an already opened ledger.
    pub fn with_ledger(config: RuntimeConfig, ledger: SharedLedger) -> Result<Self, RuntimeError> {
        config.validate()?;
        Self::seed_and_serve(config, ledger)
    }

    fn seed_and_serve(config: RuntimeConfig, ledger: SharedLedger) -> Result<Self, RuntimeError> {
        let deps = RegistryDependencies {
            kv_store: ledger,
            codec: JsonNodeCodec,
            time_source: SystemTimeSource::with_offset_hours(config.utc_offset_hours),
        };
        let service = RegistryService::new(deps, config.registry.clone());

        if let Some(path) = &config.genesis_file {
            let seeds = genesis::load_genesis_file(path)?;
            let applied = service.init_ledger(&seeds)?;
            info!(
                "[registry-runtime] Genesis {} applied: {} of {} entries",
                path.display(),
                applied,
                seeds.len()
            );
        }

        info!(
            backend = %config.backend,
            utc_offset_hours = config.utc_offset_hours,
            validate_records = service.config().validate_access_records,
            "[registry-runtime] Registry ready"
        );

        Ok(Self {
            handler: ApiGatewayHandler::new(service),
        })
    }

    /// Handle one request, returning its response envelope.
    pub fn handle(&self, method: &str, params: &Value) -> Value {
        self.handler.handle_request(method, params)
    }

    /// Handle requests in order. A failed request does not stop the batch.
    pub fn run_batch(&self, requests: &[BatchRequest]) -> Vec<Value> {
        requests
            .iter()
            .map(|request| self.handle(&request.method, &request.params))
            .collect()
    }

    pub fn service(&self) -> &Registry {
        self.handler.service()
    }
}
