//! # Registry Runtime
//!
//! Command line front end for the node registry.
//!
//! ```text
//! registry-runtime [--data-dir D] [--backend memory|rocksdb] [--utc-offset H]
//!                  [--genesis FILE] invoke <METHOD> [PARAMS_JSON]
//! registry-runtime ... batch <FILE>
//! ```
//!
//! Responses are written to stdout as one JSON document per line; logs go
//! to stderr, filtered by `REGISTRY_LOG`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use registry_runtime::{Backend, BatchRequest, RegistryRuntime, RuntimeConfig};

/// Satellite and user-device node registry
#[derive(Parser, Debug)]
#[command(name = "registry-runtime", version)]
#[command(about = "Register satellites and user devices, log access sessions")]
struct Args {
    /// Directory for durable ledger data
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Ledger backend
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// UTC offset in hours used for node timestamps
    #[arg(long, allow_negative_numbers = true)]
    utc_offset: Option<i32>,

    /// Genesis seed file applied before the command runs
    #[arg(long)]
    genesis: Option<PathBuf>,

    /// Log filter used when REGISTRY_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single registry method
    Invoke {
        /// Method name, e.g. RegisterSatellite
        method: String,
        /// Method parameters as a JSON object
        params: Option<String>,
    },
    /// Run a JSON array of {"method", "params"} requests in order
    Batch { file: PathBuf },
}

/// Environment config with command line flags applied on top.
fn load_config(args: &Args) -> Result<RuntimeConfig> {
    let mut config = RuntimeConfig::from_env().context("invalid REGISTRY_* environment")?;

    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    if let Some(offset) = args.utc_offset {
        config.utc_offset_hours = offset;
    }
    if let Some(genesis) = &args.genesis {
        config.genesis_file = Some(genesis.clone());
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }

    Ok(config)
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env("REGISTRY_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_tracing(&config.log_level);

    let runtime = RegistryRuntime::start(config).context("failed to start registry")?;

    match args.command {
        Command::Invoke { method, params } => {
            let params: Value = match params {
                Some(raw) => serde_json::from_str(&raw)
                    .with_context(|| format!("PARAMS_JSON for {} is not valid JSON", method))?,
                None => Value::Null,
            };

            let response = runtime.handle(&method, &params);
            println!("{}", response);

            if let Some(error) = response.get("error") {
                bail!("{} failed with {}", method, error["code"]);
            }
        }
        Command::Batch { file } => {
            let data = std::fs::read_to_string(&file)
                .with_context(|| format!("cannot read batch file {}", file.display()))?;
            let requests: Vec<BatchRequest> = serde_json::from_str(&data)
                .with_context(|| format!("batch file {} is not a request array", file.display()))?;

            for response in runtime.run_batch(&requests) {
                println!("{}", response);
            }
        }
    }

    Ok(())
}
