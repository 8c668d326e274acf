//! # Adapters Module
//!
//! Adapter implementations for the Node Registry.
//!
//! ## Modules
//!
//! - `memory`: ordered in-memory ledger
//! - `codec`: JSON node record codec
//! - `time`: system and fixed clocks
//! - `api_handler`: JSON request dispatch onto the registry API

pub mod api_handler;
pub mod codec;
pub mod memory;
pub mod time;

pub use api_handler::{handle_api_query, ApiGatewayHandler, ApiQueryError};
pub use codec::JsonNodeCodec;
pub use memory::InMemoryKVStore;
pub use time::{FixedTimeSource, SystemTimeSource};
