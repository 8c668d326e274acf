//! # Domain Layer
//!
//! Pure domain logic for the Node Registry. No I/O happens here.
//!
//! ## Modules
//!
//! - `entities` - Node, payload variants, access session records, timestamps
//! - `public_keys` - Alias -> public key directory rules
//! - `access_log` - Append-only per-device session history
//! - `value_objects` - Configuration and seed entries
//! - `errors` - Domain error types

pub mod access_log;
pub mod entities;
pub mod errors;
pub mod public_keys;
pub mod value_objects;
