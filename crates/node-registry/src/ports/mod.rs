//! # Ports Layer
//!
//! Defines the port traits for the Node Registry.
//!
//! ## Hexagonal Architecture
//!
//! - `inbound.rs` - Driving ports (API exposed to callers)
//! - `outbound.rs` - Driven ports (ledger, codec and clock required by the service)

pub mod inbound;
pub mod outbound;
