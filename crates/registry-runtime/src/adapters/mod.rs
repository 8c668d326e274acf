//! # Adapters
//!
//! Infrastructure adapters supplied by the runtime.

pub mod storage;
