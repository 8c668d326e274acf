//! # API Gateway Handler
//!
//! JSON request surface of the registry.
//!
//! ## Modules
//!
//! - `handler`: ApiGatewayHandler struct and method dispatch
//! - `types`: request parameter shapes

mod handler;
#[cfg(test)]
mod tests;
mod types;

pub use handler::{handle_api_query, ApiGatewayHandler, ApiQueryError};
