//! # API Gateway Handler
//!
//! Maps named requests with JSON params onto `NodeRegistryApi`.

use super::types::{
    AccessRecordParams, AccessRecordQuery, DeviceParams, DeviceRegistration, IdParams,
    RecordParam, SatelliteRegistration, SeedParams,
};
use crate::domain::entities::AccessSessionRecord;
use crate::domain::errors::RegistryError;
use crate::ports::inbound::NodeRegistryApi;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Request handler wrapping a registry implementation.
pub struct ApiGatewayHandler<S: NodeRegistryApi> {
    service: S,
}

impl<S: NodeRegistryApi> ApiGatewayHandler<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Handle a request and render the outcome as a response envelope.
    ///
    /// `{"result": ...}` on success, `{"error": {"code", "message"}}` on failure.
    pub fn handle_request(&self, method: &str, params: &Value) -> Value {
        match handle_api_query(self, method, params) {
            Ok(result) => json!({ "result": result }),
            Err(e) => json!({
                "error": {
                    "code": e.code(),
                    "message": e.to_string(),
                }
            }),
        }
    }

    /// Get reference to underlying service
    pub fn service(&self) -> &S {
        &self.service
    }
}

/// API query error types.
#[derive(Debug, Error)]
pub enum ApiQueryError {
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to render result: {0}")]
    Internal(String),
}

impl ApiQueryError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiQueryError::UnknownMethod(_) => "UNKNOWN_METHOD",
            ApiQueryError::InvalidParams(_) => "INVALID_PARAMS",
            ApiQueryError::Registry(e) => e.code(),
            ApiQueryError::Internal(_) => "INTERNAL",
        }
    }
}

/// Dispatch a request by method name.
///
/// Legacy method names of the ledger contract (`SatelliteRegister`,
/// `UserRegister`, `IsNodeExists`, `GetAllNodes`) are accepted as aliases.
pub fn handle_api_query<S: NodeRegistryApi>(
    handler: &ApiGatewayHandler<S>,
    method: &str,
    params: &Value,
) -> Result<Value, ApiQueryError> {
    let service = &handler.service;

    match method {
        "RegisterSatellite" | "SatelliteRegister" => {
            let p: SatelliteRegistration = parse_params(params)?;
            render(service.register_satellite(&p.id, &p.public_key)?)
        }
        "RegisterUserDevice" | "UserRegister" => {
            let p: DeviceRegistration = parse_params(params)?;
            render(service.register_user_device(&p.id, &p.mac_addr, &p.public_key)?)
        }
        "CreateAccessRecord" => {
            let p: AccessRecordParams = parse_params(params)?;
            let record = decode_record(p.record)?;
            render(service.create_access_record(&p.id, &p.mac_addr, record)?)
        }
        "ChangeAuthStatus" => {
            let p: IdParams = parse_params(params)?;
            render(service.change_auth_status(&p.id)?)
        }
        "GetSatellitePublicKey" => {
            let p: IdParams = parse_params(params)?;
            render(service.get_satellite_public_key(&p.id)?)
        }
        "GetUserPublicKey" => {
            let p: DeviceParams = parse_params(params)?;
            render(service.get_user_public_key(&p.id, &p.mac_addr)?)
        }
        "GetAccessRecords" => {
            let p: AccessRecordQuery = parse_params(params)?;
            let records = match &p.satellite_id {
                Some(satellite_id) => {
                    service.get_access_records_with_satellite(&p.id, &p.mac_addr, satellite_id)?
                }
                None => service.get_access_records(&p.id, &p.mac_addr)?,
            };
            render(records)
        }
        "GetNodeById" => {
            let p: IdParams = parse_params(params)?;
            render(service.get_node(&p.id)?)
        }
        "NodeExists" | "IsNodeExists" => {
            let p: IdParams = parse_params(params)?;
            render(service.node_exists(&p.id)?)
        }
        "DeleteNode" => {
            let p: IdParams = parse_params(params)?;
            service.delete_node(&p.id)?;
            Ok(Value::Null)
        }
        "ListNodes" | "GetAllNodes" => render(service.list_nodes()?),
        "InitLedger" => {
            let p: SeedParams = parse_params(params)?;
            render(service.init_ledger(&p.nodes)?)
        }
        _ => Err(ApiQueryError::UnknownMethod(method.to_string())),
    }
}

fn parse_params<T: DeserializeOwned>(params: &Value) -> Result<T, ApiQueryError> {
    T::deserialize(params).map_err(|e| ApiQueryError::InvalidParams(e.to_string()))
}

fn decode_record(param: RecordParam) -> Result<AccessSessionRecord, ApiQueryError> {
    match param {
        RecordParam::Inline(record) => Ok(record),
        RecordParam::Encoded(raw) => serde_json::from_str(&raw)
            .map_err(|e| ApiQueryError::InvalidParams(format!("record: {}", e))),
    }
}

fn render<T: Serialize>(value: T) -> Result<Value, ApiQueryError> {
    serde_json::to_value(value).map_err(|e| ApiQueryError::Internal(e.to_string()))
}
