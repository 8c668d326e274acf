//! # API Handler Types
//!
//! Parameter shapes accepted by the request handler (camelCase JSON).

use crate::domain::entities::AccessSessionRecord;
use crate::domain::value_objects::SeedNode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct IdParams {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteRegistration {
    pub id: String,
    pub public_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRegistration {
    pub id: String,
    pub mac_addr: String,
    pub public_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceParams {
    pub id: String,
    pub mac_addr: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRecordQuery {
    pub id: String,
    pub mac_addr: String,
    /// Restrict to sessions served by this satellite.
    #[serde(default)]
    pub satellite_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRecordParams {
    pub id: String,
    pub mac_addr: String,
    pub record: RecordParam,
}

/// A session record given inline or as an encoded JSON string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecordParam {
    Inline(AccessSessionRecord),
    Encoded(String),
}

#[derive(Debug, Deserialize)]
pub struct SeedParams {
    pub nodes: Vec<SeedNode>,
}
