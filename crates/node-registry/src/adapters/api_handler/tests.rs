//! # API Handler Tests

use super::*;
use crate::domain::entities::AuthStatus;
use crate::domain::value_objects::RegistryConfig;
use crate::ports::inbound::NodeRegistryApi;
use crate::test_utils::{make_test_registry, TestRegistry};
use serde_json::json;

fn make_handler() -> ApiGatewayHandler<TestRegistry> {
    ApiGatewayHandler::new(make_test_registry(RegistryConfig::default()).0)
}

#[test]
fn test_register_and_query_satellite() {
    let handler = make_handler();

    let response = handler.handle_request(
        "RegisterSatellite",
        &json!({"id": "sat-1", "publicKey": "pk1"}),
    );
    assert_eq!(response["result"]["nodeType"], "satellite");

    let response = handler.handle_request("GetSatellitePublicKey", &json!({"id": "sat-1"}));
    assert_eq!(response["result"], "pk1");

    let response = handler.handle_request(
        "SatelliteRegister",
        &json!({"id": "sat-1", "publicKey": "pk2"}),
    );
    assert_eq!(response["error"]["code"], "ALREADY_EXISTS");
}

#[test]
fn test_access_record_inline_and_encoded() {
    let handler = make_handler();
    handler.handle_request(
        "RegisterUserDevice",
        &json!({"id": "u1", "macAddr": "mac-A", "publicKey": "pkA"}),
    );

    let inline = json!({
        "accessType": "normal",
        "satelliteId": "sat-1",
        "startAt": "2024-03-01 08:00:00",
        "endAt": "2024-03-01 08:10:00"
    });
    let response = handler.handle_request(
        "CreateAccessRecord",
        &json!({"id": "u1", "macAddr": "mac-A", "record": inline}),
    );
    assert!(response.get("error").is_none(), "{}", response);

    let encoded = json!({
        "accessType": "handover",
        "satelliteId": "sat-2",
        "previousSatelliteId": "sat-1",
        "startAt": "2024-03-01 08:10:00",
        "endAt": "2024-03-01 08:20:00"
    })
    .to_string();
    let response = handler.handle_request(
        "CreateAccessRecord",
        &json!({"id": "u1", "macAddr": "mac-A", "record": encoded}),
    );
    assert!(response.get("error").is_none(), "{}", response);

    let response = handler.handle_request(
        "GetAccessRecords",
        &json!({"id": "u1", "macAddr": "mac-A"}),
    );
    let records = response["result"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["accessType"], "handover");
    assert_eq!(records[1]["previousSatelliteId"], "sat-1");

    let response = handler.handle_request(
        "GetAccessRecords",
        &json!({"id": "u1", "macAddr": "mac-A", "satelliteId": "sat-2"}),
    );
    assert_eq!(response["result"].as_array().unwrap().len(), 1);
}

#[test]
fn test_error_codes() {
    let handler = make_handler();

    let response = handler.handle_request("GetNodeById", &json!({"id": "ghost"}));
    assert_eq!(response["error"]["code"], "NOT_FOUND");

    let response = handler.handle_request("RegisterSatellite", &json!({"id": "sat-1"}));
    assert_eq!(response["error"]["code"], "INVALID_PARAMS");

    let response = handler.handle_request("TransferOwnership", &json!({}));
    assert_eq!(response["error"]["code"], "UNKNOWN_METHOD");

    let response = handler.handle_request(
        "CreateAccessRecord",
        &json!({"id": "u1", "macAddr": "mac-A", "record": "{not json"}),
    );
    assert_eq!(response["error"]["code"], "INVALID_PARAMS");
}

#[test]
fn test_list_exists_delete() {
    let handler = make_handler();

    let response = handler.handle_request("ListNodes", &serde_json::Value::Null);
    assert_eq!(response["result"], json!([]));

    handler.handle_request(
        "InitLedger",
        &json!({"nodes": [
            {"nodeType": "satellite", "id": "sat-1", "publicKey": "pk1"},
            {"nodeType": "user", "id": "user-1", "macAddr": "macAddr1", "publicKey": "publicKey1"}
        ]}),
    );

    let response = handler.handle_request("GetAllNodes", &serde_json::Value::Null);
    assert_eq!(response["result"].as_array().unwrap().len(), 2);

    let response = handler.handle_request("IsNodeExists", &json!({"id": "user-1"}));
    assert_eq!(response["result"], true);

    let response = handler.handle_request("DeleteNode", &json!({"id": "user-1"}));
    assert_eq!(response["result"], serde_json::Value::Null);

    let response = handler.handle_request("NodeExists", &json!({"id": "user-1"}));
    assert_eq!(response["result"], false);
}

#[test]
fn test_change_auth_status() {
    let handler = make_handler();
    handler.handle_request(
        "RegisterUserDevice",
        &json!({"id": "u1", "macAddr": "mac-A", "publicKey": "pkA"}),
    );

    let response = handler.handle_request("ChangeAuthStatus", &json!({"id": "u1"}));
    assert_eq!(response["result"]["authStatus"], "certified");
    assert_eq!(
        handler.service().get_node("u1").unwrap().status(),
        Some(AuthStatus::Certified)
    );
}
