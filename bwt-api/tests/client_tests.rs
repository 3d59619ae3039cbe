//! Integration tests for `BwtClient` against a mock device

use bwt_api::{ApiError, BwtClient, DeviceError, SoftenerState};

const CURRENT_DATA_BODY: &str = r#"{
    "FirmwareVersion": "2.0200",
    "SoftenerState": 0,
    "CurrentFlowrate_l_h": 0,
    "BlendedWaterSinceSetup_l": 483523,
    "TreatedWaterDay_l": 210,
    "TreatedWaterMonth_l": 5400,
    "TreatedWaterYear_l": 88210,
    "HardnessIn_dH": 20.0,
    "HardnessOut_dH": 5.0,
    "RegenerantLevel_percent": 62,
    "RegenerantDays": 148,
    "RegenerantSinceSetup_g": 64350,
    "LastRegenerationColumn1": 1700000000,
    "LastRegenerationColumn2": 1699913600,
    "RegenerationCounterColumn1": 412,
    "RegenerationCounterColumn2": 409,
    "CapacityColumn1": 2950000.0,
    "CapacityColumn2": 3100000.0,
    "ServiceCustomer": 1735000000,
    "ServiceTechnician": 0,
    "HolidayMode": 0,
    "ActiveErrorIds": [2]
}"#;

/// Build a client pointed at the mock server.
fn client_for(server: &mockito::Server, code: &str) -> BwtClient {
    let address = server.host_with_port();
    let (host, port) = address
        .rsplit_once(':')
        .expect("mock server address has host:port form");

    BwtClient::new(host, code).with_port(port.parse().expect("numeric port"))
}

#[test]
fn fetches_and_decodes_current_data() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/GetCurrentData")
        .match_header("authorization", "Basic dXNlcjoxMjM0NTY=")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(CURRENT_DATA_BODY)
        .create();

    let data = client_for(&server, "123456")
        .get_current_data()
        .expect("fetch succeeds");

    mock.assert();
    assert_eq!(data.firmware_version, "2.0200");
    assert_eq!(data.state, SoftenerState::Ok);
    assert_eq!(data.current_flow, 0);
    assert_eq!(data.in_hardness.dh(), 20.0);
    assert_eq!(data.errors, vec![DeviceError::RegenerantLow]);
}

#[test]
fn rejected_code_maps_to_wrong_code() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/api/GetCurrentData")
        .with_status(401)
        .create();

    let result = client_for(&server, "000000").get_current_data();
    assert!(matches!(result, Err(ApiError::WrongCode)));
}

#[test]
fn server_error_keeps_status_code() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/api/GetCurrentData")
        .with_status(503)
        .create();

    match client_for(&server, "123456").get_current_data() {
        Err(ApiError::Http(code)) => assert_eq!(code, 503),
        other => panic!("Expected ApiError::Http, got {:?}", other),
    }
}

#[test]
fn invalid_body_maps_to_parse_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/api/GetCurrentData")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("not json at all")
        .create();

    let result = client_for(&server, "123456").get_current_data();
    assert!(matches!(result, Err(ApiError::Parse(_))));
}

#[test]
fn valid_json_with_missing_fields_maps_to_parse_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/api/GetCurrentData")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"FirmwareVersion": "2.0200"}"#)
        .create();

    let result = client_for(&server, "123456").get_current_data();
    assert!(matches!(result, Err(ApiError::Parse(_))));
}

#[test]
fn unreachable_device_maps_to_connect_error() {
    // Port 9 on localhost has no listener.
    let client = BwtClient::new("127.0.0.1", "123456").with_port(9);

    let result = client.get_current_data();
    assert!(matches!(result, Err(ApiError::Connect(_))));
}
