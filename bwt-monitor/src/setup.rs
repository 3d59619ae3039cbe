//! Connection validation and device identity
//!
//! One-shot check used before a monitor is created, typically behind a
//! setup form: can the device be reached, and does it accept the code?

use bwt_api::BwtClient;
use serde::Serialize;

use crate::config::MonitorConfig;
use crate::error::MonitorError;

/// Identity of a softener that answered a connection check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// Device manufacturer
    pub manufacturer: String,
    /// Device model line
    pub model: String,
    /// Firmware version reported with the probe reading
    pub firmware_version: String,
    /// Host the device answered on
    pub host: String,
}

/// Check that the configured device is reachable and accepts the code
///
/// Performs one blocking fetch. On success the device's identity is
/// returned; on failure the error keeps the connection/credential split
/// so callers can tell "fix the network" from "fix the code".
pub fn validate_connection(config: &MonitorConfig) -> Result<DeviceInfo, MonitorError> {
    config.validate()?;

    let client = BwtClient::new(&config.host, &config.access_code)
        .with_port(config.port)
        .with_fetch_timeout(config.fetch_timeout);

    let data = client.get_current_data()?;

    Ok(DeviceInfo {
        manufacturer: "BWT".to_string(),
        model: "Perla".to_string(),
        firmware_version: data.firmware_version,
        host: config.host.clone(),
    })
}
