use std::time::Duration;

use rest_client::RestClient;

use crate::{ApiError, CurrentData, Result};

/// Default port of the local API
pub const DEFAULT_API_PORT: u16 = 8080;

/// Fixed basic-auth user of the local API; only the code varies per device
const API_USER: &str = "user";

const CURRENT_DATA_PATH: &str = "api/GetCurrentData";

/// A client for the local API of one BWT Perla water softener
///
/// The device serves its telemetry over plain HTTP on the local network.
/// Every request is authenticated with the login code configured when the
/// local API was enabled on the device.
///
/// ```rust,no_run
/// use bwt_api::BwtClient;
///
/// let client = BwtClient::new("192.168.1.50", "123456");
/// let data = client.get_current_data()?;
/// println!("current flow: {} l/h", data.current_flow);
/// # Ok::<(), bwt_api::ApiError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BwtClient {
    rest: RestClient,
    host: String,
    port: u16,
    code: String,
}

impl BwtClient {
    /// Create a client for a device at `host` using its login code
    pub fn new(host: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            rest: RestClient::new(),
            host: host.into(),
            port: DEFAULT_API_PORT,
            code: code.into(),
        }
    }

    /// Use a non-default API port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Bound the whole fetch by a read timeout
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.rest = RestClient::with_read_timeout(timeout);
        self
    }

    /// Use a pre-configured REST client
    pub fn with_rest_client(mut self, rest: RestClient) -> Self {
        self.rest = rest;
        self
    }

    /// Host this client talks to
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Fetch the current reading from the device
    ///
    /// One HTTP GET of `/api/GetCurrentData`, decoded into [`CurrentData`].
    ///
    /// # Errors
    /// [`ApiError::Connect`] when the device is unreachable,
    /// [`ApiError::WrongCode`] when it rejects the login code,
    /// [`ApiError::Parse`] when the payload cannot be decoded.
    pub fn get_current_data(&self) -> Result<CurrentData> {
        let value = self
            .rest
            .get_json(&self.host, self.port, CURRENT_DATA_PATH, API_USER, &self.code)?;

        serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
    }
}
