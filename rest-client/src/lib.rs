//! Private HTTP client for BWT Perla device communication
//!
//! This crate provides a minimal blocking HTTP client for the local API
//! exposed by BWT Perla water softeners. The device speaks plain JSON
//! over HTTP and authenticates every request with basic auth.

mod error;

pub use error::RestError;

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};

/// A minimal HTTP client for the softener's local JSON API
#[derive(Debug, Clone)]
pub struct RestClient {
    agent: ureq::Agent,
}

impl RestClient {
    /// Create a new REST client with default timeouts
    pub fn new() -> Self {
        Self::with_read_timeout(Duration::from_secs(10))
    }

    /// Create a REST client with a custom read timeout
    ///
    /// The connect timeout stays at 5 seconds. The read timeout bounds the
    /// whole fetch so a wedged device cannot stall a polling loop.
    pub fn with_read_timeout(read_timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(Duration::from_secs(5))
                .timeout_read(read_timeout)
                .build(),
        }
    }

    /// Perform an authenticated GET and decode the JSON body
    ///
    /// # Arguments
    /// * `host` - Device host name or IP address
    /// * `port` - Device API port
    /// * `path` - Endpoint path (leading slash optional)
    /// * `user` - Basic auth user
    /// * `password` - Basic auth password (the device login code)
    pub fn get_json(
        &self,
        host: &str,
        port: u16,
        path: &str,
        user: &str,
        password: &str,
    ) -> Result<serde_json::Value, RestError> {
        let url = format!("http://{}:{}/{}", host, port, path.trim_start_matches('/'));

        let response = self
            .agent
            .get(&url)
            .set("Authorization", &basic_auth(user, password))
            .set("Accept", "application/json")
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => RestError::Status(code),
                ureq::Error::Transport(transport) => RestError::Network(transport.to_string()),
            })?;

        response
            .into_json::<serde_json::Value>()
            .map_err(|e| RestError::Parse(e.to_string()))
    }
}

impl Default for RestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a basic auth header value from credentials
fn basic_auth(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password)))
}
