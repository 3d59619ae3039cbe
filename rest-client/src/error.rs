//! Error types for the REST client

use thiserror::Error;

/// Errors that can occur while talking to the device's local HTTP API
#[derive(Debug, Error)]
pub enum RestError {
    /// Network or transport error
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// Non-success HTTP status returned by the device
    #[error("HTTP status {0}")]
    Status(u16),

    /// Response body was not valid JSON
    #[error("JSON parsing error: {0}")]
    Parse(String),
}
