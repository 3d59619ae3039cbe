//! Error types for the monitor crate

use bwt_api::ApiError;

/// Errors that can occur while setting up or running a monitor
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// A device API call failed
    #[error("Device API error: {0}")]
    Api(#[from] ApiError),

    /// Invalid configuration provided
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An error occurred during shutdown
    #[error("Shutdown error: {0}")]
    Shutdown(String),
}

/// Convenience type alias for Results using MonitorError
pub type Result<T> = std::result::Result<T, MonitorError>;
