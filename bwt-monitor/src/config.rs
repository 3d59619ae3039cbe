//! Monitor configuration
//!
//! [`MonitorConfig`] controls how a monitor reaches its device and how
//! aggressively it polls. Defaults follow the device-friendly cadence of
//! a 1 second floor, 30 second ceiling and a 10 second fetch timeout.

use std::time::Duration;

use bwt_api::DEFAULT_API_PORT;

use crate::error::MonitorError;
use crate::polling::interval::{MAX_POLL_INTERVAL, MIN_POLL_INTERVAL};

/// Configuration for a softener monitor
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Device host name or IP address
    pub host: String,

    /// Login code configured when the local API was enabled
    pub access_code: String,

    /// Device API port
    /// Default: 8080
    pub port: u16,

    /// Timeout for one `GetCurrentData` fetch
    /// Default: 10 seconds
    pub fetch_timeout: Duration,

    /// Poll interval while water is flowing
    /// Default: 1 second
    pub min_poll_interval: Duration,

    /// Poll interval ceiling while the device is idle
    /// Default: 30 seconds
    pub max_poll_interval: Duration,

    /// Adapt the poll interval to flow; when disabled the monitor stays
    /// at `max_poll_interval`
    /// Default: true
    pub adaptive_polling: bool,

    /// Consecutive transient failures tolerated before the monitor stops
    /// Default: 5
    pub max_consecutive_errors: u32,
}

impl MonitorConfig {
    /// Create a configuration with default polling behavior
    pub fn new(host: impl Into<String>, access_code: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            access_code: access_code.into(),
            port: DEFAULT_API_PORT,
            fetch_timeout: Duration::from_secs(10),
            min_poll_interval: MIN_POLL_INTERVAL,
            max_poll_interval: MAX_POLL_INTERVAL,
            adaptive_polling: true,
            max_consecutive_errors: 5,
        }
    }

    /// Preset for deployments that favor device load over latency
    pub fn relaxed(host: impl Into<String>, access_code: impl Into<String>) -> Self {
        Self {
            min_poll_interval: Duration::from_secs(5),
            max_poll_interval: Duration::from_secs(120),
            max_consecutive_errors: 10,
            ..Self::new(host, access_code)
        }
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.host.is_empty() {
            return Err(MonitorError::Configuration("host must not be empty".to_string()));
        }

        if self.access_code.is_empty() {
            return Err(MonitorError::Configuration(
                "access code must not be empty".to_string(),
            ));
        }

        if self.min_poll_interval == Duration::ZERO {
            return Err(MonitorError::Configuration(
                "minimum poll interval must be greater than 0".to_string(),
            ));
        }

        if self.min_poll_interval >= self.max_poll_interval {
            return Err(MonitorError::Configuration(
                "invalid poll interval: minimum must be less than maximum".to_string(),
            ));
        }

        if self.fetch_timeout == Duration::ZERO {
            return Err(MonitorError::Configuration(
                "fetch timeout must be greater than 0".to_string(),
            ));
        }

        if self.max_consecutive_errors == 0 {
            return Err(MonitorError::Configuration(
                "max consecutive errors must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder pattern methods for fluent configuration

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, min: Duration, max: Duration) -> Self {
        self.min_poll_interval = min;
        self.max_poll_interval = max;
        self
    }

    pub fn with_adaptive_polling(mut self, enabled: bool) -> Self {
        self.adaptive_polling = enabled;
        self
    }

    pub fn with_error_limit(mut self, limit: u32) -> Self {
        self.max_consecutive_errors = limit;
        self
    }
}
