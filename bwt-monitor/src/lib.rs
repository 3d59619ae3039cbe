//! Polling monitor for BWT Perla water softeners
//!
//! Polls a softener through [`bwt_api`] and exposes every reading as a
//! table of typed sensor values, with change events and a watchable
//! snapshot of the latest state.
//!
//! The poll cadence adapts to what the device is doing: while water is
//! flowing the monitor polls once a second to track the active cycle,
//! and once the device goes idle the interval doubles after every poll
//! until it settles at the 30 second baseline.
//!
//! ```rust,no_run
//! use bwt_monitor::{MonitorConfig, MonitorEvent, MonitorTask};
//!
//! # async fn run() -> Result<(), bwt_monitor::MonitorError> {
//! let config = MonitorConfig::new("192.168.1.50", "123456");
//! let (task, mut events) = MonitorTask::connect(config)?;
//!
//! while let Some(event) = events.recv().await {
//!     if let MonitorEvent::SensorChanged { key, value, .. } = event {
//!         println!("{key}: {value:?}");
//!     }
//! }
//!
//! task.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod polling;
pub mod sensor;
pub mod setup;

pub use config::MonitorConfig;
pub use error::MonitorError;
pub use event::MonitorEvent;
pub use polling::{
    next_interval, next_poll_interval, MonitorStats, MonitorTask, StatusSource,
    MAX_POLL_INTERVAL, MIN_POLL_INTERVAL,
};
pub use sensor::{
    descriptors, DeviceClass, SensorChange, SensorDescriptor, SensorSnapshot, SensorValue,
    StateClass, Unit,
};
pub use setup::{validate_connection, DeviceInfo};
