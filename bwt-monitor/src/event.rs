//! Events emitted by a running monitor

use std::time::Duration;

use crate::sensor::SensorValue;

/// Events a monitor sends to its subscriber channel
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// A poll completed and the snapshot was refreshed
    ReadingUpdated {
        /// Flow rate reported with the reading [l/h]
        current_flow_l_h: u32,
        /// Interval the monitor will wait before the next poll
        next_interval: Duration,
    },

    /// One sensor changed between consecutive readings
    SensorChanged {
        /// Key of the changed sensor
        key: &'static str,
        /// Value in the previous reading
        previous: Option<SensorValue>,
        /// Value in the new reading
        value: Option<SensorValue>,
    },

    /// A poll failed with a transient error
    PollFailed {
        /// Failures since the last successful poll
        consecutive_errors: u32,
        /// Human-readable failure description
        error: String,
    },

    /// The device rejected the login code; the monitor stops after this
    AuthenticationFailed,

    /// The monitor stopped, after a shutdown request or too many errors
    Stopped,
}
