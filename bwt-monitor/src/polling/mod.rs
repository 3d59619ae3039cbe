//! Polling system
//!
//! The interval calculation, the source seam and the loop that ties them
//! together. The interval logic is deliberately a pure function; the loop
//! owns all state.

pub mod interval;
pub mod poller;
pub mod source;

pub use interval::{next_interval, next_poll_interval, MAX_POLL_INTERVAL, MIN_POLL_INTERVAL};
pub use poller::{MonitorStats, MonitorTask};
pub use source::StatusSource;
