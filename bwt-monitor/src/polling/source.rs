//! The seam between the poll loop and the device

use bwt_api::{BwtClient, CurrentData};

/// Source of softener readings
///
/// The poll loop only ever asks for "the current status"; everything it
/// knows about the device comes through this trait. Tests substitute a
/// scripted implementation.
pub trait StatusSource: Send + Sync {
    /// Fetch the current reading, blocking until the device responds
    ///
    /// Implementations are expected to enforce their own transport
    /// timeout; the poll loop adds an outer deadline on top.
    fn fetch_status(&self) -> bwt_api::Result<CurrentData>;
}

impl StatusSource for BwtClient {
    fn fetch_status(&self) -> bwt_api::Result<CurrentData> {
        self.get_current_data()
    }
}
