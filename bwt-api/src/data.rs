//! Data model for the `GetCurrentData` endpoint
//!
//! The device returns one flat JSON document with PascalCase keys and
//! unit suffixes. Timestamps are epoch seconds with `0` meaning "never".

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hardness::Hardness;

/// One complete reading from the softener
///
/// Volume counters are liters of treated water; see
/// [`crate::treated_to_blended`] for the blended equivalents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentData {
    /// Firmware version string as reported by the device
    #[serde(rename = "FirmwareVersion")]
    pub firmware_version: String,

    /// Overall machine state
    #[serde(rename = "SoftenerState")]
    pub state: SoftenerState,

    /// Instantaneous flow through the outlet [l/h]
    ///
    /// Greater than zero while the device is actively treating water.
    #[serde(rename = "CurrentFlowrate_l_h")]
    pub current_flow: u32,

    /// Total blended water delivered since setup [l]
    #[serde(rename = "BlendedWaterSinceSetup_l")]
    pub blended_total: u64,

    /// Treated water delivered today [l]
    #[serde(rename = "TreatedWaterDay_l")]
    pub treated_day: u64,

    /// Treated water delivered this month [l]
    #[serde(rename = "TreatedWaterMonth_l")]
    pub treated_month: u64,

    /// Treated water delivered this year [l]
    #[serde(rename = "TreatedWaterYear_l")]
    pub treated_year: u64,

    /// Inlet (raw water) hardness
    #[serde(rename = "HardnessIn_dH")]
    pub in_hardness: Hardness,

    /// Outlet (blended water) hardness
    #[serde(rename = "HardnessOut_dH")]
    pub out_hardness: Hardness,

    /// Regenerant (salt) fill level [%]
    #[serde(rename = "RegenerantLevel_percent")]
    pub regenerant_level: u8,

    /// Days of regenerant remaining at current consumption
    #[serde(rename = "RegenerantDays")]
    pub regenerant_days: u16,

    /// Total regenerant consumed since setup [g]
    #[serde(rename = "RegenerantSinceSetup_g")]
    pub regenerant_total: u64,

    /// When column 1 last regenerated
    #[serde(rename = "LastRegenerationColumn1", with = "epoch_seconds")]
    pub regeneration_last_1: Option<DateTime<Utc>>,

    /// When column 2 last regenerated
    #[serde(rename = "LastRegenerationColumn2", with = "epoch_seconds")]
    pub regeneration_last_2: Option<DateTime<Utc>>,

    /// Lifetime regeneration count of column 1
    #[serde(rename = "RegenerationCounterColumn1")]
    pub regeneration_count_1: u32,

    /// Lifetime regeneration count of column 2
    #[serde(rename = "RegenerationCounterColumn2")]
    pub regeneration_count_2: u32,

    /// Remaining exchange capacity of column 1 [m°dH·l]
    #[serde(rename = "CapacityColumn1")]
    pub capacity_1: f64,

    /// Remaining exchange capacity of column 2 [m°dH·l]
    #[serde(rename = "CapacityColumn2")]
    pub capacity_2: f64,

    /// Next routine service the owner should schedule
    #[serde(rename = "ServiceCustomer", with = "epoch_seconds")]
    pub service_customer: Option<DateTime<Utc>>,

    /// Next service visit by a technician
    #[serde(rename = "ServiceTechnician", with = "epoch_seconds")]
    pub service_technician: Option<DateTime<Utc>>,

    /// Holiday mode word: 0 = off, 1 = active, >1 = epoch start time
    #[serde(rename = "HolidayMode")]
    pub holiday_mode: u64,

    /// Error conditions currently raised by the device
    #[serde(rename = "ActiveErrorIds", default)]
    pub errors: Vec<DeviceError>,
}

impl CurrentData {
    /// Errors that stop the softener from treating water
    pub fn fatal_errors(&self) -> Vec<DeviceError> {
        self.errors.iter().copied().filter(|e| e.is_fatal()).collect()
    }

    /// Conditions the device flags without stopping treatment
    pub fn warnings(&self) -> Vec<DeviceError> {
        self.errors.iter().copied().filter(|e| !e.is_fatal()).collect()
    }

    /// Whether holiday mode is currently active
    pub fn holiday_mode_active(&self) -> bool {
        self.holiday_mode == 1
    }

    /// Scheduled start of holiday mode, if one is programmed
    ///
    /// The device overloads the holiday-mode word: values above 1 are the
    /// epoch-seconds start time of a future holiday window.
    pub fn holiday_mode_start(&self) -> Option<DateTime<Utc>> {
        if self.holiday_mode > 1 {
            DateTime::from_timestamp(self.holiday_mode as i64, 0)
        } else {
            None
        }
    }
}

/// Overall machine state reported with every reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum SoftenerState {
    /// Normal operation
    Ok,
    /// A regeneration cycle is running
    Regenerating,
    /// Maintenance mode engaged at the device
    Maintenance,
    /// The device stopped treating water because of a fatal error
    Error,
    /// State code this library does not know about
    Unknown(u8),
}

impl SoftenerState {
    /// All state names a reading can report, for enum-style consumers
    pub const OPTIONS: [&'static str; 5] =
        ["ok", "regenerating", "maintenance", "error", "unknown"];

    /// Stable lowercase name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            SoftenerState::Ok => "ok",
            SoftenerState::Regenerating => "regenerating",
            SoftenerState::Maintenance => "maintenance",
            SoftenerState::Error => "error",
            SoftenerState::Unknown(_) => "unknown",
        }
    }
}

impl From<u8> for SoftenerState {
    fn from(code: u8) -> Self {
        match code {
            0 => SoftenerState::Ok,
            1 => SoftenerState::Regenerating,
            2 => SoftenerState::Maintenance,
            3 => SoftenerState::Error,
            other => SoftenerState::Unknown(other),
        }
    }
}

impl From<SoftenerState> for u8 {
    fn from(state: SoftenerState) -> Self {
        match state {
            SoftenerState::Ok => 0,
            SoftenerState::Regenerating => 1,
            SoftenerState::Maintenance => 2,
            SoftenerState::Error => 3,
            SoftenerState::Unknown(code) => code,
        }
    }
}

/// Error condition codes raised by the device
///
/// The split between fatal errors and warnings follows the device manual:
/// fatal conditions stop water treatment, warnings do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum DeviceError {
    /// Regenerant tank is empty; regeneration cannot run
    RegenerantEmpty,
    /// Regenerant is running low
    RegenerantLow,
    /// AQA Stop closed the inlet valve after detecting a leak
    AqaStopLeak,
    /// AQA Watch flagged an unusually long continuous draw
    AqaWatchFlow,
    /// Electrolysis cell for disinfection failed
    ChlorineCellFault,
    /// Valve motor did not reach its position
    MotorFault,
    /// Device clock lost after a power interruption
    ClockNotSet,
    /// Routine service interval has elapsed
    MaintenanceDue,
    /// Code this library does not know about
    Unknown(u16),
}

impl DeviceError {
    /// Whether this condition stops the softener from treating water
    ///
    /// Unknown codes are treated as fatal so new device firmware surfaces
    /// loudly instead of disappearing into the warning list.
    pub fn is_fatal(&self) -> bool {
        match self {
            DeviceError::RegenerantEmpty
            | DeviceError::AqaStopLeak
            | DeviceError::ChlorineCellFault
            | DeviceError::MotorFault
            | DeviceError::Unknown(_) => true,
            DeviceError::RegenerantLow
            | DeviceError::AqaWatchFlow
            | DeviceError::ClockNotSet
            | DeviceError::MaintenanceDue => false,
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::RegenerantEmpty => write!(f, "regenerant_empty"),
            DeviceError::RegenerantLow => write!(f, "regenerant_low"),
            DeviceError::AqaStopLeak => write!(f, "aqa_stop_leak"),
            DeviceError::AqaWatchFlow => write!(f, "aqa_watch_flow"),
            DeviceError::ChlorineCellFault => write!(f, "chlorine_cell_fault"),
            DeviceError::MotorFault => write!(f, "motor_fault"),
            DeviceError::ClockNotSet => write!(f, "clock_not_set"),
            DeviceError::MaintenanceDue => write!(f, "maintenance_due"),
            DeviceError::Unknown(code) => write!(f, "unknown_error_{}", code),
        }
    }
}

impl From<u16> for DeviceError {
    fn from(code: u16) -> Self {
        match code {
            1 => DeviceError::RegenerantEmpty,
            2 => DeviceError::RegenerantLow,
            3 => DeviceError::AqaStopLeak,
            4 => DeviceError::AqaWatchFlow,
            5 => DeviceError::ChlorineCellFault,
            6 => DeviceError::MotorFault,
            7 => DeviceError::ClockNotSet,
            8 => DeviceError::MaintenanceDue,
            other => DeviceError::Unknown(other),
        }
    }
}

impl From<DeviceError> for u16 {
    fn from(error: DeviceError) -> Self {
        match error {
            DeviceError::RegenerantEmpty => 1,
            DeviceError::RegenerantLow => 2,
            DeviceError::AqaStopLeak => 3,
            DeviceError::AqaWatchFlow => 4,
            DeviceError::ChlorineCellFault => 5,
            DeviceError::MotorFault => 6,
            DeviceError::ClockNotSet => 7,
            DeviceError::MaintenanceDue => 8,
            DeviceError::Unknown(code) => code,
        }
    }
}

/// Epoch-seconds timestamps where 0 means "never"
mod epoch_seconds {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(deserializer)?;
        if raw == 0 {
            return Ok(None);
        }
        DateTime::from_timestamp(raw as i64, 0)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {}", raw)))
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(value.map(|v| v.timestamp().max(0) as u64).unwrap_or(0))
    }
}
