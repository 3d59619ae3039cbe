//! Table-driven sensor definitions
//!
//! Every value the monitor exposes is described by one [`SensorDescriptor`]
//! row: a stable key, presentation metadata and a pure projection from
//! [`CurrentData`]. One table plus one generic evaluation path replaces a
//! subclass per sensor; consumers that need a new sensor add a row, not a
//! type.

use std::fmt;

use bwt_api::{blended_capacity, treated_to_blended, CurrentData};
use chrono::{DateTime, Utc};
use serde::Serialize;

const GLASS: &str = "mdi:cup-water";
const FAUCET: &str = "mdi:faucet";
const COUNTER: &str = "mdi:counter";
const WRENCH_CLOCK: &str = "mdi:wrench-clock";
const WRENCH_PERSON: &str = "mdi:account-wrench";
const WATER: &str = "mdi:water";
const WARNING: &str = "mdi:alert-circle";
const ERROR: &str = "mdi:alert-decagram";
const WATER_PLUS: &str = "mdi:water-plus";
const WATER_MINUS: &str = "mdi:water-minus";
const WATER_CHECK: &str = "mdi:water-check";
const PERCENT: &str = "mdi:percent";
const DAYS_LEFT: &str = "mdi:sort-numeric-descending-variant";
const MASS: &str = "mdi:weight";
const TIME: &str = "mdi:calendar-clock";
const DAY: &str = "mdi:calendar-today";
const MONTH: &str = "mdi:calendar-month";
const YEAR: &str = "mdi:calendar-blank-multiple";
const HOLIDAY: &str = "mdi:location-exit";

/// Unit of measurement attached to a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Liters,
    CubicMetersPerHour,
    GermanDegrees,
    Percent,
    Days,
    Grams,
}

impl Unit {
    /// Display symbol for the unit
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Liters => "l",
            Unit::CubicMetersPerHour => "m³/h",
            Unit::GermanDegrees => "°dH",
            Unit::Percent => "%",
            Unit::Days => "d",
            Unit::Grams => "g",
        }
    }
}

/// Semantic class of a sensor, for consumers that group or style by kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Water,
    Timestamp,
    Enum,
}

/// How a sensor's history should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    /// Point-in-time measurement
    Measurement,
    /// Monotonically increasing counter
    TotalIncreasing,
}

/// One evaluated sensor value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SensorValue {
    UInt(u64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Bool(bool),
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorValue::UInt(value) => write!(f, "{}", value),
            SensorValue::Float(value) => write!(f, "{}", value),
            SensorValue::Text(value) => write!(f, "{}", value),
            SensorValue::Timestamp(value) => write!(f, "{}", value.to_rfc3339()),
            SensorValue::Bool(value) => write!(f, "{}", value),
        }
    }
}

/// Description of one sensor: identity, presentation and projection
#[derive(Debug, Clone, Copy)]
pub struct SensorDescriptor {
    /// Stable key identifying the sensor
    pub key: &'static str,
    /// Material Design icon name
    pub icon: &'static str,
    /// Unit of the value, if it has one
    pub unit: Option<Unit>,
    /// Semantic class, if any
    pub device_class: Option<DeviceClass>,
    /// History interpretation, if any
    pub state_class: Option<StateClass>,
    /// Decimal places a UI should show
    pub suggested_precision: Option<u8>,
    extract: fn(&CurrentData) -> Option<SensorValue>,
}

impl SensorDescriptor {
    /// Project this sensor's value out of a reading
    ///
    /// `None` means the sensor has no value in this reading (for example
    /// a regeneration that has never happened yet).
    pub fn value(&self, data: &CurrentData) -> Option<SensorValue> {
        (self.extract)(data)
    }
}

/// The full sensor table
pub fn descriptors() -> &'static [SensorDescriptor] {
    &DESCRIPTORS
}

static DESCRIPTORS: [SensorDescriptor; 23] = [
    SensorDescriptor {
        key: "total_output",
        icon: WATER,
        unit: Some(Unit::Liters),
        device_class: Some(DeviceClass::Water),
        state_class: Some(StateClass::TotalIncreasing),
        suggested_precision: None,
        extract: |data| Some(SensorValue::UInt(data.blended_total)),
    },
    SensorDescriptor {
        key: "current_flow",
        icon: FAUCET,
        unit: Some(Unit::CubicMetersPerHour),
        device_class: None,
        state_class: Some(StateClass::Measurement),
        suggested_precision: Some(3),
        // The device reports l/h, consumers expect m³/h.
        extract: |data| Some(SensorValue::Float(f64::from(data.current_flow) / 1000.0)),
    },
    SensorDescriptor {
        key: "errors",
        icon: ERROR,
        unit: None,
        device_class: None,
        state_class: None,
        suggested_precision: None,
        extract: |data| {
            let names: Vec<String> =
                data.fatal_errors().iter().map(|e| e.to_string()).collect();
            Some(SensorValue::Text(names.join(",")))
        },
    },
    SensorDescriptor {
        key: "warnings",
        icon: WARNING,
        unit: None,
        device_class: None,
        state_class: None,
        suggested_precision: None,
        extract: |data| {
            let names: Vec<String> = data.warnings().iter().map(|e| e.to_string()).collect();
            Some(SensorValue::Text(names.join(",")))
        },
    },
    SensorDescriptor {
        key: "hardness_in",
        icon: WATER_PLUS,
        unit: Some(Unit::GermanDegrees),
        device_class: None,
        state_class: None,
        suggested_precision: None,
        extract: |data| Some(SensorValue::Float(data.in_hardness.dh())),
    },
    SensorDescriptor {
        key: "hardness_out",
        icon: WATER_MINUS,
        unit: Some(Unit::GermanDegrees),
        device_class: None,
        state_class: None,
        suggested_precision: None,
        extract: |data| Some(SensorValue::Float(data.out_hardness.dh())),
    },
    SensorDescriptor {
        key: "customer_service",
        icon: WRENCH_CLOCK,
        unit: None,
        device_class: Some(DeviceClass::Timestamp),
        state_class: None,
        suggested_precision: None,
        extract: |data| data.service_customer.map(SensorValue::Timestamp),
    },
    SensorDescriptor {
        key: "technician_service",
        icon: WRENCH_PERSON,
        unit: None,
        device_class: Some(DeviceClass::Timestamp),
        state_class: None,
        suggested_precision: None,
        extract: |data| data.service_technician.map(SensorValue::Timestamp),
    },
    SensorDescriptor {
        key: "state",
        icon: WATER_CHECK,
        unit: None,
        device_class: Some(DeviceClass::Enum),
        state_class: None,
        suggested_precision: None,
        extract: |data| Some(SensorValue::Text(data.state.as_str().to_string())),
    },
    SensorDescriptor {
        key: "regenerant_level",
        icon: PERCENT,
        unit: Some(Unit::Percent),
        device_class: None,
        state_class: Some(StateClass::Measurement),
        suggested_precision: None,
        extract: |data| Some(SensorValue::UInt(u64::from(data.regenerant_level))),
    },
    SensorDescriptor {
        key: "regenerant_days",
        icon: DAYS_LEFT,
        unit: Some(Unit::Days),
        device_class: None,
        state_class: Some(StateClass::Measurement),
        suggested_precision: None,
        extract: |data| Some(SensorValue::UInt(u64::from(data.regenerant_days))),
    },
    SensorDescriptor {
        key: "regenerant_mass",
        icon: MASS,
        unit: Some(Unit::Grams),
        device_class: None,
        state_class: Some(StateClass::Measurement),
        suggested_precision: None,
        extract: |data| Some(SensorValue::UInt(data.regenerant_total)),
    },
    SensorDescriptor {
        key: "last_regeneration_1",
        icon: TIME,
        unit: None,
        device_class: Some(DeviceClass::Timestamp),
        state_class: None,
        suggested_precision: None,
        extract: |data| data.regeneration_last_1.map(SensorValue::Timestamp),
    },
    SensorDescriptor {
        key: "last_regeneration_2",
        icon: TIME,
        unit: None,
        device_class: Some(DeviceClass::Timestamp),
        state_class: None,
        suggested_precision: None,
        extract: |data| data.regeneration_last_2.map(SensorValue::Timestamp),
    },
    SensorDescriptor {
        key: "counter_regeneration_1",
        icon: COUNTER,
        unit: None,
        device_class: None,
        state_class: None,
        suggested_precision: None,
        extract: |data| Some(SensorValue::UInt(u64::from(data.regeneration_count_1))),
    },
    SensorDescriptor {
        key: "counter_regeneration_2",
        icon: COUNTER,
        unit: None,
        device_class: None,
        state_class: None,
        suggested_precision: None,
        extract: |data| Some(SensorValue::UInt(u64::from(data.regeneration_count_2))),
    },
    SensorDescriptor {
        key: "holiday_mode",
        icon: HOLIDAY,
        unit: None,
        device_class: None,
        state_class: None,
        suggested_precision: None,
        extract: |data| Some(SensorValue::Bool(data.holiday_mode_active())),
    },
    SensorDescriptor {
        key: "holiday_mode_start",
        icon: HOLIDAY,
        unit: None,
        device_class: Some(DeviceClass::Timestamp),
        state_class: None,
        suggested_precision: None,
        extract: |data| data.holiday_mode_start().map(SensorValue::Timestamp),
    },
    SensorDescriptor {
        key: "day_output",
        icon: DAY,
        unit: Some(Unit::Liters),
        device_class: Some(DeviceClass::Water),
        state_class: Some(StateClass::TotalIncreasing),
        suggested_precision: Some(0),
        extract: |data| {
            Some(SensorValue::Float(treated_to_blended(
                data.treated_day,
                data.in_hardness,
                data.out_hardness,
            )))
        },
    },
    SensorDescriptor {
        key: "month_output",
        icon: MONTH,
        unit: Some(Unit::Liters),
        device_class: Some(DeviceClass::Water),
        state_class: Some(StateClass::TotalIncreasing),
        suggested_precision: Some(0),
        extract: |data| {
            Some(SensorValue::Float(treated_to_blended(
                data.treated_month,
                data.in_hardness,
                data.out_hardness,
            )))
        },
    },
    SensorDescriptor {
        key: "year_output",
        icon: YEAR,
        unit: Some(Unit::Liters),
        device_class: Some(DeviceClass::Water),
        state_class: Some(StateClass::TotalIncreasing),
        suggested_precision: Some(0),
        extract: |data| {
            Some(SensorValue::Float(treated_to_blended(
                data.treated_year,
                data.in_hardness,
                data.out_hardness,
            )))
        },
    },
    SensorDescriptor {
        key: "capacity_1",
        icon: GLASS,
        unit: Some(Unit::Liters),
        device_class: None,
        state_class: Some(StateClass::Measurement),
        suggested_precision: Some(0),
        extract: |data| {
            Some(SensorValue::Float(blended_capacity(
                data.capacity_1,
                data.in_hardness,
                data.out_hardness,
            )))
        },
    },
    SensorDescriptor {
        key: "capacity_2",
        icon: GLASS,
        unit: Some(Unit::Liters),
        device_class: None,
        state_class: Some(StateClass::Measurement),
        suggested_precision: Some(0),
        extract: |data| {
            Some(SensorValue::Float(blended_capacity(
                data.capacity_2,
                data.in_hardness,
                data.out_hardness,
            )))
        },
    },
];

/// A change in one sensor between consecutive readings
#[derive(Debug, Clone, PartialEq)]
pub struct SensorChange {
    /// Key of the changed sensor
    pub key: &'static str,
    /// Value in the previous reading
    pub previous: Option<SensorValue>,
    /// Value in the new reading
    pub value: Option<SensorValue>,
}

/// Every sensor in the table evaluated against one reading
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSnapshot {
    values: Vec<(&'static str, Option<SensorValue>)>,
}

impl SensorSnapshot {
    /// Evaluate the whole sensor table against a reading
    pub fn evaluate(data: &CurrentData) -> Self {
        Self {
            values: descriptors()
                .iter()
                .map(|descriptor| (descriptor.key, descriptor.value(data)))
                .collect(),
        }
    }

    /// Value of one sensor by key
    pub fn get(&self, key: &str) -> Option<&SensorValue> {
        self.values
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Iterate over all sensors in table order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&SensorValue>)> + '_ {
        self.values.iter().map(|(key, value)| (*key, value.as_ref()))
    }

    /// Number of sensors in the snapshot
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the snapshot holds no sensors
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sensors whose value differs from a previous snapshot
    ///
    /// Both snapshots come from the same table, so entries are compared
    /// position by position.
    pub fn diff(&self, previous: &SensorSnapshot) -> Vec<SensorChange> {
        self.values
            .iter()
            .zip(previous.values.iter())
            .filter(|((_, new), (_, old))| new != old)
            .map(|((key, new), (_, old))| SensorChange {
                key,
                previous: old.clone(),
                value: new.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bwt_api::Hardness;
    use std::collections::HashSet;

    fn sample_data(flow: u32) -> CurrentData {
        CurrentData {
            firmware_version: "2.0200".to_string(),
            state: bwt_api::SoftenerState::Ok,
            current_flow: flow,
            blended_total: 483_523,
            treated_day: 300,
            treated_month: 5_400,
            treated_year: 88_210,
            in_hardness: Hardness::from_dh(20.0),
            out_hardness: Hardness::from_dh(5.0),
            regenerant_level: 62,
            regenerant_days: 148,
            regenerant_total: 64_350,
            regeneration_last_1: DateTime::from_timestamp(1_700_000_000, 0),
            regeneration_last_2: None,
            regeneration_count_1: 412,
            regeneration_count_2: 409,
            capacity_1: 3_000_000.0,
            capacity_2: 3_100_000.0,
            service_customer: DateTime::from_timestamp(1_735_000_000, 0),
            service_technician: None,
            holiday_mode: 0,
            errors: vec![
                bwt_api::DeviceError::RegenerantLow,
                bwt_api::DeviceError::AqaStopLeak,
            ],
        }
    }

    #[test]
    fn test_descriptor_keys_are_unique() {
        let keys: HashSet<_> = descriptors().iter().map(|d| d.key).collect();
        assert_eq!(keys.len(), descriptors().len());
    }

    #[test]
    fn test_snapshot_covers_whole_table() {
        let snapshot = SensorSnapshot::evaluate(&sample_data(0));
        assert_eq!(snapshot.len(), descriptors().len());
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn test_flow_is_converted_to_cubic_meters() {
        let snapshot = SensorSnapshot::evaluate(&sample_data(350));
        assert_eq!(snapshot.get("current_flow"), Some(&SensorValue::Float(0.35)));
    }

    #[test]
    fn test_blended_day_output() {
        // 300 l treated at 20 °dH in / 5 °dH out blends up to 400 l.
        let snapshot = SensorSnapshot::evaluate(&sample_data(0));
        assert_eq!(snapshot.get("day_output"), Some(&SensorValue::Float(400.0)));
    }

    #[test]
    fn test_error_and_warning_sensors_split_conditions() {
        let snapshot = SensorSnapshot::evaluate(&sample_data(0));
        assert_eq!(
            snapshot.get("errors"),
            Some(&SensorValue::Text("aqa_stop_leak".to_string()))
        );
        assert_eq!(
            snapshot.get("warnings"),
            Some(&SensorValue::Text("regenerant_low".to_string()))
        );
    }

    #[test]
    fn test_absent_timestamps_have_no_value() {
        let snapshot = SensorSnapshot::evaluate(&sample_data(0));
        assert!(snapshot.get("last_regeneration_2").is_none());
        assert!(snapshot.get("technician_service").is_none());
        assert!(snapshot.get("holiday_mode_start").is_none());
    }

    #[test]
    fn test_diff_reports_only_changed_sensors() {
        let idle = SensorSnapshot::evaluate(&sample_data(0));
        let flowing = SensorSnapshot::evaluate(&sample_data(500));

        let changes = flowing.diff(&idle);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].key, "current_flow");
        assert_eq!(changes[0].previous, Some(SensorValue::Float(0.0)));
        assert_eq!(changes[0].value, Some(SensorValue::Float(0.5)));
    }

    #[test]
    fn test_diff_of_identical_snapshots_is_empty() {
        let first = SensorSnapshot::evaluate(&sample_data(0));
        let second = SensorSnapshot::evaluate(&sample_data(0));
        assert!(first.diff(&second).is_empty());
    }
}
