//! Domain types shared by the radio link, the regulation engine and the UI
//! channel. Device and measure kinds double as radio addresses, so they are
//! byte-valued and serialize as their wire codes.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use strum_macros::{Display, EnumIter, EnumString};

/// Appliances the controller can switch on and off.
#[derive(
  Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize_repr, Deserialize_repr,
)]
#[repr(u8)]
pub enum DeviceKind {
  Cooling = 0x90,
  Heating = 0x91,
}

impl DeviceKind {
  /// Resolves a device kind from its radio address.
  pub fn from_address(address: u8) -> Option<Self> {
    match address {
      0x90 => Some(DeviceKind::Cooling),
      0x91 => Some(DeviceKind::Heating),
      _ => None,
    }
  }

  pub fn address(&self) -> u8 {
    *self as u8
  }
}

/// Rooms (and the outside) a sensor can report for.
#[derive(
  Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize_repr, Deserialize_repr,
)]
#[repr(u8)]
pub enum MeasureKind {
  LivingRoom = 0x20,
  Bedroom = 0x21,
  Outdoor = 0x41,
}

impl MeasureKind {
  /// Resolves a measure kind from its radio address.
  pub fn from_address(address: u8) -> Option<Self> {
    match address {
      0x20 => Some(MeasureKind::LivingRoom),
      0x21 => Some(MeasureKind::Bedroom),
      0x41 => Some(MeasureKind::Outdoor),
      _ => None,
    }
  }

  pub fn address(&self) -> u8 {
    *self as u8
  }

  pub fn is_indoor(&self) -> bool {
    matches!(self, MeasureKind::LivingRoom | MeasureKind::Bedroom)
  }
}

/// Comfort (day) versus economic (night) operation.
#[derive(
  Debug,
  Display,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  EnumIter,
  EnumString,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OperatingMode {
  Day,
  Night,
}

impl OperatingMode {
  /// The mode active at the given wall-clock time. Weekdays run the comfort
  /// schedule from 6:00, weekends from 8:00; both switch back at 22:00.
  pub fn for_timestamp(timestamp: NaiveDateTime) -> Self {
    let day_start_hour = if timestamp.weekday().number_from_monday() >= 6 {
      8
    } else {
      6
    };
    let day_end_hour = 22;

    if (day_start_hour..day_end_hour).contains(&timestamp.hour()) {
      OperatingMode::Day
    } else {
      OperatingMode::Night
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      OperatingMode::Day => "day",
      OperatingMode::Night => "night",
    }
  }
}

/// Power state of an appliance, as we last recorded it.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum PowerStatus {
  TurnedOff = 0,
  TurnedOn = 1,
}

impl PowerStatus {
  pub fn from_code(code: i32) -> Option<Self> {
    match code {
      0 => Some(PowerStatus::TurnedOff),
      1 => Some(PowerStatus::TurnedOn),
      _ => None,
    }
  }

  pub fn is_on(&self) -> bool {
    matches!(self, PowerStatus::TurnedOn)
  }
}

/// One sensor report, as decoded off the radio or read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorMeasure {
  pub timestamp: NaiveDateTime,
  pub kind: MeasureKind,
  pub temperature: f32,
  pub humidity: Option<f32>,
  pub voltage: Option<f32>,
}

impl SensorMeasure {
  pub fn new(
    timestamp: NaiveDateTime,
    kind: MeasureKind,
    temperature: f32,
    humidity: Option<f32>,
    voltage: Option<f32>,
  ) -> Self {
    Self {
      timestamp,
      kind,
      temperature,
      humidity,
      voltage,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;

  fn at(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
      .and_hms_opt(hour, minute, 0)
      .expect("valid time")
  }

  #[test]
  fn weekday_schedule_boundaries() {
    // 2023-09-13 is a Wednesday.
    assert_eq!(OperatingMode::for_timestamp(at(2023, 9, 13, 5, 59)), OperatingMode::Night);
    assert_eq!(OperatingMode::for_timestamp(at(2023, 9, 13, 6, 0)), OperatingMode::Day);
    assert_eq!(OperatingMode::for_timestamp(at(2023, 9, 13, 21, 59)), OperatingMode::Day);
    assert_eq!(OperatingMode::for_timestamp(at(2023, 9, 13, 22, 0)), OperatingMode::Night);
  }

  #[test]
  fn weekend_schedule_starts_later() {
    // 2023-09-16 is a Saturday, 2023-09-17 a Sunday.
    assert_eq!(OperatingMode::for_timestamp(at(2023, 9, 16, 7, 30)), OperatingMode::Night);
    assert_eq!(OperatingMode::for_timestamp(at(2023, 9, 16, 8, 0)), OperatingMode::Day);
    assert_eq!(OperatingMode::for_timestamp(at(2023, 9, 17, 7, 59)), OperatingMode::Night);
    assert_eq!(OperatingMode::for_timestamp(at(2023, 9, 17, 22, 0)), OperatingMode::Night);
  }

  #[test]
  fn kinds_round_trip_through_addresses() {
    for kind in [DeviceKind::Cooling, DeviceKind::Heating] {
      assert_eq!(DeviceKind::from_address(kind.address()), Some(kind));
    }
    for kind in [MeasureKind::LivingRoom, MeasureKind::Bedroom, MeasureKind::Outdoor] {
      assert_eq!(MeasureKind::from_address(kind.address()), Some(kind));
    }
    assert_eq!(DeviceKind::from_address(0x20), None);
    assert_eq!(MeasureKind::from_address(0x90), None);
  }

  #[test]
  fn indoor_measures() {
    assert!(MeasureKind::LivingRoom.is_indoor());
    assert!(MeasureKind::Bedroom.is_indoor());
    assert!(!MeasureKind::Outdoor.is_indoor());
  }
}
