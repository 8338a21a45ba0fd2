//! Row types for the store. Enum-valued columns are stored raw (address
//! bytes, mode strings) and converted through accessors; rows are only ever
//! written from the typed enums, so the conversions cannot miss.

use crate::schema::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use getset::CopyGetters;
use hearth_core::types::{DeviceKind, MeasureKind, OperatingMode, PowerStatus, SensorMeasure};

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, CopyGetters)]
#[diesel(table_name = sensor_measure)]
pub struct SensorMeasureRow {
  #[getset(get_copy = "pub")]
  id: i32,
  timestamp: NaiveDateTime,
  kind: i32,
  temperature: f32,
  humidity: Option<f32>,
  voltage: Option<f32>,
}

impl SensorMeasureRow {
  pub fn into_measure(self) -> SensorMeasure {
    SensorMeasure {
      timestamp: self.timestamp,
      kind: MeasureKind::from_address(self.kind as u8).expect("kind written from MeasureKind"),
      temperature: self.temperature,
      humidity: self.humidity,
      voltage: self.voltage,
    }
  }
}

#[derive(Insertable)]
#[diesel(table_name = sensor_measure)]
pub struct NewSensorMeasure {
  pub timestamp: NaiveDateTime,
  pub kind: i32,
  pub temperature: f32,
  pub humidity: Option<f32>,
  pub voltage: Option<f32>,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, CopyGetters)]
#[diesel(table_name = device_ping)]
pub struct DevicePingRow {
  #[getset(get_copy = "pub")]
  id: i32,
  timestamp: NaiveDateTime,
  kind: i32,
}

impl DevicePingRow {
  pub fn timestamp(&self) -> NaiveDateTime {
    self.timestamp
  }

  pub fn kind(&self) -> DeviceKind {
    DeviceKind::from_address(self.kind as u8).expect("kind written from DeviceKind")
  }
}

#[derive(Insertable)]
#[diesel(table_name = device_ping)]
pub struct NewDevicePing {
  pub timestamp: NaiveDateTime,
  pub kind: i32,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, CopyGetters)]
#[diesel(table_name = device_status)]
pub struct DeviceStatusRow {
  #[getset(get_copy = "pub")]
  id: i32,
  timestamp: NaiveDateTime,
  kind: i32,
  status: i32,
}

impl DeviceStatusRow {
  pub fn timestamp(&self) -> NaiveDateTime {
    self.timestamp
  }

  pub fn kind(&self) -> DeviceKind {
    DeviceKind::from_address(self.kind as u8).expect("kind written from DeviceKind")
  }

  pub fn status(&self) -> PowerStatus {
    PowerStatus::from_code(self.status).expect("status written from PowerStatus")
  }
}

#[derive(Insertable)]
#[diesel(table_name = device_status)]
pub struct NewDeviceStatus {
  pub timestamp: NaiveDateTime,
  pub kind: i32,
  pub status: i32,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, CopyGetters)]
#[diesel(table_name = threshold_temperature)]
pub struct ThresholdTemperature {
  #[getset(get_copy = "pub")]
  id: i32,
  device_kind: i32,
  operating_mode: String,
  temperature_centi: i32,
}

impl ThresholdTemperature {
  /// Width of the comfort band around the configured temperature.
  pub const TEMPERATURE_RANGE: f32 = 0.5;

  /// A threshold that exists only in memory, never persisted. Used for the
  /// anti-freeze regulation synthesized in away mode.
  pub fn transient(device_kind: DeviceKind, operating_mode: OperatingMode, centi: i32) -> Self {
    Self {
      id: 0,
      device_kind: i32::from(device_kind.address()),
      operating_mode: operating_mode.as_str().to_owned(),
      temperature_centi: centi,
    }
  }

  pub fn device_kind(&self) -> DeviceKind {
    DeviceKind::from_address(self.device_kind as u8).expect("kind written from DeviceKind")
  }

  pub fn operating_mode(&self) -> OperatingMode {
    self
      .operating_mode
      .parse()
      .expect("mode written from OperatingMode")
  }

  pub fn temperature_centi(&self) -> i32 {
    self.temperature_centi
  }

  pub fn temperature(&self) -> f32 {
    self.temperature_centi as f32 / 100.0
  }

  /// Below this reading the room should be warmed up. Cooling turns off once
  /// the temperature has dropped a full range under the configured maximum;
  /// heating turns on the moment it reaches the configured minimum.
  pub fn warm_up_threshold(&self) -> f32 {
    match self.device_kind() {
      DeviceKind::Cooling => self.temperature() - Self::TEMPERATURE_RANGE,
      DeviceKind::Heating => self.temperature(),
    }
  }

  /// Above this reading the room should be cooled down. The mirror of
  /// [Self::warm_up_threshold].
  pub fn cool_down_threshold(&self) -> f32 {
    match self.device_kind() {
      DeviceKind::Cooling => self.temperature(),
      DeviceKind::Heating => self.temperature() + Self::TEMPERATURE_RANGE,
    }
  }

  /// The mid-band mark used for early shutoff: a device that has been
  /// running without pushing the room past this point for a sustained
  /// stretch gets turned off even though the band edge was never reached.
  pub fn power_save_threshold(&self) -> f32 {
    match self.device_kind() {
      DeviceKind::Cooling => self.temperature() - Self::TEMPERATURE_RANGE / 2.0,
      DeviceKind::Heating => self.temperature() + Self::TEMPERATURE_RANGE / 2.0,
    }
  }
}

#[derive(Insertable)]
#[diesel(table_name = threshold_temperature)]
pub struct NewThresholdTemperature {
  pub device_kind: i32,
  pub operating_mode: String,
  pub temperature_centi: i32,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, CopyGetters)]
#[diesel(table_name = device_control)]
pub struct DeviceControl {
  #[getset(get_copy = "pub")]
  id: i32,
  device_kind: i32,
  measure_kind: i32,
  operating_mode: String,
}

impl DeviceControl {
  pub fn device_kind(&self) -> DeviceKind {
    DeviceKind::from_address(self.device_kind as u8).expect("kind written from DeviceKind")
  }

  pub fn measure_kind(&self) -> MeasureKind {
    MeasureKind::from_address(self.measure_kind as u8).expect("kind written from MeasureKind")
  }

  pub fn operating_mode(&self) -> OperatingMode {
    self
      .operating_mode
      .parse()
      .expect("mode written from OperatingMode")
  }
}

#[derive(Insertable)]
#[diesel(table_name = device_control)]
pub struct NewDeviceControl {
  pub device_kind: i32,
  pub measure_kind: i32,
  pub operating_mode: String,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, CopyGetters)]
#[diesel(table_name = away_status)]
pub struct AwayStatusRow {
  #[getset(get_copy = "pub")]
  id: i32,
  #[getset(get_copy = "pub")]
  timestamp: NaiveDateTime,
  status: i32,
}

impl AwayStatusRow {
  pub fn status(&self) -> PowerStatus {
    PowerStatus::from_code(self.status).expect("status written from PowerStatus")
  }
}

#[derive(Insertable)]
#[diesel(table_name = away_status)]
pub struct NewAwayStatus {
  pub timestamp: NaiveDateTime,
  pub status: i32,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, CopyGetters)]
#[diesel(table_name = nonce)]
#[diesel(primary_key(owner))]
#[getset(get_copy = "pub")]
pub struct Nonce {
  owner: i32,
  inbound: i64,
  outbound: i64,
}

#[derive(Insertable)]
#[diesel(table_name = nonce)]
pub struct NewNonce {
  pub owner: i32,
  pub inbound: i64,
  pub outbound: i64,
}

#[derive(Insertable)]
#[diesel(table_name = nonce_request_response_log)]
pub struct NewNonceRequestResponse {
  pub owner: i32,
  pub timestamp: NaiveDateTime,
  pub inbound_nonce: i64,
  pub outbound_nonce: i64,
}
