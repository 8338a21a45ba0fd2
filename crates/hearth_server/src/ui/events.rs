//! Messages pushed to dashboard listeners. Serialized as `{type, payload}`
//! JSON objects; kind enums appear as their wire codes, modes as strings.

use chrono::NaiveDateTime;
use hearth_core::types::{DeviceKind, MeasureKind, OperatingMode};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum UiEvent {
  /// A new temperature reading is available.
  #[serde(rename = "measure/updateTemperature")]
  TemperatureUpdate {
    timestamp: NaiveDateTime,
    kind: MeasureKind,
    temperature: f32,
  },
  /// A new humidity reading is available.
  #[serde(rename = "measure/updateHumidity")]
  HumidityUpdate {
    timestamp: NaiveDateTime,
    kind: MeasureKind,
    humidity: f32,
  },
  /// A device sent a liveness ping.
  #[serde(rename = "device/ping")]
  DevicePingReceived {
    kind: DeviceKind,
    timestamp: NaiveDateTime,
  },
  /// A device was switched (or reported itself switched) on or off.
  #[serde(rename = "device/updateStatus")]
  DeviceStatusUpdate {
    kind: DeviceKind,
    #[serde(rename = "isWorking")]
    is_working: bool,
  },
  /// The set of measures controlling a device changed.
  #[serde(rename = "device/updateDeviceControl")]
  DeviceControlUpdate {
    #[serde(rename = "deviceKind")]
    device_kind: DeviceKind,
    #[serde(rename = "controlledBy")]
    controlled_by: BTreeMap<OperatingMode, Vec<MeasureKind>>,
  },
  /// A threshold temperature was reconfigured.
  #[serde(rename = "device/updateThresholdTemperature")]
  ThresholdTemperatureUpdate {
    kind: DeviceKind,
    mode: OperatingMode,
    temperature: f32,
  },
  /// The away flag flipped.
  #[serde(rename = "device/updateAwayStatus")]
  AwayStatusUpdate(bool),
}
