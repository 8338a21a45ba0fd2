//! Resolves the set of (measure, device, threshold) pairings active at a
//! given moment, folding in the operating-mode schedule and away mode.

use crate::models::ThresholdTemperature;
use crate::repositories::{away_status, device_control, threshold_temperature};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use hearth_core::types::{DeviceKind, MeasureKind, OperatingMode};

/// Safety floor maintained in away mode, in hundredths of a degree.
pub const ANTI_FREEZE_TEMP_CENTI: i32 = 1500;

/// Rooms protected against freezing while the household is away.
const ANTI_FREEZE_MEASURES: [MeasureKind; 2] = [MeasureKind::LivingRoom, MeasureKind::Bedroom];

fn anti_freeze_threshold(mode: OperatingMode) -> ThresholdTemperature {
  ThresholdTemperature::transient(DeviceKind::Heating, mode, ANTI_FREEZE_TEMP_CENTI)
}

/// The devices regulated by `measure` right now, with their thresholds.
///
/// In away mode only the indoor anti-freeze pairings exist: each indoor
/// room drives the heater toward the 15 °C floor and nothing else is
/// regulated.
pub fn get_regulation_for_measure(
  conn: &mut SqliteConnection,
  measure: MeasureKind,
  now: NaiveDateTime,
) -> QueryResult<Vec<(DeviceKind, ThresholdTemperature)>> {
  let mode = OperatingMode::for_timestamp(now);

  if away_status::is_away(conn)? {
    if !ANTI_FREEZE_MEASURES.contains(&measure) {
      return Ok(vec![]);
    }
    return Ok(vec![(DeviceKind::Heating, anti_freeze_threshold(mode))]);
  }

  let mut regulations = Vec::new();
  for control in device_control::get_devices_controlled_by(conn, measure, mode)? {
    let threshold =
      threshold_temperature::get_threshold_temperature(conn, control.device_kind(), mode)?;
    regulations.push((control.device_kind(), threshold));
  }
  Ok(regulations)
}

/// The measures regulating `device` right now, with their thresholds. The
/// away-mode mirror of [get_regulation_for_measure].
pub fn get_regulation_for_device(
  conn: &mut SqliteConnection,
  device: DeviceKind,
  now: NaiveDateTime,
) -> QueryResult<Vec<(MeasureKind, ThresholdTemperature)>> {
  let mode = OperatingMode::for_timestamp(now);

  if away_status::is_away(conn)? {
    if device != DeviceKind::Heating {
      // The safety floor only ever needs the heater.
      return Ok(vec![]);
    }
    return Ok(
      ANTI_FREEZE_MEASURES
        .iter()
        .map(|measure| (*measure, anti_freeze_threshold(mode)))
        .collect(),
    );
  }

  let mut regulations = Vec::new();
  for control in device_control::get_measures_controlling(conn, device, Some(mode))? {
    let threshold = threshold_temperature::get_threshold_temperature(conn, device, mode)?;
    regulations.push((control.measure_kind(), threshold));
  }
  Ok(regulations)
}
