use crate::models::{NewThresholdTemperature, ThresholdTemperature};
use crate::schema::threshold_temperature::dsl;
use diesel::prelude::*;
use hearth_core::types::{DeviceKind, OperatingMode};

/// Factory defaults, in hundredths of a degree, used until the dashboard
/// configures something else.
fn default_temperature_centi(device_kind: DeviceKind) -> i32 {
  match device_kind {
    DeviceKind::Cooling => 2600,
    DeviceKind::Heating => 1700,
  }
}

/// The configured threshold for `(device_kind, operating_mode)`. Creates the
/// row with the factory default on first access, so there is always exactly
/// one row per pair.
pub fn get_threshold_temperature(
  conn: &mut SqliteConnection,
  device_kind: DeviceKind,
  operating_mode: OperatingMode,
) -> QueryResult<ThresholdTemperature> {
  let existing = dsl::threshold_temperature
    .filter(dsl::device_kind.eq(i32::from(device_kind.address())))
    .filter(dsl::operating_mode.eq(operating_mode.as_str()))
    .select(ThresholdTemperature::as_select())
    .first::<ThresholdTemperature>(conn)
    .optional()?;

  match existing {
    Some(threshold) => Ok(threshold),
    None => {
      diesel::insert_into(dsl::threshold_temperature)
        .values(NewThresholdTemperature {
          device_kind: i32::from(device_kind.address()),
          operating_mode: operating_mode.as_str().to_owned(),
          temperature_centi: default_temperature_centi(device_kind),
        })
        .execute(conn)?;
      dsl::threshold_temperature
        .filter(dsl::device_kind.eq(i32::from(device_kind.address())))
        .filter(dsl::operating_mode.eq(operating_mode.as_str()))
        .select(ThresholdTemperature::as_select())
        .first::<ThresholdTemperature>(conn)
    }
  }
}

/// Replaces the threshold for `(device_kind, operating_mode)` in place and
/// returns the updated row.
pub fn set_threshold_temperature(
  conn: &mut SqliteConnection,
  device_kind: DeviceKind,
  operating_mode: OperatingMode,
  temperature: f32,
) -> QueryResult<ThresholdTemperature> {
  // Ensure the row exists, then overwrite its temperature.
  get_threshold_temperature(conn, device_kind, operating_mode)?;
  diesel::update(
    dsl::threshold_temperature
      .filter(dsl::device_kind.eq(i32::from(device_kind.address())))
      .filter(dsl::operating_mode.eq(operating_mode.as_str())),
  )
  .set(dsl::temperature_centi.eq((temperature * 100.0).round() as i32))
  .execute(conn)?;
  get_threshold_temperature(conn, device_kind, operating_mode)
}
