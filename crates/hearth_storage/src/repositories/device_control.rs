use crate::models::{DeviceControl, NewDeviceControl};
use crate::schema::device_control::dsl;
use diesel::prelude::*;
use hearth_core::types::{DeviceKind, MeasureKind, OperatingMode};

/// Replaces the set of measures that control `device_kind` in `mode`.
pub fn set_controlling_measures(
  conn: &mut SqliteConnection,
  device_kind: DeviceKind,
  mode: OperatingMode,
  measures: &[MeasureKind],
) -> QueryResult<()> {
  diesel::delete(
    dsl::device_control
      .filter(dsl::device_kind.eq(i32::from(device_kind.address())))
      .filter(dsl::operating_mode.eq(mode.as_str())),
  )
  .execute(conn)?;

  for measure_kind in measures {
    diesel::insert_into(dsl::device_control)
      .values(NewDeviceControl {
        device_kind: i32::from(device_kind.address()),
        measure_kind: i32::from(measure_kind.address()),
        operating_mode: mode.as_str().to_owned(),
      })
      .execute(conn)?;
  }
  Ok(())
}

/// The measures controlling `device_kind`, optionally narrowed to one mode.
pub fn get_measures_controlling(
  conn: &mut SqliteConnection,
  device_kind: DeviceKind,
  mode: Option<OperatingMode>,
) -> QueryResult<Vec<DeviceControl>> {
  let mut query = dsl::device_control
    .filter(dsl::device_kind.eq(i32::from(device_kind.address())))
    .order(dsl::id.asc())
    .select(DeviceControl::as_select())
    .into_boxed();
  if let Some(mode) = mode {
    query = query.filter(dsl::operating_mode.eq(mode.as_str()));
  }
  query.load::<DeviceControl>(conn)
}

/// The devices controlled by `measure_kind` in `mode`, in configuration
/// order.
pub fn get_devices_controlled_by(
  conn: &mut SqliteConnection,
  measure_kind: MeasureKind,
  mode: OperatingMode,
) -> QueryResult<Vec<DeviceControl>> {
  dsl::device_control
    .filter(dsl::measure_kind.eq(i32::from(measure_kind.address())))
    .filter(dsl::operating_mode.eq(mode.as_str()))
    .order(dsl::id.asc())
    .select(DeviceControl::as_select())
    .load::<DeviceControl>(conn)
}
