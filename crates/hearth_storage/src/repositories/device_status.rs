use crate::models::{DeviceStatusRow, NewDeviceStatus};
use crate::schema::device_status::dsl;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use hearth_core::types::{DeviceKind, PowerStatus};

/// Appends a status transition; the log is never rewritten.
pub fn set_current_status(
  conn: &mut SqliteConnection,
  kind: DeviceKind,
  status: PowerStatus,
  timestamp: NaiveDateTime,
) -> QueryResult<()> {
  diesel::insert_into(dsl::device_status)
    .values(NewDeviceStatus {
      timestamp,
      kind: i32::from(kind.address()),
      status: i32::from(status as u8),
    })
    .execute(conn)?;
  Ok(())
}

/// The most recently logged status for `kind`; `None` if the device has
/// never been switched (callers treat that as off).
pub fn current_status(
  conn: &mut SqliteConnection,
  kind: DeviceKind,
) -> QueryResult<Option<PowerStatus>> {
  let row = dsl::device_status
    .filter(dsl::kind.eq(i32::from(kind.address())))
    .order(dsl::timestamp.desc())
    .select(DeviceStatusRow::as_select())
    .first::<DeviceStatusRow>(conn)
    .optional()?;
  Ok(row.map(|status| status.status()))
}

/// When `kind` last transitioned to the given status, if ever.
pub fn last_transition_to(
  conn: &mut SqliteConnection,
  kind: DeviceKind,
  status: PowerStatus,
) -> QueryResult<Option<NaiveDateTime>> {
  let row = dsl::device_status
    .filter(dsl::kind.eq(i32::from(kind.address())))
    .filter(dsl::status.eq(i32::from(status as u8)))
    .order(dsl::timestamp.desc())
    .select(DeviceStatusRow::as_select())
    .first::<DeviceStatusRow>(conn)
    .optional()?;
  Ok(row.map(|transition| transition.timestamp()))
}
