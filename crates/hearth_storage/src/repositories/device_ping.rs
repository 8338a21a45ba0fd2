use crate::models::{DevicePingRow, NewDevicePing};
use crate::schema::device_ping::dsl;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use hearth_core::types::DeviceKind;

/// Appends a liveness ping for `kind`.
pub fn insert(
  conn: &mut SqliteConnection,
  kind: DeviceKind,
  timestamp: NaiveDateTime,
) -> QueryResult<()> {
  diesel::insert_into(dsl::device_ping)
    .values(NewDevicePing {
      timestamp,
      kind: i32::from(kind.address()),
    })
    .execute(conn)?;
  Ok(())
}

/// When the device of `kind` was last heard from, if ever.
pub fn last_ping(conn: &mut SqliteConnection, kind: DeviceKind) -> QueryResult<Option<NaiveDateTime>> {
  let row = dsl::device_ping
    .filter(dsl::kind.eq(i32::from(kind.address())))
    .order(dsl::timestamp.desc())
    .select(DevicePingRow::as_select())
    .first::<DevicePingRow>(conn)
    .optional()?;
  Ok(row.map(|ping| ping.timestamp()))
}
