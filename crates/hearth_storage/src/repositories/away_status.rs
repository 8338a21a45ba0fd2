use crate::models::{AwayStatusRow, NewAwayStatus};
use crate::schema::away_status::dsl;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use hearth_core::types::PowerStatus;

/// Appends an away-status change.
pub fn set_away_status(
  conn: &mut SqliteConnection,
  timestamp: NaiveDateTime,
  status: PowerStatus,
) -> QueryResult<()> {
  diesel::insert_into(dsl::away_status)
    .values(NewAwayStatus {
      timestamp,
      status: i32::from(status as u8),
    })
    .execute(conn)?;
  Ok(())
}

/// Whether the household is currently marked away. Defaults to not away.
pub fn is_away(conn: &mut SqliteConnection) -> QueryResult<bool> {
  let row = dsl::away_status
    .order(dsl::timestamp.desc())
    .select(AwayStatusRow::as_select())
    .first::<AwayStatusRow>(conn)
    .optional()?;
  Ok(row.map(|status| status.status().is_on()).unwrap_or(false))
}
