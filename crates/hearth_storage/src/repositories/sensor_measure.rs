use crate::models::{NewSensorMeasure, SensorMeasureRow};
use crate::schema::sensor_measure::dsl;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use hearth_core::types::{MeasureKind, SensorMeasure};

/// Appends a measure. Measures are never updated or deleted.
pub fn insert(conn: &mut SqliteConnection, measure: &SensorMeasure) -> QueryResult<()> {
  diesel::insert_into(dsl::sensor_measure)
    .values(NewSensorMeasure {
      timestamp: measure.timestamp,
      kind: i32::from(measure.kind.address()),
      temperature: measure.temperature,
      humidity: measure.humidity,
      voltage: measure.voltage,
    })
    .execute(conn)?;
  Ok(())
}

/// The most recent measure of `kind`, optionally no older than `max_age`.
pub fn latest(
  conn: &mut SqliteConnection,
  kind: MeasureKind,
  max_age: Option<NaiveDateTime>,
) -> QueryResult<Option<SensorMeasure>> {
  let mut query = dsl::sensor_measure
    .filter(dsl::kind.eq(i32::from(kind.address())))
    .order(dsl::timestamp.desc())
    .select(SensorMeasureRow::as_select())
    .into_boxed();
  if let Some(max_age) = max_age {
    query = query.filter(dsl::timestamp.gt(max_age));
  }
  let row = query.first::<SensorMeasureRow>(conn).optional()?;
  Ok(row.map(SensorMeasureRow::into_measure))
}

/// The most recent measure of `kind` since `since` reading strictly below
/// `temperature`.
pub fn latest_below_since(
  conn: &mut SqliteConnection,
  kind: MeasureKind,
  temperature: f32,
  since: NaiveDateTime,
) -> QueryResult<Option<SensorMeasure>> {
  let row = dsl::sensor_measure
    .filter(dsl::kind.eq(i32::from(kind.address())))
    .filter(dsl::timestamp.gt(since))
    .filter(dsl::temperature.lt(temperature))
    .order(dsl::timestamp.desc())
    .select(SensorMeasureRow::as_select())
    .first::<SensorMeasureRow>(conn)
    .optional()?;
  Ok(row.map(SensorMeasureRow::into_measure))
}

/// The most recent measure of `kind` since `since` reading strictly above
/// `temperature`.
pub fn latest_above_since(
  conn: &mut SqliteConnection,
  kind: MeasureKind,
  temperature: f32,
  since: NaiveDateTime,
) -> QueryResult<Option<SensorMeasure>> {
  let row = dsl::sensor_measure
    .filter(dsl::kind.eq(i32::from(kind.address())))
    .filter(dsl::timestamp.gt(since))
    .filter(dsl::temperature.gt(temperature))
    .order(dsl::timestamp.desc())
    .select(SensorMeasureRow::as_select())
    .first::<SensorMeasureRow>(conn)
    .optional()?;
  Ok(row.map(SensorMeasureRow::into_measure))
}
