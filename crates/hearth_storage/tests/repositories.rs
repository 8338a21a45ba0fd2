use chrono::{Duration, NaiveDate, NaiveDateTime};
use hearth_core::types::{DeviceKind, MeasureKind, OperatingMode, PowerStatus, SensorMeasure};
use hearth_storage::repositories::{
  away_status, device_control, device_ping, device_status, nonce, sensor_measure,
  threshold_temperature,
};

fn now() -> NaiveDateTime {
  NaiveDate::from_ymd_opt(2023, 9, 13)
    .expect("valid date")
    .and_hms_opt(11, 35, 15)
    .expect("valid time")
}

fn store() -> diesel::SqliteConnection {
  hearth_storage::establish(":memory:").expect("in-memory store")
}

fn measure(kind: MeasureKind, timestamp: NaiveDateTime, temperature: f32) -> SensorMeasure {
  SensorMeasure::new(timestamp, kind, temperature, Some(45.2), Some(2.98))
}

#[test]
fn latest_measure_respects_kind_and_window() {
  let mut conn = store();
  sensor_measure::insert(
    &mut conn,
    &measure(MeasureKind::Bedroom, now() - Duration::minutes(30), 20.5),
  )
  .expect("insert");
  sensor_measure::insert(
    &mut conn,
    &measure(MeasureKind::Bedroom, now() - Duration::minutes(5), 20.9),
  )
  .expect("insert");
  sensor_measure::insert(
    &mut conn,
    &measure(MeasureKind::LivingRoom, now() - Duration::minutes(1), 22.4),
  )
  .expect("insert");

  let latest = sensor_measure::latest(&mut conn, MeasureKind::Bedroom, None)
    .expect("query")
    .expect("present");
  assert_eq!(latest.temperature, 20.9);
  assert_eq!(latest.kind, MeasureKind::Bedroom);
  assert_eq!(latest.humidity, Some(45.2));

  let windowed = sensor_measure::latest(
    &mut conn,
    MeasureKind::Bedroom,
    Some(now() - Duration::minutes(10)),
  )
  .expect("query")
  .expect("present");
  assert_eq!(windowed.temperature, 20.9);

  let stale_window = sensor_measure::latest(
    &mut conn,
    MeasureKind::Bedroom,
    Some(now() - Duration::minutes(2)),
  )
  .expect("query");
  assert!(stale_window.is_none());

  assert!(sensor_measure::latest(&mut conn, MeasureKind::Outdoor, None)
    .expect("query")
    .is_none());
}

#[test]
fn threshold_crossing_queries_see_only_the_window() {
  let mut conn = store();
  for (minutes_ago, temperature) in [(25, 24.70), (12, 24.78), (8, 24.80), (3, 24.76)] {
    sensor_measure::insert(
      &mut conn,
      &measure(
        MeasureKind::LivingRoom,
        now() - Duration::minutes(minutes_ago),
        temperature,
      ),
    )
    .expect("insert");
  }

  let since = now() - Duration::minutes(15);
  let below = sensor_measure::latest_below_since(&mut conn, MeasureKind::LivingRoom, 24.75, since)
    .expect("query");
  assert!(below.is_none(), "the 24.70 sample is outside the window");

  let above = sensor_measure::latest_above_since(&mut conn, MeasureKind::LivingRoom, 24.75, since)
    .expect("query")
    .expect("present");
  assert_eq!(above.temperature, 24.76);

  let wide = sensor_measure::latest_below_since(
    &mut conn,
    MeasureKind::LivingRoom,
    24.75,
    now() - Duration::minutes(30),
  )
  .expect("query")
  .expect("present");
  assert_eq!(wide.temperature, 24.70);
}

#[test]
fn device_ping_returns_most_recent() {
  let mut conn = store();
  assert!(device_ping::last_ping(&mut conn, DeviceKind::Heating)
    .expect("query")
    .is_none());

  device_ping::insert(&mut conn, DeviceKind::Heating, now() - Duration::minutes(10))
    .expect("insert");
  device_ping::insert(&mut conn, DeviceKind::Heating, now() - Duration::minutes(2))
    .expect("insert");
  device_ping::insert(&mut conn, DeviceKind::Cooling, now() - Duration::minutes(1))
    .expect("insert");

  assert_eq!(
    device_ping::last_ping(&mut conn, DeviceKind::Heating).expect("query"),
    Some(now() - Duration::minutes(2))
  );
}

#[test]
fn device_status_log_tracks_current_and_transitions() {
  let mut conn = store();
  assert_eq!(
    device_status::current_status(&mut conn, DeviceKind::Cooling).expect("query"),
    None
  );

  device_status::set_current_status(
    &mut conn,
    DeviceKind::Cooling,
    PowerStatus::TurnedOn,
    now() - Duration::minutes(40),
  )
  .expect("insert");
  device_status::set_current_status(
    &mut conn,
    DeviceKind::Cooling,
    PowerStatus::TurnedOff,
    now() - Duration::minutes(20),
  )
  .expect("insert");

  assert_eq!(
    device_status::current_status(&mut conn, DeviceKind::Cooling).expect("query"),
    Some(PowerStatus::TurnedOff)
  );
  assert_eq!(
    device_status::last_transition_to(&mut conn, DeviceKind::Cooling, PowerStatus::TurnedOn)
      .expect("query"),
    Some(now() - Duration::minutes(40))
  );
  assert_eq!(
    device_status::last_transition_to(&mut conn, DeviceKind::Heating, PowerStatus::TurnedOn)
      .expect("query"),
    None
  );
}

#[test]
fn away_status_defaults_off_and_follows_latest_row() {
  let mut conn = store();
  assert!(!away_status::is_away(&mut conn).expect("query"));

  away_status::set_away_status(
    &mut conn,
    now() - Duration::hours(2),
    PowerStatus::TurnedOn,
  )
  .expect("insert");
  assert!(away_status::is_away(&mut conn).expect("query"));

  away_status::set_away_status(&mut conn, now(), PowerStatus::TurnedOff).expect("insert");
  assert!(!away_status::is_away(&mut conn).expect("query"));
}

#[test]
fn thresholds_default_lazily_and_update_in_place() {
  let mut conn = store();
  let cooling =
    threshold_temperature::get_threshold_temperature(&mut conn, DeviceKind::Cooling, OperatingMode::Day)
      .expect("query");
  assert_eq!(cooling.temperature_centi(), 2600);

  let heating =
    threshold_temperature::get_threshold_temperature(&mut conn, DeviceKind::Heating, OperatingMode::Night)
      .expect("query");
  assert_eq!(heating.temperature_centi(), 1700);

  let updated = threshold_temperature::set_threshold_temperature(
    &mut conn,
    DeviceKind::Cooling,
    OperatingMode::Day,
    25.0,
  )
  .expect("update");
  assert_eq!(updated.temperature_centi(), 2500);

  let reread =
    threshold_temperature::get_threshold_temperature(&mut conn, DeviceKind::Cooling, OperatingMode::Day)
      .expect("query");
  assert_eq!(reread.temperature_centi(), 2500);
  // Still exactly one row for the pair: night stays at its default.
  let night =
    threshold_temperature::get_threshold_temperature(&mut conn, DeviceKind::Cooling, OperatingMode::Night)
      .expect("query");
  assert_eq!(night.temperature_centi(), 2600);
}

#[test]
fn threshold_semantics_per_device_kind() {
  let mut conn = store();
  let cooling = threshold_temperature::set_threshold_temperature(
    &mut conn,
    DeviceKind::Cooling,
    OperatingMode::Day,
    25.0,
  )
  .expect("update");
  assert_eq!(cooling.warm_up_threshold(), 24.5);
  assert_eq!(cooling.cool_down_threshold(), 25.0);
  assert_eq!(cooling.power_save_threshold(), 24.75);

  let heating = threshold_temperature::set_threshold_temperature(
    &mut conn,
    DeviceKind::Heating,
    OperatingMode::Day,
    19.0,
  )
  .expect("update");
  assert_eq!(heating.warm_up_threshold(), 19.0);
  assert_eq!(heating.cool_down_threshold(), 19.5);
  assert_eq!(heating.power_save_threshold(), 19.25);
}

#[test]
fn device_control_replaces_only_the_targeted_pair() {
  let mut conn = store();
  device_control::set_controlling_measures(
    &mut conn,
    DeviceKind::Heating,
    OperatingMode::Day,
    &[MeasureKind::LivingRoom, MeasureKind::Bedroom],
  )
  .expect("set");
  device_control::set_controlling_measures(
    &mut conn,
    DeviceKind::Heating,
    OperatingMode::Night,
    &[MeasureKind::Bedroom],
  )
  .expect("set");

  let day = device_control::get_measures_controlling(
    &mut conn,
    DeviceKind::Heating,
    Some(OperatingMode::Day),
  )
  .expect("query");
  assert_eq!(
    day.iter().map(|c| c.measure_kind()).collect::<Vec<_>>(),
    vec![MeasureKind::LivingRoom, MeasureKind::Bedroom]
  );

  device_control::set_controlling_measures(
    &mut conn,
    DeviceKind::Heating,
    OperatingMode::Day,
    &[MeasureKind::Bedroom],
  )
  .expect("replace");

  let day = device_control::get_measures_controlling(
    &mut conn,
    DeviceKind::Heating,
    Some(OperatingMode::Day),
  )
  .expect("query");
  assert_eq!(day.len(), 1);
  assert_eq!(day[0].measure_kind(), MeasureKind::Bedroom);

  // The night pairing is untouched, and the unfiltered view sees both modes.
  let all = device_control::get_measures_controlling(&mut conn, DeviceKind::Heating, None)
    .expect("query");
  assert_eq!(all.len(), 2);

  let devices = device_control::get_devices_controlled_by(
    &mut conn,
    MeasureKind::Bedroom,
    OperatingMode::Night,
  )
  .expect("query");
  assert_eq!(devices.len(), 1);
  assert_eq!(devices[0].device_kind(), DeviceKind::Heating);
}

#[test]
fn nonce_counters_start_at_zero_and_advance() {
  let mut conn = store();
  assert_eq!(nonce::get_last_inbound_nonce(&mut conn, 0x20).expect("query"), 0);

  nonce::register_inbound_nonce(&mut conn, 0x20, 41).expect("update");
  assert_eq!(nonce::get_last_inbound_nonce(&mut conn, 0x20).expect("query"), 41);
  // Other peers keep their own counters.
  assert_eq!(nonce::get_last_inbound_nonce(&mut conn, 0x21).expect("query"), 0);

  assert_eq!(nonce::next_outbound_nonce(&mut conn, 0x90).expect("update"), 1);
  assert_eq!(nonce::next_outbound_nonce(&mut conn, 0x90).expect("update"), 2);
  assert_eq!(nonce::next_outbound_nonce(&mut conn, 0x91).expect("update"), 1);
}
