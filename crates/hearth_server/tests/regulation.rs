//! End-to-end regulation scenarios: a measure arrives, the engine decides,
//! frames and status rows come out.

mod util;

use chrono::Duration;
use hearth_core::protocol::{COMMAND_TURN_OFF, COMMAND_TURN_ON};
use hearth_core::types::{DeviceKind, MeasureKind, OperatingMode, PowerStatus};
use hearth_server::command_bus::commands::{EvaluateMeasure, RegulateTemperature, SaveMeasure};
use hearth_server::ui::UiEvent;
use hearth_storage::repositories::{
  device_control, device_ping, device_status, sensor_measure, threshold_temperature,
};
use util::{measure_at, now, Harness};

fn seed_cooling_day_control(harness: &mut Harness, threshold: f32) {
  device_control::set_controlling_measures(
    &mut harness.db,
    DeviceKind::Cooling,
    OperatingMode::Day,
    &[MeasureKind::LivingRoom],
  )
  .expect("seed control");
  threshold_temperature::set_threshold_temperature(
    &mut harness.db,
    DeviceKind::Cooling,
    OperatingMode::Day,
    threshold,
  )
  .expect("seed threshold");
}

fn arrives(harness: &mut Harness, kind: MeasureKind, temperature: f32) {
  let measure = measure_at(kind, now(), temperature);
  harness.execute_with_followups(&SaveMeasure::new(measure.clone()));
  harness.execute_with_followups(&EvaluateMeasure::new(measure));
}

#[test]
fn warm_room_turns_idle_cooler_on() {
  let mut harness = Harness::new();
  seed_cooling_day_control(&mut harness, 25.0);
  device_ping::insert(&mut harness.db, DeviceKind::Cooling, now() - Duration::seconds(30))
    .expect("seed ping");
  device_status::set_current_status(
    &mut harness.db,
    DeviceKind::Cooling,
    PowerStatus::TurnedOff,
    now() - Duration::seconds(600),
  )
  .expect("seed status");

  arrives(&mut harness, MeasureKind::LivingRoom, 25.60);

  let frames = harness.sent_frames();
  assert_eq!(frames.len(), 2, "exactly one pair of turn-on frames");
  for frame in &frames {
    assert_eq!(frame.command(), COMMAND_TURN_ON);
    assert_eq!(frame.to_address(), DeviceKind::Cooling.address());
    assert_eq!(frame.from_address(), util::MY_ADDRESS);
  }
  assert!(
    frames[1].nonce() > frames[0].nonce(),
    "each copy carries its own fresh nonce"
  );

  assert_eq!(
    device_status::current_status(&mut harness.db, DeviceKind::Cooling).expect("query"),
    Some(PowerStatus::TurnedOn)
  );
  assert!(harness.published_events().contains(&UiEvent::DeviceStatusUpdate {
    kind: DeviceKind::Cooling,
    is_working: true,
  }));
}

#[test]
fn grace_period_blocks_freshly_switched_cooler() {
  let mut harness = Harness::new();
  seed_cooling_day_control(&mut harness, 25.0);
  device_ping::insert(&mut harness.db, DeviceKind::Cooling, now() - Duration::seconds(30))
    .expect("seed ping");
  device_status::set_current_status(
    &mut harness.db,
    DeviceKind::Cooling,
    PowerStatus::TurnedOn,
    now() - Duration::seconds(60),
  )
  .expect("seed status");

  arrives(&mut harness, MeasureKind::LivingRoom, 25.60);

  assert!(harness.sent_frames().is_empty(), "no frames during grace");
  assert_eq!(
    device_status::current_status(&mut harness.db, DeviceKind::Cooling).expect("query"),
    Some(PowerStatus::TurnedOn)
  );
}

#[test]
fn coasting_cooler_shuts_off_to_save_power() {
  let mut harness = Harness::new();
  seed_cooling_day_control(&mut harness, 25.0);
  device_ping::insert(&mut harness.db, DeviceKind::Cooling, now() - Duration::seconds(30))
    .expect("seed ping");
  device_status::set_current_status(
    &mut harness.db,
    DeviceKind::Cooling,
    PowerStatus::TurnedOn,
    now() - Duration::minutes(30),
  )
  .expect("seed status");
  // Twenty minutes of coasting inside the band; the dips below the
  // power-save mark all predate the fifteen-minute window.
  for (minutes_ago, temperature) in [(20, 24.72), (17, 24.70), (12, 24.78), (8, 24.80), (4, 24.76)]
  {
    sensor_measure::insert(
      &mut harness.db,
      &measure_at(
        MeasureKind::LivingRoom,
        now() - Duration::minutes(minutes_ago),
        temperature,
      ),
    )
    .expect("seed sample");
  }

  arrives(&mut harness, MeasureKind::LivingRoom, 24.76);

  let frames = harness.sent_frames();
  assert_eq!(frames.len(), 2, "exactly one pair of turn-off frames");
  for frame in &frames {
    assert_eq!(frame.command(), COMMAND_TURN_OFF);
    assert_eq!(frame.to_address(), DeviceKind::Cooling.address());
  }
  assert_eq!(
    device_status::current_status(&mut harness.db, DeviceKind::Cooling).expect("query"),
    Some(PowerStatus::TurnedOff)
  );
}

#[test]
fn recent_dip_below_power_save_mark_keeps_cooler_running() {
  let mut harness = Harness::new();
  seed_cooling_day_control(&mut harness, 25.0);
  device_ping::insert(&mut harness.db, DeviceKind::Cooling, now() - Duration::seconds(30))
    .expect("seed ping");
  device_status::set_current_status(
    &mut harness.db,
    DeviceKind::Cooling,
    PowerStatus::TurnedOn,
    now() - Duration::minutes(30),
  )
  .expect("seed status");
  // Still reaching below the mark five minutes ago: no early shutoff.
  sensor_measure::insert(
    &mut harness.db,
    &measure_at(MeasureKind::LivingRoom, now() - Duration::minutes(5), 24.70),
  )
  .expect("seed sample");

  arrives(&mut harness, MeasureKind::LivingRoom, 24.76);

  assert!(harness.sent_frames().is_empty());
  assert_eq!(
    device_status::current_status(&mut harness.db, DeviceKind::Cooling).expect("query"),
    Some(PowerStatus::TurnedOn)
  );
}

#[test]
fn underachieving_heater_shuts_off_to_save_power() {
  let mut harness = Harness::new();
  device_control::set_controlling_measures(
    &mut harness.db,
    DeviceKind::Heating,
    OperatingMode::Day,
    &[MeasureKind::Bedroom],
  )
  .expect("seed control");
  threshold_temperature::set_threshold_temperature(
    &mut harness.db,
    DeviceKind::Heating,
    OperatingMode::Day,
    19.0,
  )
  .expect("seed threshold");
  device_ping::insert(&mut harness.db, DeviceKind::Heating, now() - Duration::seconds(30))
    .expect("seed ping");
  device_status::set_current_status(
    &mut harness.db,
    DeviceKind::Heating,
    PowerStatus::TurnedOn,
    now() - Duration::minutes(30),
  )
  .expect("seed status");
  // The heater has run for half an hour without pushing the bedroom past
  // the 19.25 power-save mark.
  for (minutes_ago, temperature) in [(14, 19.05), (9, 19.10), (4, 19.12)] {
    sensor_measure::insert(
      &mut harness.db,
      &measure_at(
        MeasureKind::Bedroom,
        now() - Duration::minutes(minutes_ago),
        temperature,
      ),
    )
    .expect("seed sample");
  }

  arrives(&mut harness, MeasureKind::Bedroom, 19.10);

  let frames = harness.sent_frames();
  assert_eq!(frames.len(), 2);
  for frame in &frames {
    assert_eq!(frame.command(), COMMAND_TURN_OFF);
    assert_eq!(frame.to_address(), DeviceKind::Heating.address());
  }
  assert_eq!(
    device_status::current_status(&mut harness.db, DeviceKind::Heating).expect("query"),
    Some(PowerStatus::TurnedOff)
  );
}

#[test]
fn away_mode_heats_freezing_bedroom() {
  let mut harness = Harness::new();
  hearth_storage::repositories::away_status::set_away_status(
    &mut harness.db,
    now() - Duration::hours(3),
    PowerStatus::TurnedOn,
  )
  .expect("seed away");
  device_ping::insert(&mut harness.db, DeviceKind::Heating, now() - Duration::seconds(30))
    .expect("seed ping");
  device_status::set_current_status(
    &mut harness.db,
    DeviceKind::Heating,
    PowerStatus::TurnedOff,
    now() - Duration::seconds(600),
  )
  .expect("seed status");

  arrives(&mut harness, MeasureKind::Bedroom, 14.80);

  let frames = harness.sent_frames();
  assert_eq!(frames.len(), 2, "anti-freeze turn-on pair");
  for frame in &frames {
    assert_eq!(frame.command(), COMMAND_TURN_ON);
    assert_eq!(frame.to_address(), DeviceKind::Heating.address());
  }
  assert_eq!(
    device_status::current_status(&mut harness.db, DeviceKind::Heating).expect("query"),
    Some(PowerStatus::TurnedOn)
  );
}

#[test]
fn away_mode_ignores_the_cooler_entirely() {
  let mut harness = Harness::new();
  seed_cooling_day_control(&mut harness, 25.0);
  hearth_storage::repositories::away_status::set_away_status(
    &mut harness.db,
    now() - Duration::hours(3),
    PowerStatus::TurnedOn,
  )
  .expect("seed away");
  device_ping::insert(&mut harness.db, DeviceKind::Cooling, now() - Duration::seconds(30))
    .expect("seed ping");

  arrives(&mut harness, MeasureKind::LivingRoom, 31.0);

  assert!(
    harness.sent_frames().is_empty(),
    "away mode never runs the cooler, however hot the room"
  );
}

#[test]
fn offline_device_is_assumed_off_instead_of_commanded() {
  let mut harness = Harness::new();
  device_ping::insert(
    &mut harness.db,
    DeviceKind::Cooling,
    now() - Duration::seconds(600),
  )
  .expect("seed stale ping");
  device_status::set_current_status(
    &mut harness.db,
    DeviceKind::Cooling,
    PowerStatus::TurnedOn,
    now() - Duration::minutes(30),
  )
  .expect("seed status");
  let threshold = threshold_temperature::set_threshold_temperature(
    &mut harness.db,
    DeviceKind::Cooling,
    OperatingMode::Day,
    25.0,
  )
  .expect("seed threshold");

  let measure = measure_at(MeasureKind::LivingRoom, now(), 27.5);
  harness.execute_with_followups(&RegulateTemperature::new(
    DeviceKind::Cooling,
    measure,
    threshold,
  ));

  assert!(harness.sent_frames().is_empty(), "no wire message emitted");
  assert_eq!(
    device_status::current_status(&mut harness.db, DeviceKind::Cooling).expect("query"),
    Some(PowerStatus::TurnedOff),
    "local belief de-asserted"
  );
  assert!(harness.published_events().contains(&UiEvent::DeviceStatusUpdate {
    kind: DeviceKind::Cooling,
    is_working: false,
  }));
}

#[test]
fn assume_off_is_a_no_op_when_already_off() {
  let mut harness = Harness::new();
  device_status::set_current_status(
    &mut harness.db,
    DeviceKind::Cooling,
    PowerStatus::TurnedOff,
    now() - Duration::minutes(30),
  )
  .expect("seed status");
  let threshold = threshold_temperature::set_threshold_temperature(
    &mut harness.db,
    DeviceKind::Cooling,
    OperatingMode::Day,
    25.0,
  )
  .expect("seed threshold");

  // No ping at all: the device is offline.
  let measure = measure_at(MeasureKind::LivingRoom, now(), 27.5);
  harness.execute_with_followups(&RegulateTemperature::new(
    DeviceKind::Cooling,
    measure,
    threshold,
  ));

  assert!(harness.published_events().is_empty(), "no redundant update");
  let transitions = device_status::last_transition_to(
    &mut harness.db,
    DeviceKind::Cooling,
    PowerStatus::TurnedOff,
  )
  .expect("query");
  assert_eq!(transitions, Some(now() - Duration::minutes(30)), "no new row");
}
