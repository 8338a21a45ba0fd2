use crate::command_bus::{Command, CommandError, ExecutionContext};
use crate::ui::UiEvent;
use hearth_core::types::{DeviceKind, MeasureKind, OperatingMode, PowerStatus};
use hearth_storage::repositories::{
  away_status, device_control, device_ping, device_status, sensor_measure, threshold_temperature,
};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use tokio::sync::mpsc::UnboundedSender;

/// Pushes the full current snapshot to one freshly connected listener:
/// away flag, latest readings, control configuration, device statuses,
/// thresholds for both modes and last pings.
pub struct InitializeDisplay {
  listener: UnboundedSender<UiEvent>,
}

impl InitializeDisplay {
  pub fn new(listener: UnboundedSender<UiEvent>) -> Self {
    Self { listener }
  }

  fn send(&self, event: UiEvent) {
    // The listener may already be gone; initialization is then moot.
    if self.listener.send(event).is_err() {
      debug!("Listener disconnected before display initialization finished");
    }
  }
}

impl Command for InitializeDisplay {
  fn name(&self) -> &'static str {
    "InitializeDisplay"
  }

  fn execute(&self, context: &mut ExecutionContext) -> Result<(), CommandError> {
    self.send(UiEvent::AwayStatusUpdate(away_status::is_away(context.db)?));

    for kind in MeasureKind::iter() {
      let Some(measure) = sensor_measure::latest(context.db, kind, None)? else {
        continue;
      };
      self.send(UiEvent::TemperatureUpdate {
        timestamp: measure.timestamp,
        kind,
        temperature: measure.temperature,
      });
      if let Some(humidity) = measure.humidity {
        self.send(UiEvent::HumidityUpdate {
          timestamp: measure.timestamp,
          kind,
          humidity,
        });
      }
    }

    for kind in DeviceKind::iter() {
      let mut controlled_by: BTreeMap<OperatingMode, Vec<MeasureKind>> =
        OperatingMode::iter().map(|mode| (mode, vec![])).collect();
      for control in device_control::get_measures_controlling(context.db, kind, None)? {
        controlled_by
          .entry(control.operating_mode())
          .or_default()
          .push(control.measure_kind());
      }
      self.send(UiEvent::DeviceControlUpdate {
        device_kind: kind,
        controlled_by,
      });

      let status = device_status::current_status(context.db, kind)?
        .unwrap_or(PowerStatus::TurnedOff);
      self.send(UiEvent::DeviceStatusUpdate {
        kind,
        is_working: status.is_on(),
      });

      for mode in OperatingMode::iter() {
        let threshold = threshold_temperature::get_threshold_temperature(context.db, kind, mode)?;
        self.send(UiEvent::ThresholdTemperatureUpdate {
          kind,
          mode,
          temperature: threshold.temperature(),
        });
      }

      if let Some(timestamp) = device_ping::last_ping(context.db, kind)? {
        self.send(UiEvent::DevicePingReceived { kind, timestamp });
      }
    }
    Ok(())
  }
}
