use super::RegulateTemperature;
use crate::command_bus::{Command, CommandError, ExecutionContext};
use crate::devices::{device_for_kind, Device};
use chrono::Duration;
use hearth_core::types::{DeviceKind, SensorMeasure};
use hearth_storage::models::ThresholdTemperature;
use hearth_storage::regulation;
use hearth_storage::repositories::sensor_measure;

/// Window within which a sample is fresh enough to base a decision on.
pub(crate) const FRESHNESS_WINDOW_MINUTES: i64 = 10;

/// Re-evaluates one device against every measure configured to control it,
/// regulating against the coldest fresh reading.
///
/// The min-selection keeps two rooms from fighting over one appliance: as
/// long as any room is too cold the heater must not be disabled by another
/// room running warm, and the same pick serves cooling symmetrically.
pub struct EvaluateDevice {
  kind: DeviceKind,
}

impl EvaluateDevice {
  pub fn new(kind: DeviceKind) -> Self {
    Self { kind }
  }
}

impl Command for EvaluateDevice {
  fn name(&self) -> &'static str {
    "EvaluateDevice"
  }

  fn execute(&self, context: &mut ExecutionContext) -> Result<(), CommandError> {
    let regulations = regulation::get_regulation_for_device(context.db, self.kind, context.clock.now())?;

    if regulations.is_empty() {
      // Nothing regulates this device right now. Make sure it is off.
      let device = device_for_kind(self.kind);
      if device.is_turned_on(context)? {
        info!(
          "Device {} is ON, but it is unregulated - attempting TURN OFF",
          self.kind
        );
        if device.can_turn_off(context)? {
          device.turn_off(context)?;
          info!("Device {} TURNED OFF successfully", self.kind);
        } else {
          info!(
            "TURN OFF of device {} failed - device is in grace period",
            self.kind
          );
        }
      }
      return Ok(());
    }

    let max_age = context.clock.now() - Duration::minutes(FRESHNESS_WINDOW_MINUTES);
    let mut candidates: Vec<(SensorMeasure, ThresholdTemperature)> = Vec::new();
    for (measure_kind, threshold) in regulations {
      if let Some(measure) = sensor_measure::latest(context.db, measure_kind, Some(max_age))? {
        candidates.push((measure, threshold));
      }
    }

    let coldest = candidates.into_iter().reduce(|best, candidate| {
      if candidate.0.temperature < best.0.temperature {
        candidate
      } else {
        best
      }
    });
    if let Some((measure, threshold)) = coldest {
      context.enqueue(Box::new(RegulateTemperature::new(
        self.kind, measure, threshold,
      )));
    }
    Ok(())
  }
}
