use super::evaluate_device::FRESHNESS_WINDOW_MINUTES;
use super::RegulateTemperature;
use crate::command_bus::{Command, CommandError, ExecutionContext};
use chrono::Duration;
use hearth_core::types::SensorMeasure;
use hearth_storage::regulation;
use hearth_storage::repositories::sensor_measure;

/// Reacts to a newly arrived reading: every device this measure controls is
/// regulated against it, unless a sibling sensor currently reads colder.
///
/// The sibling check is the dual of the min-selection in EvaluateDevice: a
/// fresh reading only acts when it is the most constraining sample among
/// the sensors sharing the device.
pub struct EvaluateMeasure {
  measure: SensorMeasure,
}

impl EvaluateMeasure {
  pub fn new(measure: SensorMeasure) -> Self {
    Self { measure }
  }
}

impl Command for EvaluateMeasure {
  fn name(&self) -> &'static str {
    "EvaluateMeasure"
  }

  fn execute(&self, context: &mut ExecutionContext) -> Result<(), CommandError> {
    let now = context.clock.now();
    let regulations = regulation::get_regulation_for_measure(context.db, self.measure.kind, now)?;
    let max_age = now - Duration::minutes(FRESHNESS_WINDOW_MINUTES);

    for (device_kind, threshold) in regulations {
      let mut superseded = false;
      for (sibling_kind, _) in regulation::get_regulation_for_device(context.db, device_kind, now)? {
        if sibling_kind == self.measure.kind {
          continue;
        }
        if let Some(sample) = sensor_measure::latest(context.db, sibling_kind, Some(max_age))? {
          if sample.temperature < self.measure.temperature {
            superseded = true;
            break;
          }
        }
      }

      if superseded {
        debug!(
          "Measure {} does not drive {}: a sibling sensor reads colder",
          self.measure.kind, device_kind
        );
        continue;
      }

      context.enqueue(Box::new(RegulateTemperature::new(
        device_kind,
        self.measure.clone(),
        threshold,
      )));
    }
    Ok(())
  }
}
