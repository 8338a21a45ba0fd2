use crate::command_bus::{Command, CommandError, ExecutionContext};
use crate::ui::UiEvent;
use hearth_core::types::SensorMeasure;
use hearth_storage::repositories::sensor_measure;

/// Persists a received sensor measure and pushes it to the dashboards.
pub struct SaveMeasure {
  measure: SensorMeasure,
}

impl SaveMeasure {
  pub fn new(measure: SensorMeasure) -> Self {
    Self { measure }
  }
}

impl Command for SaveMeasure {
  fn name(&self) -> &'static str {
    "SaveMeasure"
  }

  fn execute(&self, context: &mut ExecutionContext) -> Result<(), CommandError> {
    debug!(
      "Saving measure kind: {}, t: {:.2}, h: {:.2}, v: {:.2}",
      self.measure.kind,
      self.measure.temperature,
      self.measure.humidity.unwrap_or(0.0),
      self.measure.voltage.unwrap_or(0.0)
    );

    sensor_measure::insert(context.db, &self.measure)?;

    context.publisher.publish(UiEvent::TemperatureUpdate {
      timestamp: self.measure.timestamp,
      kind: self.measure.kind,
      temperature: self.measure.temperature,
    });
    if let Some(humidity) = self.measure.humidity {
      context.publisher.publish(UiEvent::HumidityUpdate {
        timestamp: self.measure.timestamp,
        kind: self.measure.kind,
        humidity,
      });
    }
    Ok(())
  }
}
