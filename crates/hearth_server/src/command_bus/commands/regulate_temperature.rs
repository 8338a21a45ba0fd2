use crate::command_bus::{Command, CommandError, ExecutionContext};
use crate::devices::{device_for_kind, Device};
use chrono::Duration;
use hearth_core::types::{DeviceKind, SensorMeasure};
use hearth_storage::models::ThresholdTemperature;
use hearth_storage::repositories::sensor_measure;

/// Given one (device, measure, threshold) triple, decides whether the
/// device must change state and acts on it.
///
/// Beyond the band edges there is an early-shutoff path: a device that has
/// been running a sustained stretch without pushing the room past the
/// mid-band power-save mark gets switched off, trading the unreachable half
/// of the band for power.
pub struct RegulateTemperature {
  device_kind: DeviceKind,
  measure: SensorMeasure,
  threshold: ThresholdTemperature,
}

impl RegulateTemperature {
  /// How long the room must coast on the far side of the power-save mark
  /// before the early shutoff fires.
  const POWER_SAVE_DELTA_MINUTES: i64 = 15;

  pub fn new(
    device_kind: DeviceKind,
    measure: SensorMeasure,
    threshold: ThresholdTemperature,
  ) -> Self {
    Self {
      device_kind,
      measure,
      threshold,
    }
  }

  /// The room needs cooling: the reading overshot the cool-down edge, or a
  /// running device has not managed to pull the room below the power-save
  /// mark for the whole window.
  fn should_cool_down(
    &self,
    context: &mut ExecutionContext,
    device: &dyn Device,
  ) -> Result<bool, CommandError> {
    if self.measure.temperature > self.threshold.cool_down_threshold() {
      return Ok(true);
    }

    let power_save = self.threshold.power_save_threshold();
    if device.is_turned_on(context)? && self.measure.temperature < power_save {
      let since = context.clock.now() - Duration::minutes(Self::POWER_SAVE_DELTA_MINUTES);
      let pushed_past =
        sensor_measure::latest_above_since(context.db, self.measure.kind, power_save, since)?;
      return Ok(pushed_past.is_none());
    }
    Ok(false)
  }

  /// The mirror of [Self::should_cool_down].
  fn should_warm_up(
    &self,
    context: &mut ExecutionContext,
    device: &dyn Device,
  ) -> Result<bool, CommandError> {
    if self.measure.temperature < self.threshold.warm_up_threshold() {
      return Ok(true);
    }

    let power_save = self.threshold.power_save_threshold();
    if device.is_turned_on(context)? && self.measure.temperature > power_save {
      let since = context.clock.now() - Duration::minutes(Self::POWER_SAVE_DELTA_MINUTES);
      let pushed_past =
        sensor_measure::latest_below_since(context.db, self.measure.kind, power_save, since)?;
      return Ok(pushed_past.is_none());
    }
    Ok(false)
  }
}

impl Command for RegulateTemperature {
  fn name(&self) -> &'static str {
    "RegulateTemperature"
  }

  fn execute(&self, context: &mut ExecutionContext) -> Result<(), CommandError> {
    let device = device_for_kind(self.device_kind);

    if !device.is_available(context)? {
      debug!(
        "Skipped evaluation of {} against {} because device is offline",
        self.device_kind, self.measure.kind
      );
      device.assume_off_status(context)?;
      return Ok(());
    }

    debug!(
      "Evaluating device {} against {}, current t: {:.2}, target t: {:.2}",
      self.device_kind,
      self.measure.kind,
      self.measure.temperature,
      self.threshold.temperature()
    );

    if self.should_cool_down(context, device.as_ref())?
      && device.can_start_cool_down(context)?
    {
      if device.is_in_cooling_grace_period(context)? {
        info!(
          "Device {} should be cooling down, but it is in the cooling grace period",
          self.device_kind
        );
        return Ok(());
      }
      device.start_cool_down(context)?;
      info!("Device {} started COOLING DOWN", self.device_kind);
    }

    if self.should_warm_up(context, device.as_ref())? && device.can_start_warm_up(context)? {
      if device.is_in_warming_grace_period(context)? {
        info!(
          "Device {} should be warming up, but it is in the warming grace period",
          self.device_kind
        );
        return Ok(());
      }
      device.start_warm_up(context)?;
      info!("Device {} started WARMING UP", self.device_kind);
    }

    Ok(())
  }
}
