use super::{Device, DeviceCommon};
use crate::command_bus::{CommandError, ExecutionContext};
use hearth_core::types::DeviceKind;

/// The heating appliance: warms the room while turned on, so cooling down
/// means switching it off.
pub struct Heater {
  common: DeviceCommon,
}

impl Heater {
  pub fn new() -> Self {
    Self {
      common: DeviceCommon::new(DeviceKind::Heating),
    }
  }
}

impl Default for Heater {
  fn default() -> Self {
    Self::new()
  }
}

impl Device for Heater {
  fn kind(&self) -> DeviceKind {
    DeviceKind::Heating
  }

  fn common(&self) -> &DeviceCommon {
    &self.common
  }

  fn can_start_cool_down(&self, context: &mut ExecutionContext) -> Result<bool, CommandError> {
    self.common.is_turned_on(context)
  }

  fn is_in_cooling_grace_period(
    &self,
    context: &mut ExecutionContext,
  ) -> Result<bool, CommandError> {
    Ok(!self.common.can_turn_off(context)?)
  }

  fn start_cool_down(&self, context: &mut ExecutionContext) -> Result<(), CommandError> {
    self.common.turn_off(context)
  }

  fn can_start_warm_up(&self, context: &mut ExecutionContext) -> Result<bool, CommandError> {
    self.common.is_turned_off(context)
  }

  fn is_in_warming_grace_period(
    &self,
    context: &mut ExecutionContext,
  ) -> Result<bool, CommandError> {
    Ok(!self.common.can_turn_on(context)?)
  }

  fn start_warm_up(&self, context: &mut ExecutionContext) -> Result<(), CommandError> {
    self.common.turn_on(context)
  }
}
