//! The heating/cooling device abstraction. The two implementations differ
//! only in their thermal sign: a heater warms the room by turning on and an
//! air conditioner warms it by turning off.

mod air_conditioner;
mod common;
mod heater;

pub use air_conditioner::AirConditioner;
pub use common::DeviceCommon;
pub use heater::Heater;

use crate::command_bus::{CommandError, ExecutionContext};
use hearth_core::types::DeviceKind;

/// A temperature-controlling appliance reachable over the radio link.
///
/// Availability and grace-period bookkeeping is shared; the polymorphic
/// surface maps the thermal directions (cool down / warm up) onto power
/// transitions.
pub trait Device {
  fn kind(&self) -> DeviceKind;

  fn common(&self) -> &DeviceCommon;

  /// Whether the device pinged us within the liveness window.
  fn is_available(&self, context: &mut ExecutionContext) -> Result<bool, CommandError> {
    self.common().is_available(context)
  }

  fn is_turned_on(&self, context: &mut ExecutionContext) -> Result<bool, CommandError> {
    self.common().is_turned_on(context)
  }

  fn is_turned_off(&self, context: &mut ExecutionContext) -> Result<bool, CommandError> {
    self.common().is_turned_off(context)
  }

  fn can_turn_on(&self, context: &mut ExecutionContext) -> Result<bool, CommandError> {
    self.common().can_turn_on(context)
  }

  fn can_turn_off(&self, context: &mut ExecutionContext) -> Result<bool, CommandError> {
    self.common().can_turn_off(context)
  }

  /// De-asserts our local belief about an unreachable device: if the last
  /// recorded status is missing or on, write an off transition so the
  /// engine re-evaluates cleanly when the device returns.
  fn assume_off_status(&self, context: &mut ExecutionContext) -> Result<(), CommandError> {
    self.common().assume_off_status(context)
  }

  fn turn_on(&self, context: &mut ExecutionContext) -> Result<(), CommandError> {
    self.common().turn_on(context)
  }

  fn turn_off(&self, context: &mut ExecutionContext) -> Result<(), CommandError> {
    self.common().turn_off(context)
  }

  /// Whether the device is in a state from which it can start cooling the
  /// room down (by turning on or off, depending on its thermal sign).
  fn can_start_cool_down(&self, context: &mut ExecutionContext) -> Result<bool, CommandError>;

  /// Whether a recent transition blocks the cool-down direction.
  fn is_in_cooling_grace_period(&self, context: &mut ExecutionContext)
    -> Result<bool, CommandError>;

  fn start_cool_down(&self, context: &mut ExecutionContext) -> Result<(), CommandError>;

  /// Whether the device is in a state from which it can start warming the
  /// room up.
  fn can_start_warm_up(&self, context: &mut ExecutionContext) -> Result<bool, CommandError>;

  /// Whether a recent transition blocks the warm-up direction.
  fn is_in_warming_grace_period(&self, context: &mut ExecutionContext)
    -> Result<bool, CommandError>;

  fn start_warm_up(&self, context: &mut ExecutionContext) -> Result<(), CommandError>;
}

/// Returns the device implementation for the given kind.
pub fn device_for_kind(kind: DeviceKind) -> Box<dyn Device> {
  match kind {
    DeviceKind::Cooling => Box::new(AirConditioner::new()),
    DeviceKind::Heating => Box::new(Heater::new()),
  }
}
