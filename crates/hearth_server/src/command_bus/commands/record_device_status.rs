use crate::command_bus::{Command, CommandError, ExecutionContext};
use crate::ui::UiEvent;
use hearth_core::types::{DeviceKind, PowerStatus};
use hearth_storage::repositories::device_status;

/// Reconciles our status log with what the device itself reports: the
/// appliance is the authority on whether it is actually running.
pub struct RecordDeviceStatus {
  kind: DeviceKind,
  is_working: bool,
}

impl RecordDeviceStatus {
  pub fn new(kind: DeviceKind, is_working: bool) -> Self {
    Self { kind, is_working }
  }
}

impl Command for RecordDeviceStatus {
  fn name(&self) -> &'static str {
    "RecordDeviceStatus"
  }

  fn execute(&self, context: &mut ExecutionContext) -> Result<(), CommandError> {
    let current = device_status::current_status(context.db, self.kind)?
      .unwrap_or(PowerStatus::TurnedOff);

    if self.is_working == current.is_on() {
      return Ok(());
    }

    info!(
      "Device {} was expected to be {}, but it is {}. Overthrowing status.",
      self.kind,
      if current.is_on() { "on" } else { "off" },
      if self.is_working { "on" } else { "off" }
    );
    let status = if self.is_working {
      PowerStatus::TurnedOn
    } else {
      PowerStatus::TurnedOff
    };
    device_status::set_current_status(context.db, self.kind, status, context.clock.now())?;
    context.publisher.publish(UiEvent::DeviceStatusUpdate {
      kind: self.kind,
      is_working: self.is_working,
    });
    Ok(())
  }
}
