use super::EvaluateDevice;
use crate::command_bus::{Command, CommandError, ExecutionContext};
use crate::devices::{device_for_kind, Device};
use crate::ui::UiEvent;
use chrono::NaiveDateTime;
use hearth_core::types::DeviceKind;
use hearth_storage::repositories::device_ping;

/// Persists a liveness ping. A ping that ends an offline stretch triggers an
/// immediate re-evaluation so the device catches up with the room.
pub struct SavePing {
  kind: DeviceKind,
  timestamp: NaiveDateTime,
}

impl SavePing {
  pub fn new(kind: DeviceKind, timestamp: NaiveDateTime) -> Self {
    Self { kind, timestamp }
  }
}

impl Command for SavePing {
  fn name(&self) -> &'static str {
    "SavePing"
  }

  fn execute(&self, context: &mut ExecutionContext) -> Result<(), CommandError> {
    debug!("Saving ping from {}", self.kind);

    let device = device_for_kind(self.kind);
    let was_previously_online = device.is_available(context)?;

    device_ping::insert(context.db, self.kind, self.timestamp)?;
    context.publisher.publish(UiEvent::DevicePingReceived {
      kind: self.kind,
      timestamp: self.timestamp,
    });

    if !was_previously_online {
      info!("Device {} came back online, re-evaluating", self.kind);
      context.enqueue(Box::new(EvaluateDevice::new(self.kind)));
    }
    Ok(())
  }
}
