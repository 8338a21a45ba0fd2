use crate::command_bus::{CommandError, ExecutionContext};
use crate::ui::UiEvent;
use chrono::Duration;
use hearth_core::protocol::OutboundMessage;
use hearth_core::types::{DeviceKind, PowerStatus};
use hearth_storage::repositories::{device_ping, device_status, nonce};

/// State checks and transition bookkeeping shared by every device kind.
pub struct DeviceCommon {
  kind: DeviceKind,
}

impl DeviceCommon {
  /// After this long without a ping the remote unit counts as offline.
  pub const MAX_INTERVAL_WITHOUT_PING: i64 = 180;

  /// Minimum seconds between a turn-off and the next turn-on (and vice
  /// versa), to keep compressors and relays from short-cycling.
  pub const MIN_GRACE_PERIOD: i64 = 300;

  pub fn new(kind: DeviceKind) -> Self {
    Self { kind }
  }

  pub fn is_available(&self, context: &mut ExecutionContext) -> Result<bool, CommandError> {
    let Some(last_ping) = device_ping::last_ping(context.db, self.kind)? else {
      return Ok(false);
    };
    let age = context.clock.now() - last_ping;
    Ok(age < Duration::seconds(Self::MAX_INTERVAL_WITHOUT_PING))
  }

  pub fn is_turned_on(&self, context: &mut ExecutionContext) -> Result<bool, CommandError> {
    let status = device_status::current_status(context.db, self.kind)?;
    Ok(status == Some(PowerStatus::TurnedOn))
  }

  pub fn is_turned_off(&self, context: &mut ExecutionContext) -> Result<bool, CommandError> {
    Ok(!self.is_turned_on(context)?)
  }

  pub fn can_turn_on(&self, context: &mut ExecutionContext) -> Result<bool, CommandError> {
    if !self.is_available(context)? {
      return Ok(false);
    }
    self.past_grace_since_transition_to(context, PowerStatus::TurnedOff)
  }

  pub fn can_turn_off(&self, context: &mut ExecutionContext) -> Result<bool, CommandError> {
    if !self.is_available(context)? {
      return Ok(false);
    }
    self.past_grace_since_transition_to(context, PowerStatus::TurnedOn)
  }

  fn past_grace_since_transition_to(
    &self,
    context: &mut ExecutionContext,
    status: PowerStatus,
  ) -> Result<bool, CommandError> {
    let Some(transitioned_at) = device_status::last_transition_to(context.db, self.kind, status)?
    else {
      return Ok(true);
    };
    let age = context.clock.now() - transitioned_at;
    Ok(age > Duration::seconds(Self::MIN_GRACE_PERIOD))
  }

  pub fn assume_off_status(&self, context: &mut ExecutionContext) -> Result<(), CommandError> {
    let status = device_status::current_status(context.db, self.kind)?;
    if status.is_none() || status == Some(PowerStatus::TurnedOn) {
      warn!("Assumed off status for unreachable device {}", self.kind);
      device_status::set_current_status(
        context.db,
        self.kind,
        PowerStatus::TurnedOff,
        context.clock.now(),
      )?;
      context.publisher.publish(UiEvent::DeviceStatusUpdate {
        kind: self.kind,
        is_working: false,
      });
    }
    Ok(())
  }

  pub fn turn_on(&self, context: &mut ExecutionContext) -> Result<(), CommandError> {
    if !self.can_turn_on(context)? {
      return Err(CommandError::ForbiddenTransition(self.kind));
    }
    self.register_transition(context, PowerStatus::TurnedOn)?;
    self.send_power_command(context, hearth_core::protocol::COMMAND_TURN_ON)
  }

  pub fn turn_off(&self, context: &mut ExecutionContext) -> Result<(), CommandError> {
    if !self.can_turn_off(context)? {
      return Err(CommandError::ForbiddenTransition(self.kind));
    }
    self.register_transition(context, PowerStatus::TurnedOff)?;
    self.send_power_command(context, hearth_core::protocol::COMMAND_TURN_OFF)
  }

  fn register_transition(
    &self,
    context: &mut ExecutionContext,
    status: PowerStatus,
  ) -> Result<(), CommandError> {
    device_status::set_current_status(context.db, self.kind, status, context.clock.now())?;
    context.publisher.publish(UiEvent::DeviceStatusUpdate {
      kind: self.kind,
      is_working: status.is_on(),
    });
    Ok(())
  }

  /// Emits the power command twice, each copy under its own nonce. The
  /// half-duplex link drops frames without acknowledgment; two
  /// independently valid frames make the loss window negligible.
  fn send_power_command(
    &self,
    context: &mut ExecutionContext,
    command: u8,
  ) -> Result<(), CommandError> {
    for _ in 0..2 {
      let nonce = nonce::next_outbound_nonce(context.db, self.kind.address())?;
      context.send_frame(OutboundMessage::new(
        context.link.my_address(),
        self.kind.address(),
        command,
        nonce,
        &[],
      ));
    }
    Ok(())
  }
}
