use super::{BoxedCommand, CommandSender, OutboundSender};
use crate::ui::UiPublisher;
use diesel::SqliteConnection;
use hearth_core::config::LinkConfig;
use hearth_core::protocol::OutboundMessage;
use hearth_core::time::TimeSource;

/// Everything a command may touch while it executes: a store handle scoped
/// to the surrounding transaction, both queues, the UI publisher, the clock
/// and the radio link configuration.
pub struct ExecutionContext<'a> {
  pub db: &'a mut SqliteConnection,
  pub outbound: &'a OutboundSender,
  pub commands: &'a CommandSender,
  pub publisher: &'a UiPublisher,
  pub clock: &'a dyn TimeSource,
  pub link: &'a LinkConfig,
}

impl<'a> ExecutionContext<'a> {
  /// Enqueues a follow-up command. A closed queue means the process is
  /// shutting down, in which case the follow-up is moot.
  pub fn enqueue(&self, command: BoxedCommand) {
    let name = command.name();
    if self.commands.send(command).is_err() {
      debug!("Command queue closed, dropping follow-up {}", name);
    }
  }

  /// Enqueues a frame for the radio worker to transmit.
  pub fn send_frame(&self, message: OutboundMessage) {
    if self.outbound.send(message).is_err() {
      debug!("Outbound queue closed, dropping frame");
    }
  }
}
