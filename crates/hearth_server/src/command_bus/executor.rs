use super::{CommandReceiver, ExecutionContext, OutboundSender};
use crate::ui::UiPublisher;
use diesel::{Connection, SqliteConnection};
use hearth_core::config::LinkConfig;
use hearth_core::time::TimeSource;
use std::sync::Arc;
use tokio::sync::mpsc::WeakUnboundedSender;
use tokio_util::sync::CancellationToken;

use super::BoxedCommand;

/// Single consumer of the command queue. Runs on its own OS thread because
/// every command does synchronous store work.
///
/// Each command executes inside a fresh transaction: commit on success,
/// rollback plus an error log on failure, then on to the next command.
/// Failed commands are not retried; the next inbound event drives another
/// attempt.
pub struct CommandExecutor {
  db: SqliteConnection,
  commands: CommandReceiver,
  // Weak so the queue closes once the radio and UI workers drop theirs;
  // commands get a live sender for follow-up enqueues during execution.
  command_sender: WeakUnboundedSender<BoxedCommand>,
  outbound: OutboundSender,
  publisher: UiPublisher,
  clock: Arc<dyn TimeSource>,
  link: LinkConfig,
  stop: CancellationToken,
}

impl CommandExecutor {
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    db: SqliteConnection,
    commands: CommandReceiver,
    command_sender: WeakUnboundedSender<BoxedCommand>,
    outbound: OutboundSender,
    publisher: UiPublisher,
    clock: Arc<dyn TimeSource>,
    link: LinkConfig,
    stop: CancellationToken,
  ) -> Self {
    Self {
      db,
      commands,
      command_sender,
      outbound,
      publisher,
      clock,
      link,
      stop,
    }
  }

  /// Runs the executor loop until the queue closes or the stop signal is
  /// set. Meant to be spawned on a dedicated thread.
  pub fn run(mut self) {
    info!("Command executor running");
    while !self.stop.is_cancelled() {
      let Some(command) = self.commands.blocking_recv() else {
        debug!("Command queue closed, executor exiting");
        break;
      };
      let Some(sender) = self.command_sender.upgrade() else {
        debug!("All command producers gone, executor exiting");
        break;
      };

      trace!("Executing command {}", command.name());
      let result = self.db.transaction(|conn| {
        command.execute(&mut ExecutionContext {
          db: conn,
          outbound: &self.outbound,
          commands: &sender,
          publisher: &self.publisher,
          clock: self.clock.as_ref(),
          link: &self.link,
        })
      });
      if let Err(err) = result {
        error!("Command {} failed, rolled back: {}", command.name(), err);
      }
    }
    info!("Command executor stopped");
  }
}
