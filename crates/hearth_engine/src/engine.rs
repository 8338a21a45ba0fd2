use crate::error::HearthEngineError;
use crate::options::EngineOptions;
use hearth_core::config::LinkConfig;
use hearth_core::protocol::OutboundMessage;
use hearth_core::time::{SystemTimeSource, TimeSource};
use hearth_server::command_bus::{BoxedCommand, CommandExecutor};
use hearth_server::radio::RadioWorker;
use hearth_server::ui::{UiPublisher, UiServer};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Wires the three workers to their queues and the store, runs them until
/// stopped, then joins them.
///
/// The radio worker and the command executor are OS threads (both block on
/// I/O); the UI fan-out runs on the async runtime. They share one stop
/// token, one command queue, one outbound queue and one UI broadcast
/// channel.
#[derive(Default)]
pub struct HearthEngine {
  stop_token: CancellationToken,
}

impl HearthEngine {
  pub async fn run(&self, options: &EngineOptions) -> Result<(), HearthEngineError> {
    let secret = hex::decode(options.link_secret_hex())
      .map_err(|err| HearthEngineError::InvalidOptions(format!("link secret: {}", err)))?;
    let link = LinkConfig::new(options.my_address(), &secret)?;
    let clock: Arc<dyn TimeSource> = Arc::new(SystemTimeSource);

    // Opening the store or the serial port is the only fatal failure mode;
    // everything after this point logs and carries on.
    let executor_db = hearth_storage::establish(options.database_path())?;
    let radio_db = hearth_storage::establish(options.database_path())?;
    info!("Store ready at {}", options.database_path());

    let port = serialport::new(options.serial_device(), options.serial_baud_rate())
      .timeout(Duration::from_secs(1))
      .open()?;
    info!(
      "Radio adapter ready at {} ({} baud)",
      options.serial_device(),
      options.serial_baud_rate()
    );

    let (command_sender, command_receiver) = mpsc::unbounded_channel::<BoxedCommand>();
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<OutboundMessage>();
    let publisher = UiPublisher::default();

    let radio = RadioWorker::new(
      port,
      radio_db,
      command_sender.clone(),
      outbound_receiver,
      clock.clone(),
      link.clone(),
      self.stop_token.child_token(),
    );
    let radio_thread = thread::Builder::new()
      .name("Hearth Radio Worker".to_owned())
      .spawn(move || radio.run())
      .expect("Thread creation should always succeed");

    let executor = CommandExecutor::new(
      executor_db,
      command_receiver,
      command_sender.downgrade(),
      outbound_sender,
      publisher.clone(),
      clock,
      link,
      self.stop_token.child_token(),
    );
    let executor_thread = thread::Builder::new()
      .name("Hearth Command Executor".to_owned())
      .spawn(move || executor.run())
      .expect("Thread creation should always succeed");

    let ui_server = UiServer::new(
      options.ui_port(),
      command_sender,
      publisher,
      self.stop_token.child_token(),
    );
    // The UI worker holds the last strong command sender besides the radio
    // worker; once both stop, the queue closes and the executor drains out.
    let ui_result = ui_server.run().await;

    self.stop_token.cancel();
    if radio_thread.join().is_err() {
      error!("Radio worker panicked");
    }
    if executor_thread.join().is_err() {
      error!("Command executor panicked");
    }
    ui_result?;
    Ok(())
  }

  pub fn stop(&self) {
    info!("Engine stop called, cancelling token.");
    self.stop_token.cancel();
  }
}
