use super::{UiEvent, UiPublisher};
use crate::command_bus::commands::{ConfigurationPayload, InitializeDisplay, UpdateConfiguration};
use crate::command_bus::{BoxedCommand, CommandSender};
use futures::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tokio_util::sync::CancellationToken;

/// The UI fan-out worker: accepts websocket listeners, replays the current
/// snapshot to each newcomer, broadcasts every published event and feeds
/// inbound configuration payloads back into the command queue.
pub struct UiServer {
  port: u16,
  commands: CommandSender,
  publisher: UiPublisher,
  stop: CancellationToken,
}

impl UiServer {
  pub fn new(
    port: u16,
    commands: CommandSender,
    publisher: UiPublisher,
    stop: CancellationToken,
  ) -> Self {
    Self {
      port,
      commands,
      publisher,
      stop,
    }
  }

  pub async fn run(self) -> std::io::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", self.port)).await?;
    info!("UI fan-out listening on port {}", self.port);

    loop {
      tokio::select! {
        accepted = listener.accept() => match accepted {
          Ok((stream, peer)) => {
            debug!("New UI listener from {}", peer);
            let commands = self.commands.clone();
            let events = self.publisher.subscribe();
            let stop = self.stop.child_token();
            tokio::spawn(async move {
              if let Err(err) = run_listener_loop(stream, commands, events, stop).await {
                debug!("UI listener closed: {}", err);
              }
            });
          }
          Err(err) => warn!("UI listener accept failed: {}", err),
        },
        _ = self.stop.cancelled() => break,
      }
    }
    info!("UI fan-out stopped");
    Ok(())
  }
}

async fn run_listener_loop(
  stream: TcpStream,
  commands: CommandSender,
  mut events: broadcast::Receiver<UiEvent>,
  stop: CancellationToken,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
  let ws_stream = tokio_tungstenite::accept_async(stream).await?;
  let (mut sink, mut source) = ws_stream.split();

  // The snapshot travels through a dedicated channel so only this listener
  // sees it; broadcast events keep flowing to everyone meanwhile.
  let (snapshot_sender, mut snapshot) = mpsc::unbounded_channel();
  if commands
    .send(Box::new(InitializeDisplay::new(snapshot_sender)) as BoxedCommand)
    .is_err()
  {
    warn!("Command queue closed, cannot initialize display");
  }

  loop {
    tokio::select! {
      event = events.recv() => match event {
        Ok(event) => send_event(&mut sink, &event).await?,
        Err(broadcast::error::RecvError::Lagged(skipped)) => {
          warn!("UI listener lagged behind, {} events dropped", skipped);
        }
        Err(broadcast::error::RecvError::Closed) => break,
      },
      Some(event) = snapshot.recv() => send_event(&mut sink, &event).await?,
      message = source.next() => match message {
        Some(Ok(Message::Text(text))) => handle_listener_message(&commands, &text),
        Some(Ok(Message::Close(_))) | None => break,
        Some(Ok(_)) => continue,
        Some(Err(err)) => {
          debug!("UI listener socket error: {}", err);
          break;
        }
      },
      _ = stop.cancelled() => {
        let _ = sink.close().await;
        break;
      }
    }
  }
  Ok(())
}

async fn send_event(
  sink: &mut SplitSink<WebSocketStream<TcpStream>, Message>,
  event: &UiEvent,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
  let json = serde_json::to_string(event).expect("UI events always serialize");
  sink.send(Message::Text(json)).await
}

fn handle_listener_message(commands: &CommandSender, text: &str) {
  match serde_json::from_str::<ConfigurationPayload>(text) {
    Ok(payload) => {
      if commands
        .send(Box::new(UpdateConfiguration::new(payload)) as BoxedCommand)
        .is_err()
      {
        debug!("Command queue closed, dropping configuration update");
      }
    }
    Err(err) => warn!("Ignoring malformed configuration payload: {}", err),
  }
}
