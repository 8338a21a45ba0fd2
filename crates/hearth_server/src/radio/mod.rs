//! The radio link worker: owns the serial port, alternates between reading
//! one inbound frame and writing one outbound frame, and turns validated
//! frames into commands.

use crate::command_bus::commands::{
  EvaluateMeasure, RecordDeviceStatus, RespondNonceRequest, SaveMeasure, SavePing,
};
use crate::command_bus::{BoxedCommand, CommandSender, OutboundReceiver};
use byteorder::{ByteOrder, LittleEndian};
use diesel::prelude::*;
use hearth_core::config::LinkConfig;
use hearth_core::protocol::{InboundMessage, COMMAND_NONCE, COMMAND_REPORT, MESSAGE_START_MARKER};
use hearth_core::time::TimeSource;
use hearth_core::types::{DeviceKind, MeasureKind, SensorMeasure};
use hearth_storage::repositories::nonce;
use serialport::SerialPort;
use std::io::{ErrorKind, Read, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio_util::sync::CancellationToken;

/// How long one iteration waits for a frame to begin.
const START_MARKER_TIMEOUT: Duration = Duration::from_secs(1);

/// Once a frame has begun, how long we wait for its remaining bytes.
const FRAME_BODY_TIMEOUT: Duration = Duration::from_secs(5);

/// Checks an inbound message against the stored nonce for its sender and,
/// when accepted, advances that nonce. Runs in its own short transaction on
/// the radio worker's connection.
pub fn authenticate_inbound(
  conn: &mut SqliteConnection,
  message: &InboundMessage,
) -> QueryResult<bool> {
  conn.transaction(|conn| {
    let last_inbound = nonce::get_last_inbound_nonce(conn, message.from_address())?;
    if !message.is_valid(last_inbound) {
      return Ok(false);
    }
    nonce::register_inbound_nonce(conn, message.from_address(), message.nonce())?;
    Ok(true)
  })
}

enum ReadOutcome {
  Byte(u8),
  TimedOut,
  Failed,
}

/// Blocking worker thread around the half-duplex radio adapter. Reads and
/// writes alternate so a busy inbound stream cannot starve outbound sends
/// and vice versa; every error logs and the loop carries on.
pub struct RadioWorker {
  port: Box<dyn SerialPort>,
  db: SqliteConnection,
  commands: CommandSender,
  outbound: OutboundReceiver,
  clock: Arc<dyn TimeSource>,
  link: LinkConfig,
  stop: CancellationToken,
}

impl RadioWorker {
  pub fn new(
    port: Box<dyn SerialPort>,
    db: SqliteConnection,
    commands: CommandSender,
    outbound: OutboundReceiver,
    clock: Arc<dyn TimeSource>,
    link: LinkConfig,
    stop: CancellationToken,
  ) -> Self {
    Self {
      port,
      db,
      commands,
      outbound,
      clock,
      link,
      stop,
    }
  }

  /// Runs the worker loop until the stop signal is set. Meant to be spawned
  /// on a dedicated thread; the serial timeouts bound every iteration.
  pub fn run(mut self) {
    info!("Radio worker running");
    while !self.stop.is_cancelled() {
      if let Some(message) = self.receive_validated_message() {
        self.dispatch(&message);
      }

      match self.outbound.try_recv() {
        Ok(message) => {
          trace!(
            "Sending command {:#04x} to {:#04x}",
            message.command(),
            message.to_address()
          );
          if let Err(err) = self.port.write_all(&message.encode(self.link.secret())) {
            error!("Cannot write frame to serial port: {}", err);
          }
        }
        Err(TryRecvError::Empty) => {}
        Err(TryRecvError::Disconnected) => {
          debug!("Outbound queue closed, radio worker exiting");
          break;
        }
      }
    }
    info!("Radio worker stopped");
  }

  /// Reads one frame and runs the full validation chain: addressing,
  /// structure, authenticity and freshness. Anything that fails is logged
  /// and dropped.
  fn receive_validated_message(&mut self) -> Option<InboundMessage> {
    let message = self.read_frame()?;

    if message.to_address() != self.link.my_address() {
      info!(
        "Ignoring message from {:#04x} to {:#04x} (with {} bytes)",
        message.from_address(),
        message.to_address(),
        message.extended_bytes_length()
      );
      return None;
    }

    // A nonce request must get through even when the peer's counter is
    // lost, so it skips the replay check. It is still tag-checked.
    if message.command() == COMMAND_NONCE && message.is_valid(-1) {
      return Some(message);
    }

    match authenticate_inbound(&mut self.db, &message) {
      Ok(true) => Some(message),
      Ok(false) => {
        warn!(
          "Received message {:#04x} from {:#04x}, but it could not be authenticated",
          message.command(),
          message.from_address()
        );
        None
      }
      Err(err) => {
        error!("Nonce bookkeeping failed: {}", err);
        None
      }
    }
  }

  /// The inbound parser state machine: hunt for the start marker, read the
  /// length byte, read the body, decode.
  fn read_frame(&mut self) -> Option<InboundMessage> {
    if let Err(err) = self.port.set_timeout(START_MARKER_TIMEOUT) {
      error!("Cannot configure serial timeout: {}", err);
      return None;
    }
    loop {
      match self.read_byte() {
        ReadOutcome::Byte(MESSAGE_START_MARKER) => break,
        // Anything between frames is noise; keep hunting.
        ReadOutcome::Byte(_) => continue,
        ReadOutcome::TimedOut | ReadOutcome::Failed => return None,
      }
    }

    if let Err(err) = self.port.set_timeout(FRAME_BODY_TIMEOUT) {
      error!("Cannot configure serial timeout: {}", err);
      return None;
    }
    let size = match self.read_byte() {
      ReadOutcome::Byte(size) => size,
      ReadOutcome::TimedOut => {
        warn!("Message start received, but then timed out on waiting for message size");
        return None;
      }
      ReadOutcome::Failed => return None,
    };

    let mut body = vec![0u8; usize::from(size)];
    if let Err(err) = self.port.read_exact(&mut body) {
      warn!("Unable to read message of size {} from radio: {}", size, err);
      return None;
    }

    match InboundMessage::decode(&body, self.link.secret()) {
      Ok(message) => Some(message),
      Err(err) => {
        warn!("Dropping frame of size {}: {}", size, err);
        None
      }
    }
  }

  fn read_byte(&mut self) -> ReadOutcome {
    let mut buf = [0u8; 1];
    match self.port.read(&mut buf) {
      Ok(0) => ReadOutcome::TimedOut,
      Ok(_) => ReadOutcome::Byte(buf[0]),
      Err(err) if err.kind() == ErrorKind::TimedOut => ReadOutcome::TimedOut,
      Err(err) => {
        error!("Serial read failed: {}", err);
        ReadOutcome::Failed
      }
    }
  }

  /// Routes a validated message to the handler matching its sender and
  /// command; unknown combinations are dropped with a warning.
  fn dispatch(&self, message: &InboundMessage) {
    let handled = self.handle_nonce_request(message)
      || self.handle_device_ping(message)
      || self.handle_indoor_measure(message)
      || self.handle_outdoor_measure(message);

    if !handled {
      warn!(
        "Unrecognized message {:#04x} from {:#04x} (with {} bytes)",
        message.command(),
        message.from_address(),
        message.extended_bytes_length()
      );
    }
  }

  fn handle_nonce_request(&self, message: &InboundMessage) -> bool {
    if message.command() != COMMAND_NONCE {
      return false;
    }
    self.enqueue(Box::new(RespondNonceRequest::new(message.from_address())));
    true
  }

  fn handle_device_ping(&self, message: &InboundMessage) -> bool {
    let Some(kind) = DeviceKind::from_address(message.from_address()) else {
      return false;
    };
    if message.command() != COMMAND_REPORT {
      return false;
    }

    if message.extended_bytes_length() != 1 {
      warn!(
        "Ignoring message {:#04x} from {:#04x}: expected 1 byte, got {}",
        message.command(),
        message.from_address(),
        message.extended_bytes_length()
      );
      return true;
    }

    let is_working = message.extended_bytes()[0] != 0;
    self.enqueue(Box::new(RecordDeviceStatus::new(kind, is_working)));
    self.enqueue(Box::new(SavePing::new(kind, self.clock.now())));
    true
  }

  fn handle_indoor_measure(&self, message: &InboundMessage) -> bool {
    let Some(kind) = MeasureKind::from_address(message.from_address()) else {
      return false;
    };
    if !kind.is_indoor() || message.command() != COMMAND_REPORT {
      return false;
    }

    if message.extended_bytes_length() != 12 {
      warn!(
        "Ignoring message {:#04x} from {:#04x}: expected 12 bytes, got {}",
        message.command(),
        message.from_address(),
        message.extended_bytes_length()
      );
      return true;
    }

    let bytes = message.extended_bytes();
    let measure = SensorMeasure::new(
      self.clock.now(),
      kind,
      LittleEndian::read_f32(&bytes[0..4]),
      Some(LittleEndian::read_f32(&bytes[4..8])),
      Some(LittleEndian::read_f32(&bytes[8..12])),
    );
    self.enqueue(Box::new(SaveMeasure::new(measure.clone())));
    self.enqueue(Box::new(EvaluateMeasure::new(measure)));
    true
  }

  fn handle_outdoor_measure(&self, message: &InboundMessage) -> bool {
    if MeasureKind::from_address(message.from_address()) != Some(MeasureKind::Outdoor)
      || message.command() != COMMAND_REPORT
    {
      return false;
    }

    if message.extended_bytes_length() != 8 {
      warn!(
        "Ignoring message {:#04x} from {:#04x}: expected 8 bytes, got {}",
        message.command(),
        message.from_address(),
        message.extended_bytes_length()
      );
      return true;
    }

    let bytes = message.extended_bytes();
    let measure = SensorMeasure::new(
      self.clock.now(),
      MeasureKind::Outdoor,
      LittleEndian::read_f32(&bytes[0..4]),
      None,
      Some(LittleEndian::read_f32(&bytes[4..8])),
    );
    self.enqueue(Box::new(SaveMeasure::new(measure)));
    true
  }

  fn enqueue(&self, command: BoxedCommand) {
    let name = command.name();
    if self.commands.send(command).is_err() {
      debug!("Command queue closed, dropping {}", name);
    }
  }
}
