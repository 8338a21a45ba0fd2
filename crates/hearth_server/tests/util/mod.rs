//! Shared fixture for command tests: an in-memory store, channel-backed
//! queues, a capturing publisher and a pinned clock.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use diesel::SqliteConnection;
use hearth_core::config::LinkConfig;
use hearth_core::protocol::OutboundMessage;
use hearth_core::time::FixedTimeSource;
use hearth_core::types::{MeasureKind, SensorMeasure};
use hearth_server::command_bus::{
  Command, CommandReceiver, CommandSender, ExecutionContext, OutboundReceiver, OutboundSender,
};
use hearth_server::ui::{UiEvent, UiPublisher};
use tokio::sync::broadcast;
use tokio::sync::mpsc;

pub const SECRET: &[u8] = b"integration-test-secret";
pub const MY_ADDRESS: u8 = 0xA1;

/// Wednesday 2023-09-13, 11:35:15 - weekday day mode.
pub fn now() -> NaiveDateTime {
  NaiveDate::from_ymd_opt(2023, 9, 13)
    .expect("valid date")
    .and_hms_opt(11, 35, 15)
    .expect("valid time")
}

pub fn measure_at(kind: MeasureKind, timestamp: NaiveDateTime, temperature: f32) -> SensorMeasure {
  SensorMeasure::new(timestamp, kind, temperature, Some(47.5), Some(2.96))
}

pub struct Harness {
  pub db: SqliteConnection,
  pub clock: FixedTimeSource,
  pub link: LinkConfig,
  pub command_sender: CommandSender,
  pub command_receiver: CommandReceiver,
  pub outbound_sender: OutboundSender,
  pub outbound_receiver: OutboundReceiver,
  pub publisher: UiPublisher,
  pub event_receiver: broadcast::Receiver<UiEvent>,
}

impl Harness {
  pub fn new() -> Self {
    let (command_sender, command_receiver) = mpsc::unbounded_channel();
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel();
    let publisher = UiPublisher::default();
    let event_receiver = publisher.subscribe();
    Self {
      db: hearth_storage::establish(":memory:").expect("in-memory store"),
      clock: FixedTimeSource::new(now()),
      link: LinkConfig::new(MY_ADDRESS, SECRET).expect("valid link config"),
      command_sender,
      command_receiver,
      outbound_sender,
      outbound_receiver,
      publisher,
      event_receiver,
    }
  }

  pub fn execute(&mut self, command: &dyn Command) {
    command
      .execute(&mut ExecutionContext {
        db: &mut self.db,
        outbound: &self.outbound_sender,
        commands: &self.command_sender,
        publisher: &self.publisher,
        clock: &self.clock,
        link: &self.link,
      })
      .expect("command executes");
  }

  /// Executes a command, then every follow-up it (transitively) enqueued,
  /// the way the executor would drain the queue.
  pub fn execute_with_followups(&mut self, command: &dyn Command) {
    self.execute(command);
    while let Ok(next) = self.command_receiver.try_recv() {
      self.execute(next.as_ref());
    }
  }

  /// Names of the commands currently waiting on the queue, without
  /// executing them.
  pub fn queued_command_names(&mut self) -> Vec<&'static str> {
    let mut names = Vec::new();
    while let Ok(command) = self.command_receiver.try_recv() {
      names.push(command.name());
    }
    names
  }

  pub fn sent_frames(&mut self) -> Vec<OutboundMessage> {
    let mut frames = Vec::new();
    while let Ok(frame) = self.outbound_receiver.try_recv() {
      frames.push(frame);
    }
    frames
  }

  pub fn published_events(&mut self) -> Vec<UiEvent> {
    let mut events = Vec::new();
    while let Ok(event) = self.event_receiver.try_recv() {
      events.push(event);
    }
    events
  }
}
