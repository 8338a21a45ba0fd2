//! The command bus: typed commands flowing through an unbounded queue into
//! a single executor that runs each one inside its own store transaction.

pub mod commands;
mod context;
mod executor;

pub use context::ExecutionContext;
pub use executor::CommandExecutor;

use displaydoc::Display;
use hearth_core::protocol::OutboundMessage;
use hearth_core::types::DeviceKind;
use thiserror::Error;
use tokio::sync::mpsc;

/// A unit of work on the command queue. Commands read and write the store
/// through the execution context and may enqueue follow-up commands,
/// outbound frames and UI events.
pub trait Command: Send {
  fn name(&self) -> &'static str;
  fn execute(&self, context: &mut ExecutionContext) -> Result<(), CommandError>;
}

pub type BoxedCommand = Box<dyn Command>;
pub type CommandSender = mpsc::UnboundedSender<BoxedCommand>;
pub type CommandReceiver = mpsc::UnboundedReceiver<BoxedCommand>;
pub type OutboundSender = mpsc::UnboundedSender<OutboundMessage>;
pub type OutboundReceiver = mpsc::UnboundedReceiver<OutboundMessage>;

#[derive(Debug, Error, Display)]
pub enum CommandError {
  /// Store operation failed: {0}
  Storage(#[from] diesel::result::Error),
  /// Device {0} cannot switch while unavailable or inside its grace period
  ForbiddenTransition(DeviceKind),
}
