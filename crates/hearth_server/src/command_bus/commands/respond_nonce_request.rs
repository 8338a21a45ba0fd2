use crate::command_bus::{Command, CommandError, ExecutionContext};
use byteorder::{ByteOrder, LittleEndian};
use hearth_core::protocol::{OutboundMessage, COMMAND_NONCE};
use hearth_storage::repositories::{nonce, nonce_audit};

/// Answers a peer that lost its counters: we send back our view of its last
/// inbound nonce so it can rebase its outbound counter, and log the
/// exchange for auditing.
pub struct RespondNonceRequest {
  respond_to: u8,
}

impl RespondNonceRequest {
  pub fn new(respond_to: u8) -> Self {
    Self { respond_to }
  }
}

impl Command for RespondNonceRequest {
  fn name(&self) -> &'static str {
    "RespondNonceRequest"
  }

  fn execute(&self, context: &mut ExecutionContext) -> Result<(), CommandError> {
    let outbound_nonce = nonce::next_outbound_nonce(context.db, self.respond_to)?;
    let last_inbound_nonce = nonce::get_last_inbound_nonce(context.db, self.respond_to)?;

    info!(
      "Responding to nonce request from {:#x} with inbound: {}, outbound: {}",
      self.respond_to, last_inbound_nonce, outbound_nonce
    );

    let mut last_inbound_bytes = [0u8; 4];
    LittleEndian::write_u32(&mut last_inbound_bytes, last_inbound_nonce as u32);
    context.send_frame(OutboundMessage::new(
      context.link.my_address(),
      self.respond_to,
      COMMAND_NONCE,
      outbound_nonce,
      &last_inbound_bytes,
    ));

    nonce_audit::register(
      context.db,
      self.respond_to,
      context.clock.now(),
      last_inbound_nonce,
      outbound_nonce,
    )?;
    Ok(())
  }
}
