use super::{authentication_tag, stuff, MAX_EXTENDED_BYTES, MESSAGE_START_MARKER};
use byteorder::{ByteOrder, LittleEndian};
use getset::{CopyGetters, Getters};

/// A message queued for transmission. Fields stay logical until the radio
/// worker calls [OutboundMessage::encode] right before the serial write.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct OutboundMessage {
  #[getset(get_copy = "pub")]
  from_address: u8,
  #[getset(get_copy = "pub")]
  to_address: u8,
  #[getset(get_copy = "pub")]
  command: u8,
  #[getset(get_copy = "pub")]
  nonce: u32,
  #[getset(get = "pub")]
  extended_bytes: Vec<u8>,
}

impl OutboundMessage {
  /// Builds a message. Extended bytes past [MAX_EXTENDED_BYTES] are dropped
  /// here: no command in the system comes close to the cap, and truncation
  /// beats fragmenting a frame the peers could not reassemble.
  pub fn new(
    from_address: u8,
    to_address: u8,
    command: u8,
    nonce: u32,
    extended_bytes: &[u8],
  ) -> Self {
    let mut extended_bytes = extended_bytes.to_vec();
    extended_bytes.truncate(MAX_EXTENDED_BYTES);
    Self {
      from_address,
      to_address,
      command,
      nonce,
      extended_bytes,
    }
  }

  /// Produces the full wire frame: start marker, stuffed length, stuffed
  /// payload with the authentication tag over everything past itself.
  pub fn encode(&self, secret: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(7 + self.extended_bytes.len());
    let mut nonce_bytes = [0u8; 4];
    LittleEndian::write_u32(&mut nonce_bytes, self.nonce);
    payload.extend_from_slice(&nonce_bytes);
    payload.push(self.from_address);
    payload.push(self.to_address);
    payload.push(self.command);
    payload.extend_from_slice(&self.extended_bytes);

    let tag = authentication_tag(secret, &payload);
    let mut logical = Vec::with_capacity(tag.len() + payload.len());
    logical.extend_from_slice(&tag);
    logical.extend_from_slice(&payload);

    let stuffed = stuff(&logical);
    let mut frame = Vec::with_capacity(stuffed.len() + 2);
    frame.push(MESSAGE_START_MARKER);
    frame.push(stuffed.len() as u8);
    frame.extend_from_slice(&stuffed);
    frame
  }
}
