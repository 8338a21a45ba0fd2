use super::{authentication_tag, unstuff, MAC_LENGTH, MIN_MESSAGE_LENGTH};
use crate::errors::HearthProtocolError;
use byteorder::{ByteOrder, LittleEndian};
use getset::{CopyGetters, Getters};

/// An incoming radio message, decoded from the stuffed frame body.
///
/// Decoding only establishes structure; authenticity and freshness are
/// checked through [InboundMessage::is_valid] against the stored inbound
/// nonce for the sending peer.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct InboundMessage {
  #[getset(get_copy = "pub")]
  nonce: u32,
  #[getset(get_copy = "pub")]
  from_address: u8,
  #[getset(get_copy = "pub")]
  to_address: u8,
  #[getset(get_copy = "pub")]
  command: u8,
  #[getset(get = "pub")]
  extended_bytes: Vec<u8>,
  tag_valid: bool,
}

impl InboundMessage {
  /// Destuffs and splits a frame body. Fails on truncated stuffing or on a
  /// payload too short to carry the fixed fields.
  pub fn decode(data: &[u8], secret: &[u8]) -> Result<Self, HearthProtocolError> {
    let payload = unstuff(data)?;
    if payload.len() < MIN_MESSAGE_LENGTH {
      return Err(HearthProtocolError::TruncatedMessage(
        payload.len(),
        MIN_MESSAGE_LENGTH,
      ));
    }

    let tag = authentication_tag(secret, &payload[MAC_LENGTH..]);
    let tag_valid = tag[..] == payload[..MAC_LENGTH];

    Ok(Self {
      nonce: LittleEndian::read_u32(&payload[MAC_LENGTH..MAC_LENGTH + 4]),
      from_address: payload[MAC_LENGTH + 4],
      to_address: payload[MAC_LENGTH + 5],
      command: payload[MAC_LENGTH + 6],
      extended_bytes: payload[MIN_MESSAGE_LENGTH..].to_vec(),
      tag_valid,
    })
  }

  /// Confirms the message is authentic and has not been replayed: the nonce
  /// must be strictly greater than the last one accepted from this peer.
  /// Pass `-1` as the reference to skip the replay check (nonce bootstrap).
  pub fn is_valid(&self, last_inbound_nonce: i64) -> bool {
    self.tag_valid && i64::from(self.nonce) > last_inbound_nonce
  }

  pub fn extended_bytes_length(&self) -> usize {
    self.extended_bytes.len()
  }
}
