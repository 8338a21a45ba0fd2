//! The radio wire protocol: byte-stuffed framing and authenticated,
//! replay-protected messages.
//!
//! Every frame on the wire is `START (0xFF)`, one length byte, then the
//! stuffed payload. Stuffing splits every byte with the high bit set across
//! two low-half bytes, so the start marker can never occur inside a frame
//! and receivers can resynchronize on it. The logical payload carries a
//! 16-byte keyed BLAKE2s tag over everything that follows it, a 32-bit
//! monotonic nonce, source and destination addresses, a command byte and
//! optional command-specific bytes.

mod inbound;
mod outbound;

pub use inbound::InboundMessage;
pub use outbound::OutboundMessage;

use crate::errors::HearthProtocolError;
use blake2::{
  digest::{consts::U16, Mac},
  Blake2sMac,
};

/// Marks the beginning of every frame; stuffing guarantees it never occurs
/// inside one.
pub const MESSAGE_START_MARKER: u8 = 0xFF;

/// Authentication tag length in bytes.
pub const MAC_LENGTH: usize = 16;

/// Tag, nonce, from, to and command; anything shorter cannot be a message.
pub const MIN_MESSAGE_LENGTH: usize = MAC_LENGTH + 4 + 3;

/// Command-specific bytes past this length are dropped at encode time, to
/// keep the stuffed frame under the one-byte length cap.
pub const MAX_EXTENDED_BYTES: usize = 99;

/// Inbound: a peer asking for its nonce counters. Outbound: our response.
pub const COMMAND_NONCE: u8 = 0x00;
/// Inbound only: a liveness or measure report.
pub const COMMAND_REPORT: u8 = 0x01;
/// Outbound only: switch the addressed device on.
pub const COMMAND_TURN_ON: u8 = 0x01;
/// Outbound only: switch the addressed device off.
pub const COMMAND_TURN_OFF: u8 = 0x02;

type WireMac = Blake2sMac<U16>;

/// Computes the keyed BLAKE2s-128 tag over `data`.
pub(crate) fn authentication_tag(secret: &[u8], data: &[u8]) -> [u8; MAC_LENGTH] {
  let mut mac =
    <WireMac as Mac>::new_from_slice(secret).expect("secret length is validated by LinkConfig");
  mac.update(data);
  mac.finalize().into_bytes().into()
}

/// Expands the logical payload so no byte carries the high bit: bytes with
/// the high bit set become `{(b >> 4) | 0x80, b & 0x0F}`, everything else is
/// copied verbatim.
pub fn stuff(data: &[u8]) -> Vec<u8> {
  let mut stuffed = Vec::with_capacity(data.len() * 2);
  for byte in data {
    if byte & 0x80 != 0 {
      stuffed.push((byte >> 4) | 0x80);
      stuffed.push(byte & 0x0F);
    } else {
      stuffed.push(*byte);
    }
  }
  stuffed
}

/// Reverses [stuff]. A flagged byte with no successor means the frame was
/// cut short on the air and cannot be decoded.
pub fn unstuff(data: &[u8]) -> Result<Vec<u8>, HearthProtocolError> {
  let mut unstuffed = Vec::with_capacity(data.len());
  let mut i = 0;
  while i < data.len() {
    if data[i] & 0x80 != 0 {
      if i + 1 >= data.len() {
        return Err(HearthProtocolError::TrailingStuffedByte);
      }
      unstuffed.push(((data[i] & 0x0F) << 4) | data[i + 1]);
      i += 2;
    } else {
      unstuffed.push(data[i]);
      i += 1;
    }
  }
  Ok(unstuffed)
}
