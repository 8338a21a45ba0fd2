//! Hearth error structs/enums shared across the core.

use displaydoc::Display;
use thiserror::Error;

#[derive(Debug, Error, Display, Clone, PartialEq, Eq)]
pub enum HearthProtocolError {
  /// Message ends with an unpaired stuffed byte
  TrailingStuffedByte,
  /// Message too short after destuffing: got {0} bytes, need at least {1}
  TruncatedMessage(usize, usize),
}

#[derive(Debug, Error, Display, Clone, PartialEq, Eq)]
pub enum HearthConfigError {
  /// Link secret must be between 1 and 32 bytes, got {0} bytes
  InvalidSecretLength(usize),
}
