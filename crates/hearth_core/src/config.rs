//! Process-level radio link configuration, loaded before any worker starts.

use crate::errors::HearthConfigError;
use getset::{CopyGetters, Getters};

/// Longest key the keyed BLAKE2s construction accepts.
pub const MAX_SECRET_LENGTH: usize = 32;

/// The controller's own radio address plus the secret shared with every
/// remote peer. Immutable once the workers are up.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct LinkConfig {
  #[getset(get_copy = "pub")]
  my_address: u8,
  #[getset(get = "pub")]
  secret: Vec<u8>,
}

impl LinkConfig {
  pub fn new(my_address: u8, secret: &[u8]) -> Result<Self, HearthConfigError> {
    if secret.is_empty() || secret.len() > MAX_SECRET_LENGTH {
      return Err(HearthConfigError::InvalidSecretLength(secret.len()));
    }
    Ok(Self {
      my_address,
      secret: secret.to_vec(),
    })
  }
}
