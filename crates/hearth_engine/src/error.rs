use displaydoc::Display;
use hearth_core::errors::HearthConfigError;
use hearth_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error, Display)]
pub enum HearthEngineError {
  /// IO error: {0}
  IoError(#[from] std::io::Error),
  /// Store error: {0}
  StoreError(#[from] StoreError),
  /// Serial port error: {0}
  SerialError(#[from] serialport::Error),
  /// Link configuration error: {0}
  ConfigError(#[from] HearthConfigError),
  /// Invalid options: {0}
  InvalidOptions(String),
}
