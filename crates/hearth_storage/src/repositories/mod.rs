//! Query and mutation helpers, one module per entity. All functions take
//! the caller's connection so they compose under a per-command transaction.

pub mod away_status;
pub mod device_control;
pub mod device_ping;
pub mod device_status;
pub mod nonce;
pub mod nonce_audit;
pub mod sensor_measure;
pub mod threshold_temperature;
