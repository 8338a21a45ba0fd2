mod evaluate_device;
mod evaluate_measure;
mod initialize_display;
mod record_device_status;
mod regulate_temperature;
mod respond_nonce_request;
mod save_measure;
mod save_ping;
mod update_configuration;

pub use evaluate_device::EvaluateDevice;
pub use evaluate_measure::EvaluateMeasure;
pub use initialize_display::InitializeDisplay;
pub use record_device_status::RecordDeviceStatus;
pub use regulate_temperature::RegulateTemperature;
pub use respond_nonce_request::RespondNonceRequest;
pub use save_measure::SaveMeasure;
pub use save_ping::SavePing;
pub use update_configuration::{ConfigurationPayload, UpdateConfiguration};
