use getset::{CopyGetters, Getters};

/// Everything the engine needs to come up: where the radio adapter and the
/// store live, where the dashboard connects, who we are on the air and the
/// shared link secret (hex-encoded).
#[derive(CopyGetters, Getters, Debug, Clone)]
pub struct EngineOptions {
  #[getset(get = "pub")]
  serial_device: String,
  #[getset(get = "pub")]
  database_path: String,
  #[getset(get_copy = "pub")]
  ui_port: u16,
  #[getset(get_copy = "pub")]
  serial_baud_rate: u32,
  #[getset(get_copy = "pub")]
  my_address: u8,
  #[getset(get = "pub")]
  link_secret_hex: String,
}

impl Default for EngineOptions {
  fn default() -> Self {
    Self {
      serial_device: "/dev/ttyS0".to_owned(),
      database_path: "/var/lib/hearth/hearth.db".to_owned(),
      ui_port: 8001,
      serial_baud_rate: 4800,
      my_address: 0xA1,
      link_secret_hex: String::new(),
    }
  }
}

#[derive(Default)]
pub struct EngineOptionsBuilder {
  options: EngineOptions,
}

impl EngineOptionsBuilder {
  pub fn serial_device(&mut self, value: &str) -> &mut Self {
    self.options.serial_device = value.to_owned();
    self
  }

  pub fn database_path(&mut self, value: &str) -> &mut Self {
    self.options.database_path = value.to_owned();
    self
  }

  pub fn ui_port(&mut self, port: u16) -> &mut Self {
    self.options.ui_port = port;
    self
  }

  pub fn serial_baud_rate(&mut self, baud_rate: u32) -> &mut Self {
    self.options.serial_baud_rate = baud_rate;
    self
  }

  pub fn my_address(&mut self, address: u8) -> &mut Self {
    self.options.my_address = address;
    self
  }

  pub fn link_secret_hex(&mut self, value: &str) -> &mut Self {
    self.options.link_secret_hex = value.to_owned();
    self
  }

  pub fn finish(&mut self) -> EngineOptions {
    self.options.clone()
  }
}
