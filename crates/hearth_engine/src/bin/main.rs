use argh::FromArgs;
use getset::{CopyGetters, Getters};
use hearth_engine::{EngineOptions, EngineOptionsBuilder, HearthEngine, HearthEngineError};
use std::env;
use tokio::{select, signal::ctrl_c};
use tracing::{info, Level};
use tracing_subscriber::{
  filter::{EnvFilter, LevelFilter},
  layer::SubscriberExt,
  util::SubscriberInitExt,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// command line interface for the hearth climate controller.
#[derive(FromArgs, Getters, CopyGetters)]
pub struct HearthCliArguments {
  /// print version and exit.
  #[argh(switch)]
  #[getset(get_copy = "pub")]
  version: bool,

  /// serial device the radio adapter is attached to.
  #[argh(option)]
  #[argh(default = "\"/dev/ttyS0\".to_owned()")]
  #[getset(get = "pub")]
  serial_device: String,

  /// baud rate the radio adapter is configured for.
  #[argh(option)]
  #[argh(default = "4800")]
  #[getset(get_copy = "pub")]
  serial_baud_rate: u32,

  /// path of the sqlite database file.
  #[argh(option)]
  #[argh(default = "\"/var/lib/hearth/hearth.db\".to_owned()")]
  #[getset(get = "pub")]
  database_path: String,

  /// port the dashboard websocket server listens on.
  #[argh(option)]
  #[argh(default = "8001")]
  #[getset(get_copy = "pub")]
  ui_port: u16,

  /// this controller's radio address.
  #[argh(option)]
  #[argh(default = "0xA1")]
  #[getset(get_copy = "pub")]
  my_address: u8,

  /// hex-encoded shared link secret; falls back to HEARTH_LINK_SECRET.
  #[argh(option)]
  #[getset(get = "pub")]
  link_secret: Option<String>,

  /// set log level for output.
  #[argh(option)]
  #[getset(get_copy = "pub")]
  log: Option<Level>,
}

pub fn setup_console_logging(log_level: Option<Level>) {
  if log_level.is_some() {
    tracing_subscriber::registry()
      .with(tracing_subscriber::fmt::layer())
      .with(LevelFilter::from(log_level))
      .try_init()
      .unwrap();
  } else {
    tracing_subscriber::registry()
      .with(tracing_subscriber::fmt::layer())
      .with(
        EnvFilter::try_from_default_env()
          .or_else(|_| EnvFilter::try_new("info"))
          .unwrap(),
      )
      .try_init()
      .unwrap();
  }
}

impl TryFrom<HearthCliArguments> for EngineOptions {
  type Error = HearthEngineError;

  fn try_from(args: HearthCliArguments) -> Result<Self, HearthEngineError> {
    let link_secret = match args.link_secret() {
      Some(secret) => secret.clone(),
      None => env::var("HEARTH_LINK_SECRET").map_err(|_| {
        HearthEngineError::InvalidOptions(
          "no link secret given; pass --link-secret or set HEARTH_LINK_SECRET".to_owned(),
        )
      })?,
    };

    Ok(
      EngineOptionsBuilder::default()
        .serial_device(args.serial_device())
        .serial_baud_rate(args.serial_baud_rate())
        .database_path(args.database_path())
        .ui_port(args.ui_port())
        .my_address(args.my_address())
        .link_secret_hex(&link_secret)
        .finish(),
    )
  }
}

#[tokio::main]
async fn main() -> Result<(), HearthEngineError> {
  let args: HearthCliArguments = argh::from_env();
  if args.version() {
    println!("Hearth Climate Controller Version {}", VERSION);
    return Ok(());
  }

  setup_console_logging(args.log());

  let options = EngineOptions::try_from(args)?;
  let engine = HearthEngine::default();
  select! {
    result = engine.run(&options) => {
      if let Err(e) = result {
        println!("Controller errored while running:");
        println!("{:?}", e);
      }
    }
    _ = ctrl_c() => {
      info!("Control-c hit, exiting.");
      engine.stop();
    }
  }

  Ok(())
}
