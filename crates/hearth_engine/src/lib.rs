#[macro_use]
extern crate tracing;

mod engine;
mod error;
mod options;

pub use engine::HearthEngine;
pub use error::*;
pub use options::{EngineOptions, EngineOptionsBuilder};
