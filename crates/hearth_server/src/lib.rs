//! The controller's three cooperating workers and everything they execute:
//! the radio link worker, the command bus executor and the UI fan-out, plus
//! the regulation engine commands and the device abstraction.

#[macro_use]
extern crate tracing;

pub mod command_bus;
pub mod devices;
pub mod radio;
pub mod ui;
