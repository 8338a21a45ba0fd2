//! The UI fan-out worker: a websocket listener that pushes state-change
//! events to every connected dashboard and turns inbound dashboard messages
//! into configuration-update commands.

mod events;
mod publisher;
mod server;

pub use events::UiEvent;
pub use publisher::UiPublisher;
pub use server::UiServer;
