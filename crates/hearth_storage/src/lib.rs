//! SQLite persistence for the controller: every input, decision and device
//! state the engine relies on lives here, so behavior is deterministic
//! across restarts.

#[macro_use]
extern crate tracing;

pub mod models;
pub mod regulation;
pub mod repositories;
pub mod schema;

use diesel::{Connection, ConnectionError, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use displaydoc::Display;
use thiserror::Error;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

#[derive(Debug, Error, Display)]
pub enum StoreError {
  /// Could not open the store: {0}
  Connection(#[from] ConnectionError),
  /// Could not migrate the store: {0}
  Migration(String),
}

/// Opens a connection to the store at `database_url` (a path, or `:memory:`)
/// and brings its schema up to date. Each worker that touches the store
/// opens its own connection.
pub fn establish(database_url: &str) -> Result<SqliteConnection, StoreError> {
  let mut connection = SqliteConnection::establish(database_url)?;
  let applied = connection
    .run_pending_migrations(MIGRATIONS)
    .map_err(|err| StoreError::Migration(err.to_string()))?;
  if !applied.is_empty() {
    info!("Applied {} store migration(s)", applied.len());
  }
  Ok(connection)
}
