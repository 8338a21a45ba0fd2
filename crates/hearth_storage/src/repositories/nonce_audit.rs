use crate::models::NewNonceRequestResponse;
use crate::schema::nonce_request_response_log::dsl;
use chrono::NaiveDateTime;
use diesel::prelude::*;

/// Appends an audit record of a nonce bootstrap exchange.
pub fn register(
  conn: &mut SqliteConnection,
  owner: u8,
  timestamp: NaiveDateTime,
  inbound_nonce: i64,
  outbound_nonce: u32,
) -> QueryResult<()> {
  diesel::insert_into(dsl::nonce_request_response_log)
    .values(NewNonceRequestResponse {
      owner: i32::from(owner),
      timestamp,
      inbound_nonce,
      outbound_nonce: i64::from(outbound_nonce),
    })
    .execute(conn)?;
  Ok(())
}
