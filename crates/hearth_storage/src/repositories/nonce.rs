use crate::models::{NewNonce, Nonce};
use crate::schema::nonce::dsl;
use diesel::prelude::*;

fn get_or_create(conn: &mut SqliteConnection, owner: u8) -> QueryResult<Nonce> {
  let existing = dsl::nonce
    .filter(dsl::owner.eq(i32::from(owner)))
    .select(Nonce::as_select())
    .first::<Nonce>(conn)
    .optional()?;

  match existing {
    Some(nonce) => Ok(nonce),
    None => {
      diesel::insert_into(dsl::nonce)
        .values(NewNonce {
          owner: i32::from(owner),
          inbound: 0,
          outbound: 0,
        })
        .execute(conn)?;
      dsl::nonce
        .filter(dsl::owner.eq(i32::from(owner)))
        .select(Nonce::as_select())
        .first::<Nonce>(conn)
    }
  }
}

/// The last accepted inbound nonce for `owner` (0 before first contact).
pub fn get_last_inbound_nonce(conn: &mut SqliteConnection, owner: u8) -> QueryResult<i64> {
  Ok(get_or_create(conn, owner)?.inbound())
}

/// Records the nonce of an accepted inbound message.
pub fn register_inbound_nonce(
  conn: &mut SqliteConnection,
  owner: u8,
  value: u32,
) -> QueryResult<()> {
  get_or_create(conn, owner)?;
  diesel::update(dsl::nonce.filter(dsl::owner.eq(i32::from(owner))))
    .set(dsl::inbound.eq(i64::from(value)))
    .execute(conn)?;
  Ok(())
}

/// Claims the next outbound nonce for `owner`. Every emitted frame consumes
/// one, so outbound nonces are strictly increasing per peer.
pub fn next_outbound_nonce(conn: &mut SqliteConnection, owner: u8) -> QueryResult<u32> {
  let next = get_or_create(conn, owner)?.outbound() + 1;
  diesel::update(dsl::nonce.filter(dsl::owner.eq(i32::from(owner))))
    .set(dsl::outbound.eq(next))
    .execute(conn)?;
  Ok(next as u32)
}
