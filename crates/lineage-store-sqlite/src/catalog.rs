//! Relationship-type catalog lookups used by the relationship writer.
//!
//! These run on whatever connection or transaction the caller holds, so a
//! lookup inside the writer's transaction sees that transaction's writes.

use rusqlite::{Connection, OptionalExtension as _};
use uuid::Uuid;

use crate::encode::{encode_uuid, uuid_column};

/// The declared inverse of `type_id`; `None` if the type declares none or
/// does not exist.
pub(crate) fn inverse_of(conn: &Connection, type_id: Uuid) -> rusqlite::Result<Option<Uuid>> {
  let inverse: Option<Option<Uuid>> = conn
    .query_row(
      "SELECT inverse_type_id FROM relationship_types WHERE relationship_type_id = ?1",
      rusqlite::params![encode_uuid(type_id)],
      |row| match row.get_ref(0)? {
        rusqlite::types::ValueRef::Null => Ok(None),
        _ => uuid_column(row, 0).map(Some),
      },
    )
    .optional()?;
  Ok(inverse.flatten())
}
