//! The relationship writer: create, update and delete a relationship together
//! with its derived inverse row.
//!
//! Every entry point takes an open [`Transaction`] and leaves committing to
//! the caller. Returning early (a `None` for an unknown id, or an error)
//! without committing drops the transaction, which rolls back everything the
//! call wrote. A primary row is therefore never persisted without the inverse
//! decision that goes with it.

use lineage_core::{
  inverse::{self, Edge, InversePlan},
  relationship::{NewRelationship, Relationship},
};
use rusqlite::{Connection, OptionalExtension as _, Transaction};
use uuid::Uuid;

use crate::{
  catalog,
  encode::{encode_uuid, uuid_column},
};

// ─── Entry points ────────────────────────────────────────────────────────────

/// Insert `input` and ensure its inverse.
///
/// If an identical `(member_id_1, type, member_id_2)` row already exists it is
/// returned instead of inserting a duplicate, so writing a self-inverse pair
/// from both directions converges on two rows.
pub(crate) fn create(
  tx: &Transaction<'_>,
  input: &NewRelationship,
) -> rusqlite::Result<Relationship> {
  let relationship = match find_by_edge(tx, input.edge())? {
    Some(existing) => {
      tracing::debug!(
        relationship_id = %existing.relationship_id,
        "relationship already recorded; reusing existing row"
      );
      existing
    }
    None => {
      let relationship = Relationship::from_new(Uuid::new_v4(), input);
      insert(tx, &relationship)?;
      relationship
    }
  };

  ensure_inverse(tx, relationship.edge())?;
  Ok(relationship)
}

/// Rewrite relationship `id` to `input`. The stale inverse is removed before
/// the new values are applied, then the new inverse is ensured.
///
/// Returns `None` if `id` does not exist.
pub(crate) fn update(
  tx: &Transaction<'_>,
  id: Uuid,
  input: &NewRelationship,
) -> rusqlite::Result<Option<Relationship>> {
  let Some(old) = find(tx, id)? else {
    return Ok(None);
  };

  remove_inverse(tx, old.edge())?;

  let updated = tx.execute(
    "UPDATE relationships
        SET member_id_1 = ?2, relationship_type_id = ?3, member_id_2 = ?4
      WHERE relationship_id = ?1",
    rusqlite::params![
      encode_uuid(id),
      encode_uuid(input.member_id_1),
      encode_uuid(input.relationship_type_id),
      encode_uuid(input.member_id_2),
    ],
  )?;
  if updated == 0 {
    return Ok(None);
  }

  let relationship = Relationship::from_new(id, input);
  ensure_inverse(tx, relationship.edge())?;
  Ok(Some(relationship))
}

/// Delete relationship `id` and its inverse. Returns the deleted row, or
/// `None` if `id` does not exist.
pub(crate) fn delete(tx: &Transaction<'_>, id: Uuid) -> rusqlite::Result<Option<Relationship>> {
  let Some(old) = find(tx, id)? else {
    return Ok(None);
  };

  tx.execute(
    "DELETE FROM relationships WHERE relationship_id = ?1",
    rusqlite::params![encode_uuid(id)],
  )?;

  remove_inverse(tx, old.edge())?;
  Ok(Some(old))
}

// ─── Inverse maintenance ─────────────────────────────────────────────────────

/// Make sure the mirror of `edge` exists, inserting it if absent.
fn ensure_inverse(conn: &Connection, edge: Edge) -> rusqlite::Result<()> {
  match inverse::plan(edge, catalog::inverse_of(conn, edge.type_id)?) {
    InversePlan::NoInverse => {}
    InversePlan::SelfLoop => {
      tracing::debug!(member_id = %edge.subject, "self-inverse self-loop; no inverse row");
    }
    InversePlan::Mirror(mirror) => {
      if find_by_edge(conn, mirror)?.is_some() {
        tracing::debug!(?mirror, "inverse already present");
      } else {
        let inverse_id = Uuid::new_v4();
        insert(conn, &Relationship {
          relationship_id:      inverse_id,
          member_id_1:          mirror.subject,
          relationship_type_id: mirror.type_id,
          member_id_2:          mirror.object,
        })?;
        tracing::debug!(relationship_id = %inverse_id, ?mirror, "inverse created");
      }
    }
  }
  Ok(())
}

/// Delete every row matching the mirror of `edge`. Matching nothing is not an
/// error: the inverse may have been edited or removed independently.
fn remove_inverse(conn: &Connection, edge: Edge) -> rusqlite::Result<usize> {
  let plan = inverse::plan(edge, catalog::inverse_of(conn, edge.type_id)?);
  let Some(mirror) = plan.mirror() else {
    return Ok(0);
  };
  let removed = delete_by_edge(conn, mirror)?;
  tracing::debug!(?mirror, removed, "inverse removed");
  Ok(removed)
}

// ─── Row access ──────────────────────────────────────────────────────────────

const RELATIONSHIP_COLUMNS: &str =
  "relationship_id, member_id_1, relationship_type_id, member_id_2";

fn relationship_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Relationship> {
  Ok(Relationship {
    relationship_id:      uuid_column(row, 0)?,
    member_id_1:          uuid_column(row, 1)?,
    relationship_type_id: uuid_column(row, 2)?,
    member_id_2:          uuid_column(row, 3)?,
  })
}

pub(crate) fn find(conn: &Connection, id: Uuid) -> rusqlite::Result<Option<Relationship>> {
  conn
    .query_row(
      &format!("SELECT {RELATIONSHIP_COLUMNS} FROM relationships WHERE relationship_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      relationship_from_row,
    )
    .optional()
}

fn find_by_edge(conn: &Connection, edge: Edge) -> rusqlite::Result<Option<Relationship>> {
  conn
    .query_row(
      &format!(
        "SELECT {RELATIONSHIP_COLUMNS} FROM relationships
          WHERE member_id_1 = ?1 AND relationship_type_id = ?2 AND member_id_2 = ?3
          LIMIT 1"
      ),
      rusqlite::params![
        encode_uuid(edge.subject),
        encode_uuid(edge.type_id),
        encode_uuid(edge.object),
      ],
      relationship_from_row,
    )
    .optional()
}

fn insert(conn: &Connection, relationship: &Relationship) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO relationships (relationship_id, member_id_1, relationship_type_id, member_id_2)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![
      encode_uuid(relationship.relationship_id),
      encode_uuid(relationship.member_id_1),
      encode_uuid(relationship.relationship_type_id),
      encode_uuid(relationship.member_id_2),
    ],
  )?;
  Ok(())
}

fn delete_by_edge(conn: &Connection, edge: Edge) -> rusqlite::Result<usize> {
  conn.execute(
    "DELETE FROM relationships
      WHERE member_id_1 = ?1 AND relationship_type_id = ?2 AND member_id_2 = ?3",
    rusqlite::params![
      encode_uuid(edge.subject),
      encode_uuid(edge.type_id),
      encode_uuid(edge.object),
    ],
  )
}
