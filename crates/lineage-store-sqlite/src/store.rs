//! The SQLite implementation of [`FamilyStore`].

use std::path::Path;

use lineage_core::{
  Error as CoreError,
  member::{Member, NewMember},
  relationship::{
    NewRelationship, NewRelationshipType, Relationship, RelationshipType,
    RelationshipTypePatch, RelationshipView,
  },
  store::FamilyStore,
};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result, catalog,
  encode::{
    MEMBER_COLUMNS, RELATIONSHIP_TYPE_COLUMNS, RawMember, RawRelationshipType,
    RawRelationshipView, encode_date, encode_uuid,
  },
  error::Constraint,
  schema::SCHEMA,
  writer,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Lineage store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted. All calls
/// are executed in order on the connection's own thread, so each relationship
/// write runs its transaction start to finish without interleaving.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  #[cfg(test)]
  pub(crate) fn connection(&self) -> &tokio_rusqlite::Connection { &self.conn }

  async fn fetch_relationship_type(&self, id: Uuid) -> Result<Option<RelationshipType>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawRelationshipType> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {RELATIONSHIP_TYPE_COLUMNS} FROM relationship_types
                  WHERE relationship_type_id = ?1"
              ),
              rusqlite::params![id_str],
              RawRelationshipType::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRelationshipType::into_relationship_type).transpose()
  }
}

type MemberParams = (String, Option<String>, String, Option<String>, Option<String>, bool);

/// Parameters for the member columns after `member_id`, in schema order.
fn member_params(input: &NewMember) -> MemberParams {
  (
    input.first_name.clone(),
    input.middle_name.clone(),
    input.last_name.clone(),
    input.date_of_birth.map(encode_date),
    input.date_of_death.map(encode_date),
    input.is_alive,
  )
}

fn unknown_reference(_: Constraint) -> CoreError {
  CoreError::UnknownReference(
    "member_id_1, member_id_2 and relationship_type_id must all exist".into(),
  )
}

// ─── FamilyStore impl ────────────────────────────────────────────────────────

impl FamilyStore for SqliteStore {
  type Error = Error;

  // ── Members ───────────────────────────────────────────────────────────────

  async fn add_member(&self, input: NewMember) -> Result<Member> {
    let (first, middle, last, born, died, alive) = member_params(&input);
    let member = Member::from_new(Uuid::new_v4(), input);
    let id_str = encode_uuid(member.member_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!("INSERT INTO members ({MEMBER_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
          rusqlite::params![id_str, first, middle, last, born, died, alive],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(member_id = %member.member_id, "member added");
    Ok(member)
  }

  async fn get_member(&self, id: Uuid) -> Result<Option<Member>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawMember> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {MEMBER_COLUMNS} FROM members WHERE member_id = ?1"),
              rusqlite::params![id_str],
              RawMember::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMember::into_member).transpose()
  }

  async fn list_members(&self) -> Result<Vec<Member>> {
    let raws: Vec<RawMember> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {MEMBER_COLUMNS} FROM members ORDER BY last_name, first_name, member_id"
        ))?;
        let rows = stmt
          .query_map([], RawMember::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMember::into_member).collect()
  }

  async fn update_member(&self, id: Uuid, input: NewMember) -> Result<Member> {
    let id_str = encode_uuid(id);
    let (first, middle, last, born, died, alive) = member_params(&input);

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE members
              SET first_name = ?2, middle_name = ?3, last_name = ?4,
                  date_of_birth = ?5, date_of_death = ?6, is_alive = ?7
            WHERE member_id = ?1",
          rusqlite::params![id_str, first, middle, last, born, died, alive],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(CoreError::MemberNotFound(id).into());
    }
    Ok(Member::from_new(id, input))
  }

  async fn delete_member(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM members WHERE member_id = ?1", rusqlite::params![id_str])?)
      })
      .await
      .map_err(|e| {
        Error::from_write(e, |_| {
          CoreError::StillReferenced(format!(
            "member {id} is still referenced by one or more relationships"
          ))
        })
      })?;

    if deleted == 0 {
      return Err(CoreError::MemberNotFound(id).into());
    }
    tracing::debug!(member_id = %id, "member deleted");
    Ok(())
  }

  // ── Relationship types ────────────────────────────────────────────────────

  async fn add_relationship_type(&self, input: NewRelationshipType) -> Result<RelationshipType> {
    let relationship_type = RelationshipType {
      relationship_type_id: Uuid::new_v4(),
      name:                 input.name,
      inverse_type_id:      input.inverse_type_id,
    };

    let id_str      = encode_uuid(relationship_type.relationship_type_id);
    let name        = relationship_type.name.clone();
    let inverse_str = relationship_type.inverse_type_id.map(encode_uuid);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!("INSERT INTO relationship_types ({RELATIONSHIP_TYPE_COLUMNS}) VALUES (?1, ?2, ?3)"),
          rusqlite::params![id_str, name, inverse_str],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| {
        Error::from_write(e, |constraint| match constraint {
          Constraint::Unique => CoreError::DuplicateName(relationship_type.name.clone()),
          Constraint::ForeignKey => CoreError::UnknownReference(format!(
            "inverse_type_id {:?} is not a relationship type",
            relationship_type.inverse_type_id
          )),
        })
      })?;

    Ok(relationship_type)
  }

  async fn get_relationship_type(&self, id: Uuid) -> Result<Option<RelationshipType>> {
    self.fetch_relationship_type(id).await
  }

  async fn find_relationship_type_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> Result<Option<RelationshipType>> {
    let name = name.to_owned();

    let raw: Option<RawRelationshipType> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {RELATIONSHIP_TYPE_COLUMNS} FROM relationship_types WHERE name = ?1"),
              rusqlite::params![name],
              RawRelationshipType::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRelationshipType::into_relationship_type).transpose()
  }

  async fn list_relationship_types(&self) -> Result<Vec<RelationshipType>> {
    let raws: Vec<RawRelationshipType> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RELATIONSHIP_TYPE_COLUMNS} FROM relationship_types ORDER BY name"
        ))?;
        let rows = stmt
          .query_map([], RawRelationshipType::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawRelationshipType::into_relationship_type)
      .collect()
  }

  async fn update_relationship_type(
    &self,
    id: Uuid,
    patch: RelationshipTypePatch,
  ) -> Result<RelationshipType> {
    let id_str      = encode_uuid(id);
    let name        = patch.name.clone();
    let inverse_str = patch.inverse_type_id.map(encode_uuid);

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE relationship_types
              SET name            = COALESCE(?2, name),
                  inverse_type_id = COALESCE(?3, inverse_type_id)
            WHERE relationship_type_id = ?1",
          rusqlite::params![id_str, name, inverse_str],
        )?)
      })
      .await
      .map_err(|e| {
        Error::from_write(e, |constraint| match constraint {
          Constraint::Unique => {
            CoreError::DuplicateName(patch.name.clone().unwrap_or_default())
          }
          Constraint::ForeignKey => CoreError::UnknownReference(format!(
            "inverse_type_id {:?} is not a relationship type",
            patch.inverse_type_id
          )),
        })
      })?;

    if updated == 0 {
      return Err(CoreError::RelationshipTypeNotFound(id).into());
    }

    self
      .fetch_relationship_type(id)
      .await?
      .ok_or_else(|| CoreError::RelationshipTypeNotFound(id).into())
  }

  async fn delete_relationship_type(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM relationship_types WHERE relationship_type_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await
      .map_err(|e| {
        Error::from_write(e, |_| {
          CoreError::StillReferenced(format!(
            "relationship type {id} is still used by a relationship or as another type's inverse"
          ))
        })
      })?;

    if deleted == 0 {
      return Err(CoreError::RelationshipTypeNotFound(id).into());
    }
    Ok(())
  }

  async fn inverse_of(&self, type_id: Uuid) -> Result<Option<Uuid>> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(catalog::inverse_of(conn, type_id)?))
        .await?,
    )
  }

  // ── Relationships ─────────────────────────────────────────────────────────

  async fn create_relationship(&self, input: NewRelationship) -> Result<Relationship> {
    let relationship = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let relationship = writer::create(&tx, &input)?;
        tx.commit()?;
        Ok(relationship)
      })
      .await
      .map_err(|e| Error::from_write(e, unknown_reference))?;

    tracing::info!(relationship_id = %relationship.relationship_id, "relationship created");
    Ok(relationship)
  }

  async fn update_relationship(&self, id: Uuid, input: NewRelationship) -> Result<Relationship> {
    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(relationship) = writer::update(&tx, id, &input)? else {
          return Ok(None);
        };
        tx.commit()?;
        Ok(Some(relationship))
      })
      .await
      .map_err(|e| Error::from_write(e, unknown_reference))?;

    let relationship = updated.ok_or(CoreError::RelationshipNotFound(id))?;
    tracing::info!(relationship_id = %id, "relationship updated");
    Ok(relationship)
  }

  async fn delete_relationship(&self, id: Uuid) -> Result<Relationship> {
    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(relationship) = writer::delete(&tx, id)? else {
          return Ok(None);
        };
        tx.commit()?;
        Ok(Some(relationship))
      })
      .await?;

    let relationship = deleted.ok_or(CoreError::RelationshipNotFound(id))?;
    tracing::info!(relationship_id = %id, "relationship deleted");
    Ok(relationship)
  }

  async fn get_relationship(&self, id: Uuid) -> Result<Option<Relationship>> {
    Ok(self.conn.call(move |conn| Ok(writer::find(conn, id)?)).await?)
  }

  async fn list_relationships(&self, member: Option<Uuid>) -> Result<Vec<RelationshipView>> {
    let member_str = member.map(encode_uuid);

    let raws: Vec<RawRelationshipView> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             r.relationship_id,
             r.member_id_1, m1.first_name, m1.middle_name, m1.last_name,
             r.relationship_type_id, t.name,
             r.member_id_2, m2.first_name, m2.middle_name, m2.last_name
           FROM relationships r
           JOIN members            m1 ON m1.member_id = r.member_id_1
           JOIN members            m2 ON m2.member_id = r.member_id_2
           JOIN relationship_types t  ON t.relationship_type_id = r.relationship_type_id
           WHERE ?1 IS NULL OR r.member_id_1 = ?1
           ORDER BY m1.last_name, m1.first_name, t.name, m2.last_name, m2.first_name",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![member_str], |row| {
            Ok(RawRelationshipView {
              relationship_id:        row.get(0)?,
              member_id_1:            row.get(1)?,
              member_1_first:         row.get(2)?,
              member_1_middle:        row.get(3)?,
              member_1_last:          row.get(4)?,
              relationship_type_id:   row.get(5)?,
              relationship_type_name: row.get(6)?,
              member_id_2:            row.get(7)?,
              member_2_first:         row.get(8)?,
              member_2_middle:        row.get(9)?,
              member_2_last:          row.get(10)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRelationshipView::into_view).collect()
  }
}
