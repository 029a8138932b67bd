//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! UUIDs are stored as hyphenated lowercase strings. Dates are stored as
//! `YYYY-MM-DD`. Booleans are stored as `0`/`1`.

use chrono::NaiveDate;
use lineage_core::{
  member::{Member, full_name},
  relationship::{RelationshipType, RelationshipView},
};
use rusqlite::{Row, types::Type};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

/// Read a UUID column while still inside a connection closure.
pub fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
  let text: String = row.get(idx)?;
  Uuid::parse_str(&text)
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const MEMBER_COLUMNS: &str = "member_id, first_name, middle_name, last_name, \
   date_of_birth, date_of_death, is_alive";

/// Raw values read directly from a `members` row.
pub struct RawMember {
  pub member_id:     String,
  pub first_name:    String,
  pub middle_name:   Option<String>,
  pub last_name:     String,
  pub date_of_birth: Option<String>,
  pub date_of_death: Option<String>,
  pub is_alive:      bool,
}

impl RawMember {
  /// Map a row selected with [`MEMBER_COLUMNS`].
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      member_id:     row.get(0)?,
      first_name:    row.get(1)?,
      middle_name:   row.get(2)?,
      last_name:     row.get(3)?,
      date_of_birth: row.get(4)?,
      date_of_death: row.get(5)?,
      is_alive:      row.get(6)?,
    })
  }

  pub fn into_member(self) -> Result<Member> {
    Ok(Member {
      member_id:     decode_uuid(&self.member_id)?,
      first_name:    self.first_name,
      middle_name:   self.middle_name,
      last_name:     self.last_name,
      date_of_birth: self.date_of_birth.as_deref().map(decode_date).transpose()?,
      date_of_death: self.date_of_death.as_deref().map(decode_date).transpose()?,
      is_alive:      self.is_alive,
    })
  }
}

pub const RELATIONSHIP_TYPE_COLUMNS: &str =
  "relationship_type_id, name, inverse_type_id";

/// Raw values read directly from a `relationship_types` row.
pub struct RawRelationshipType {
  pub relationship_type_id: String,
  pub name:                 String,
  pub inverse_type_id:      Option<String>,
}

impl RawRelationshipType {
  /// Map a row selected with [`RELATIONSHIP_TYPE_COLUMNS`].
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      relationship_type_id: row.get(0)?,
      name:                 row.get(1)?,
      inverse_type_id:      row.get(2)?,
    })
  }

  pub fn into_relationship_type(self) -> Result<RelationshipType> {
    Ok(RelationshipType {
      relationship_type_id: decode_uuid(&self.relationship_type_id)?,
      name:                 self.name,
      inverse_type_id:      self.inverse_type_id.as_deref().map(decode_uuid).transpose()?,
    })
  }
}

/// Raw values from `relationships` joined with both members and the type.
pub struct RawRelationshipView {
  pub relationship_id:        String,
  pub member_id_1:            String,
  pub member_1_first:         String,
  pub member_1_middle:        Option<String>,
  pub member_1_last:          String,
  pub relationship_type_id:   String,
  pub relationship_type_name: String,
  pub member_id_2:            String,
  pub member_2_first:         String,
  pub member_2_middle:        Option<String>,
  pub member_2_last:          String,
}

impl RawRelationshipView {
  pub fn into_view(self) -> Result<RelationshipView> {
    Ok(RelationshipView {
      relationship_id:        decode_uuid(&self.relationship_id)?,
      member_id_1:            decode_uuid(&self.member_id_1)?,
      member_1_name:          full_name(
        &self.member_1_first,
        self.member_1_middle.as_deref(),
        &self.member_1_last,
      ),
      relationship_type_id:   decode_uuid(&self.relationship_type_id)?,
      relationship_type_name: self.relationship_type_name,
      member_id_2:            decode_uuid(&self.member_id_2)?,
      member_2_name:          full_name(
        &self.member_2_first,
        self.member_2_middle.as_deref(),
        &self.member_2_last,
      ),
    })
  }
}
