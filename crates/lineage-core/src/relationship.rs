//! Relationship types and the directed relationships between members.
//!
//! A relationship reads "`member_id_1` is <type> of `member_id_2`". A type may
//! declare an inverse type; the store keeps a mirrored row for every
//! relationship whose type has one (see [`crate::inverse`]).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, inverse::Edge};

// ─── Relationship types ──────────────────────────────────────────────────────

/// A named kind of relationship, e.g. "Parent" or "Spouse".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipType {
  pub relationship_type_id: Uuid,
  pub name:                 String,
  /// The type that describes the same relationship from the other side.
  /// Equal to `relationship_type_id` for self-inverse types.
  pub inverse_type_id:      Option<Uuid>,
}

impl RelationshipType {
  pub fn is_self_inverse(&self) -> bool {
    self.inverse_type_id == Some(self.relationship_type_id)
  }
}

/// Input to [`crate::store::FamilyStore::add_relationship_type`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRelationshipType {
  pub name:            String,
  pub inverse_type_id: Option<Uuid>,
}

impl NewRelationshipType {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), inverse_type_id: None }
  }

  pub fn validate(&self) -> Result<()> { validate_type_name(&self.name) }
}

/// Partial update for a relationship type. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipTypePatch {
  pub name:            Option<String>,
  pub inverse_type_id: Option<Uuid>,
}

impl RelationshipTypePatch {
  pub fn validate(&self) -> Result<()> {
    match &self.name {
      Some(name) => validate_type_name(name),
      None => Ok(()),
    }
  }
}

fn validate_type_name(name: &str) -> Result<()> {
  if name.trim().is_empty() {
    return Err(Error::Validation(
      "relationship type name must not be empty".into(),
    ));
  }
  Ok(())
}

// ─── Relationships ───────────────────────────────────────────────────────────

/// A stored, directed relationship between two members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
  pub relationship_id:      Uuid,
  pub member_id_1:          Uuid,
  pub relationship_type_id: Uuid,
  pub member_id_2:          Uuid,
}

impl Relationship {
  pub fn from_new(relationship_id: Uuid, input: &NewRelationship) -> Self {
    Self {
      relationship_id,
      member_id_1: input.member_id_1,
      relationship_type_id: input.relationship_type_id,
      member_id_2: input.member_id_2,
    }
  }

  pub fn edge(&self) -> Edge {
    Edge::new(self.member_id_1, self.relationship_type_id, self.member_id_2)
  }
}

/// Input to the relationship writer for both create and update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRelationship {
  pub member_id_1:          Uuid,
  pub relationship_type_id: Uuid,
  pub member_id_2:          Uuid,
}

impl NewRelationship {
  pub fn new(member_id_1: Uuid, relationship_type_id: Uuid, member_id_2: Uuid) -> Self {
    Self { member_id_1, relationship_type_id, member_id_2 }
  }

  pub fn edge(&self) -> Edge {
    Edge::new(self.member_id_1, self.relationship_type_id, self.member_id_2)
  }

  /// A member cannot be related to itself.
  ///
  /// The store accepts self-loops; this check belongs to whoever accepts
  /// input from outside.
  pub fn validate(&self) -> Result<()> {
    if self.member_id_1 == self.member_id_2 {
      return Err(Error::Validation(
        "member_id_1 and member_id_2 must be different members".into(),
      ));
    }
    Ok(())
  }
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// A relationship joined with the names of everything it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipView {
  pub relationship_id:        Uuid,
  pub member_id_1:            Uuid,
  pub member_1_name:          String,
  pub relationship_type_id:   Uuid,
  pub relationship_type_name: String,
  pub member_id_2:            Uuid,
  pub member_2_name:          String,
}
