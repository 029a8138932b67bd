//! Error types for `lineage-core`.
//!
//! Every variant here is something the caller did: a bad payload, an unknown
//! id, or a write the referential rules refuse. Backend failures live in the
//! backend's own error type; see [`crate::store::StoreError`].

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(String),

  #[error("member not found: {0}")]
  MemberNotFound(Uuid),

  #[error("relationship type not found: {0}")]
  RelationshipTypeNotFound(Uuid),

  #[error("relationship not found: {0}")]
  RelationshipNotFound(Uuid),

  /// A write pointed at a member or relationship type that does not exist.
  #[error("unknown reference: {0}")]
  UnknownReference(String),

  /// A delete was blocked because other rows still reference the target.
  #[error("still referenced: {0}")]
  StillReferenced(String),

  #[error("relationship type name already exists: {0:?}")]
  DuplicateName(String),
}

impl Error {
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::MemberNotFound(_)
        | Self::RelationshipTypeNotFound(_)
        | Self::RelationshipNotFound(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
