//! The `FamilyStore` trait and its error-classification contract.
//!
//! The trait is implemented by storage backends (e.g. `lineage-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  Error,
  member::{Member, NewMember},
  relationship::{
    NewRelationship, NewRelationshipType, Relationship, RelationshipType,
    RelationshipTypePatch, RelationshipView,
  },
};

// ─── Error classification ────────────────────────────────────────────────────

/// A backend error that can say whether it is a domain-level failure.
///
/// Errors for which [`StoreError::domain`] returns `None` are unexpected
/// storage failures and are reported to callers without detail.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn domain(&self) -> Option<&Error>;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Lineage store backend.
///
/// Members and relationship types are plain single-table records. Writes to
/// relationships go through the relationship writer, which keeps each row's
/// derived inverse in step inside one transaction.
///
/// Update and delete of an unknown id fail with the matching `*NotFound`
/// domain error; `get_*` returns `None` instead.
pub trait FamilyStore: Send + Sync {
  type Error: StoreError;

  // ── Members ───────────────────────────────────────────────────────────

  fn add_member(
    &self,
    input: NewMember,
  ) -> impl Future<Output = Result<Member, Self::Error>> + Send + '_;

  fn get_member(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Member>, Self::Error>> + Send + '_;

  /// All members ordered by last name, then first name.
  fn list_members(
    &self,
  ) -> impl Future<Output = Result<Vec<Member>, Self::Error>> + Send + '_;

  /// Replace every attribute of an existing member.
  fn update_member(
    &self,
    id: Uuid,
    input: NewMember,
  ) -> impl Future<Output = Result<Member, Self::Error>> + Send + '_;

  /// Fails with [`Error::StillReferenced`] while any relationship names the
  /// member; nothing is cascaded.
  fn delete_member(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Relationship types ────────────────────────────────────────────────

  fn add_relationship_type(
    &self,
    input: NewRelationshipType,
  ) -> impl Future<Output = Result<RelationshipType, Self::Error>> + Send + '_;

  fn get_relationship_type(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<RelationshipType>, Self::Error>> + Send + '_;

  fn find_relationship_type_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<RelationshipType>, Self::Error>> + Send + 'a;

  /// All relationship types ordered by name.
  fn list_relationship_types(
    &self,
  ) -> impl Future<Output = Result<Vec<RelationshipType>, Self::Error>> + Send + '_;

  /// Apply a partial patch; unspecified fields keep their stored value.
  fn update_relationship_type(
    &self,
    id: Uuid,
    patch: RelationshipTypePatch,
  ) -> impl Future<Output = Result<RelationshipType, Self::Error>> + Send + '_;

  /// Fails with [`Error::StillReferenced`] while any relationship uses the
  /// type or any other type names it as its inverse.
  fn delete_relationship_type(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The declared inverse of a relationship type, if any.
  fn inverse_of(
    &self,
    type_id: Uuid,
  ) -> impl Future<Output = Result<Option<Uuid>, Self::Error>> + Send + '_;

  // ── Relationships ─────────────────────────────────────────────────────

  /// Insert a relationship and, where its type declares one, its inverse.
  ///
  /// Self-loops are accepted here; see [`NewRelationship::validate`].
  fn create_relationship(
    &self,
    input: NewRelationship,
  ) -> impl Future<Output = Result<Relationship, Self::Error>> + Send + '_;

  /// Rewrite a relationship, removing its old inverse and ensuring its new
  /// one.
  fn update_relationship(
    &self,
    id: Uuid,
    input: NewRelationship,
  ) -> impl Future<Output = Result<Relationship, Self::Error>> + Send + '_;

  /// Delete a relationship together with its inverse. Returns the deleted
  /// primary row.
  fn delete_relationship(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Relationship, Self::Error>> + Send + '_;

  fn get_relationship(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Relationship>, Self::Error>> + Send + '_;

  /// Joined read model. With `member`, only rows where that member is
  /// `member_id_1`.
  fn list_relationships(
    &self,
    member: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<RelationshipView>, Self::Error>> + Send + '_;
}
