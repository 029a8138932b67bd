//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use lineage_core::{
  Error as CoreError,
  member::NewMember,
  relationship::{NewRelationship, NewRelationshipType, RelationshipTypePatch},
  store::FamilyStore,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn member(s: &SqliteStore, first: &str) -> Uuid {
  s.add_member(NewMember::new(first, "Doe"))
    .await
    .unwrap()
    .member_id
}

async fn plain_type(s: &SqliteStore, name: &str) -> Uuid {
  s.add_relationship_type(NewRelationshipType::new(name))
    .await
    .unwrap()
    .relationship_type_id
}

/// Two types that name each other as inverse, e.g. Parent ↔ Child.
async fn inverse_pair(s: &SqliteStore, name: &str, inverse: &str) -> (Uuid, Uuid) {
  let a = plain_type(s, name).await;
  let b = s
    .add_relationship_type(NewRelationshipType {
      name:            inverse.into(),
      inverse_type_id: Some(a),
    })
    .await
    .unwrap()
    .relationship_type_id;
  s.update_relationship_type(a, RelationshipTypePatch {
    inverse_type_id: Some(b),
    ..Default::default()
  })
  .await
  .unwrap();
  (a, b)
}

async fn self_inverse(s: &SqliteStore, name: &str) -> Uuid {
  let id = plain_type(s, name).await;
  s.update_relationship_type(id, RelationshipTypePatch {
    inverse_type_id: Some(id),
    ..Default::default()
  })
  .await
  .unwrap();
  id
}

/// Every stored relationship as `(member_id_1, type, member_id_2)`, sorted.
async fn edges(s: &SqliteStore) -> Vec<(Uuid, Uuid, Uuid)> {
  let mut edges: Vec<_> = s
    .list_relationships(None)
    .await
    .unwrap()
    .into_iter()
    .map(|v| (v.member_id_1, v.relationship_type_id, v.member_id_2))
    .collect();
  edges.sort();
  edges
}

fn sorted(mut edges: Vec<(Uuid, Uuid, Uuid)>) -> Vec<(Uuid, Uuid, Uuid)> {
  edges.sort();
  edges
}

fn domain(err: Error) -> CoreError {
  match err {
    Error::Core(e) => e,
    other => panic!("expected a domain error, got {other:?}"),
  }
}

// ─── Members ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_member() {
  let s = store().await;

  let mut input = NewMember::new("Ada", "Lovelace");
  input.middle_name = Some("King".into());
  input.date_of_birth = NaiveDate::from_ymd_opt(1815, 12, 10);

  let added = s.add_member(input).await.unwrap();
  let fetched = s.get_member(added.member_id).await.unwrap().unwrap();

  assert_eq!(fetched, added);
  assert_eq!(fetched.full_name(), "Ada King Lovelace");
  assert_eq!(fetched.date_of_birth, NaiveDate::from_ymd_opt(1815, 12, 10));
  assert!(fetched.is_alive);
}

#[tokio::test]
async fn get_member_missing_returns_none() {
  let s = store().await;
  assert!(s.get_member(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_members_orders_by_last_then_first_name() {
  let s = store().await;
  s.add_member(NewMember::new("Zed", "Brown")).await.unwrap();
  s.add_member(NewMember::new("Amy", "Clark")).await.unwrap();
  s.add_member(NewMember::new("Abe", "Brown")).await.unwrap();

  let names: Vec<String> = s
    .list_members()
    .await
    .unwrap()
    .iter()
    .map(|m| m.full_name())
    .collect();
  assert_eq!(names, ["Abe Brown", "Zed Brown", "Amy Clark"]);
}

#[tokio::test]
async fn update_member_replaces_every_field() {
  let s = store().await;
  let id = member(&s, "Ada").await;

  let mut replacement = NewMember::new("Augusta", "Byron");
  replacement.is_alive = false;
  replacement.date_of_death = NaiveDate::from_ymd_opt(1852, 11, 27);

  let updated = s.update_member(id, replacement).await.unwrap();
  let fetched = s.get_member(id).await.unwrap().unwrap();

  assert_eq!(updated, fetched);
  assert_eq!(fetched.first_name, "Augusta");
  assert_eq!(fetched.last_name, "Byron");
  assert!(!fetched.is_alive);
  assert_eq!(fetched.date_of_death, NaiveDate::from_ymd_opt(1852, 11, 27));
}

#[tokio::test]
async fn update_missing_member_is_not_found() {
  let s = store().await;
  let id = Uuid::new_v4();
  let err = s.update_member(id, NewMember::new("A", "B")).await.unwrap_err();
  assert_eq!(domain(err), CoreError::MemberNotFound(id));
}

#[tokio::test]
async fn delete_unreferenced_member() {
  let s = store().await;
  let id = member(&s, "Ada").await;

  s.delete_member(id).await.unwrap();
  assert!(s.get_member(id).await.unwrap().is_none());

  let err = s.delete_member(id).await.unwrap_err();
  assert_eq!(domain(err), CoreError::MemberNotFound(id));
}

#[tokio::test]
async fn delete_referenced_member_is_rejected_without_side_effects() {
  let s = store().await;
  let (parent, _child) = inverse_pair(&s, "Parent", "Child").await;
  let a = member(&s, "A").await;
  let b = member(&s, "B").await;
  s.create_relationship(NewRelationship::new(a, parent, b))
    .await
    .unwrap();
  let before = edges(&s).await;

  // Referenced as member_id_1 of the primary row.
  let err = s.delete_member(a).await.unwrap_err();
  assert!(matches!(domain(err), CoreError::StillReferenced(_)));

  // Referenced as member_id_1 of the derived inverse row.
  let err = s.delete_member(b).await.unwrap_err();
  assert!(matches!(domain(err), CoreError::StillReferenced(_)));

  assert!(s.get_member(a).await.unwrap().is_some());
  assert_eq!(edges(&s).await, before);
}

// ─── Relationship types ──────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_find_relationship_type() {
  let s = store().await;
  let id = plain_type(&s, "Godparent").await;

  let by_id = s.get_relationship_type(id).await.unwrap().unwrap();
  assert_eq!(by_id.name, "Godparent");
  assert_eq!(by_id.inverse_type_id, None);

  let by_name = s
    .find_relationship_type_by_name("Godparent")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(by_name, by_id);
  assert!(s.find_relationship_type_by_name("Nope").await.unwrap().is_none());
}

#[tokio::test]
async fn list_relationship_types_orders_by_name() {
  let s = store().await;
  plain_type(&s, "Spouse").await;
  plain_type(&s, "Child").await;
  plain_type(&s, "Parent").await;

  let names: Vec<String> = s
    .list_relationship_types()
    .await
    .unwrap()
    .into_iter()
    .map(|t| t.name)
    .collect();
  assert_eq!(names, ["Child", "Parent", "Spouse"]);
}

#[tokio::test]
async fn duplicate_type_name_is_a_conflict() {
  let s = store().await;
  plain_type(&s, "Spouse").await;

  let err = s
    .add_relationship_type(NewRelationshipType::new("Spouse"))
    .await
    .unwrap_err();
  assert_eq!(domain(err), CoreError::DuplicateName("Spouse".into()));
}

#[tokio::test]
async fn renaming_onto_existing_name_is_a_conflict() {
  let s = store().await;
  plain_type(&s, "Spouse").await;
  let other = plain_type(&s, "Partner").await;

  let err = s
    .update_relationship_type(other, RelationshipTypePatch {
      name: Some("Spouse".into()),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert_eq!(domain(err), CoreError::DuplicateName("Spouse".into()));
}

#[tokio::test]
async fn unknown_inverse_type_is_rejected() {
  let s = store().await;
  let err = s
    .add_relationship_type(NewRelationshipType {
      name:            "Parent".into(),
      inverse_type_id: Some(Uuid::new_v4()),
    })
    .await
    .unwrap_err();
  assert!(matches!(domain(err), CoreError::UnknownReference(_)));
  assert!(s.list_relationship_types().await.unwrap().is_empty());
}

#[tokio::test]
async fn patch_keeps_fields_that_are_not_supplied() {
  let s = store().await;
  let (parent, child) = inverse_pair(&s, "Parent", "Child").await;

  let renamed = s
    .update_relationship_type(parent, RelationshipTypePatch {
      name: Some("Mother or Father".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(renamed.name, "Mother or Father");
  assert_eq!(renamed.inverse_type_id, Some(child));

  let untouched = s
    .update_relationship_type(parent, RelationshipTypePatch::default())
    .await
    .unwrap();
  assert_eq!(untouched, renamed);
}

#[tokio::test]
async fn patch_missing_type_is_not_found() {
  let s = store().await;
  let id = Uuid::new_v4();
  let err = s
    .update_relationship_type(id, RelationshipTypePatch::default())
    .await
    .unwrap_err();
  assert_eq!(domain(err), CoreError::RelationshipTypeNotFound(id));
}

#[tokio::test]
async fn inverse_of_reports_declared_inverse() {
  let s = store().await;
  let (parent, child) = inverse_pair(&s, "Parent", "Child").await;
  let spouse = self_inverse(&s, "Spouse").await;
  let friend = plain_type(&s, "Friend").await;

  assert_eq!(s.inverse_of(parent).await.unwrap(), Some(child));
  assert_eq!(s.inverse_of(child).await.unwrap(), Some(parent));
  assert_eq!(s.inverse_of(spouse).await.unwrap(), Some(spouse));
  assert_eq!(s.inverse_of(friend).await.unwrap(), None);
  assert_eq!(s.inverse_of(Uuid::new_v4()).await.unwrap(), None);
}

#[tokio::test]
async fn delete_type_in_use_is_rejected() {
  let s = store().await;
  let friend = plain_type(&s, "Friend").await;
  let a = member(&s, "A").await;
  let b = member(&s, "B").await;
  s.create_relationship(NewRelationship::new(a, friend, b))
    .await
    .unwrap();

  let err = s.delete_relationship_type(friend).await.unwrap_err();
  assert!(matches!(domain(err), CoreError::StillReferenced(_)));
  assert!(s.get_relationship_type(friend).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_type_named_as_inverse_is_rejected() {
  let s = store().await;
  let (_parent, child) = inverse_pair(&s, "Parent", "Child").await;

  let err = s.delete_relationship_type(child).await.unwrap_err();
  assert!(matches!(domain(err), CoreError::StillReferenced(_)));
}

#[tokio::test]
async fn delete_unused_self_inverse_type() {
  let s = store().await;
  let spouse = self_inverse(&s, "Spouse").await;

  s.delete_relationship_type(spouse).await.unwrap();
  assert!(s.get_relationship_type(spouse).await.unwrap().is_none());

  let err = s.delete_relationship_type(spouse).await.unwrap_err();
  assert_eq!(domain(err), CoreError::RelationshipTypeNotFound(spouse));
}

// ─── Relationship writer: create ─────────────────────────────────────────────

#[tokio::test]
async fn parent_child_scenario_creates_and_deletes_both_rows() {
  let s = store().await;
  let (parent, child) = inverse_pair(&s, "Parent", "Child").await;
  let a = member(&s, "A").await;
  let b = member(&s, "B").await;

  let primary = s
    .create_relationship(NewRelationship::new(a, parent, b))
    .await
    .unwrap();
  assert_eq!((primary.member_id_1, primary.relationship_type_id, primary.member_id_2), (a, parent, b));
  assert_eq!(edges(&s).await, sorted(vec![(a, parent, b), (b, child, a)]));

  s.delete_relationship(primary.relationship_id).await.unwrap();
  assert!(edges(&s).await.is_empty());
}

#[tokio::test]
async fn type_without_inverse_writes_only_the_primary() {
  let s = store().await;
  let friend = plain_type(&s, "Friend").await;
  let a = member(&s, "A").await;
  let b = member(&s, "B").await;

  s.create_relationship(NewRelationship::new(a, friend, b))
    .await
    .unwrap();
  assert_eq!(edges(&s).await, vec![(a, friend, b)]);
}

#[tokio::test]
async fn self_inverse_pair_converges_on_two_rows_in_either_order() {
  let s = store().await;
  let spouse = self_inverse(&s, "Spouse").await;
  let a = member(&s, "A").await;
  let b = member(&s, "B").await;
  let expected = sorted(vec![(a, spouse, b), (b, spouse, a)]);

  s.create_relationship(NewRelationship::new(a, spouse, b)).await.unwrap();
  assert_eq!(edges(&s).await, expected);

  let second = s
    .create_relationship(NewRelationship::new(b, spouse, a))
    .await
    .unwrap();
  assert_eq!((second.member_id_1, second.member_id_2), (b, a));
  assert_eq!(edges(&s).await, expected);

  // Writing the first direction again changes nothing either.
  s.create_relationship(NewRelationship::new(a, spouse, b)).await.unwrap();
  assert_eq!(edges(&s).await, expected);
}

#[tokio::test]
async fn self_inverse_self_loop_writes_one_row() {
  let s = store().await;
  let spouse = self_inverse(&s, "Spouse").await;
  let a = member(&s, "A").await;

  s.create_relationship(NewRelationship::new(a, spouse, a)).await.unwrap();
  assert_eq!(edges(&s).await, vec![(a, spouse, a)]);
}

#[tokio::test]
async fn self_loop_with_distinct_inverse_writes_its_mirror() {
  let s = store().await;
  let (parent, child) = inverse_pair(&s, "Parent", "Child").await;
  let a = member(&s, "A").await;

  s.create_relationship(NewRelationship::new(a, parent, a)).await.unwrap();
  assert_eq!(edges(&s).await, sorted(vec![(a, parent, a), (a, child, a)]));
}

#[tokio::test]
async fn create_with_unknown_member_writes_nothing() {
  let s = store().await;
  let (parent, _) = inverse_pair(&s, "Parent", "Child").await;
  let a = member(&s, "A").await;

  let err = s
    .create_relationship(NewRelationship::new(a, parent, Uuid::new_v4()))
    .await
    .unwrap_err();
  assert!(matches!(domain(err), CoreError::UnknownReference(_)));
  assert!(edges(&s).await.is_empty());
}

#[tokio::test]
async fn create_with_unknown_type_writes_nothing() {
  let s = store().await;
  let a = member(&s, "A").await;
  let b = member(&s, "B").await;

  let err = s
    .create_relationship(NewRelationship::new(a, Uuid::new_v4(), b))
    .await
    .unwrap_err();
  assert!(matches!(domain(err), CoreError::UnknownReference(_)));
  assert!(edges(&s).await.is_empty());
}

#[tokio::test]
async fn failure_after_primary_insert_rolls_back_the_primary() {
  let s = store().await;
  let (parent, child) = inverse_pair(&s, "Parent", "Child").await;
  let a = member(&s, "A").await;
  let b = member(&s, "B").await;

  // Abort any insert of the inverse type, i.e. the step after the primary
  // row has already been written.
  s.connection()
    .call(move |conn| {
      conn.execute_batch(&format!(
        "CREATE TRIGGER fail_inverse BEFORE INSERT ON relationships
         WHEN NEW.relationship_type_id = '{child}'
         BEGIN SELECT RAISE(ABORT, 'simulated failure'); END;"
      ))?;
      Ok(())
    })
    .await
    .unwrap();

  let err = s
    .create_relationship(NewRelationship::new(a, parent, b))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Database(_)), "got {err:?}");
  assert!(edges(&s).await.is_empty());
}

// ─── Relationship writer: update ─────────────────────────────────────────────

#[tokio::test]
async fn update_replaces_old_inverse_with_new_one() {
  let s = store().await;
  let (parent, child) = inverse_pair(&s, "Parent", "Child").await;
  let (aunt, niece) = inverse_pair(&s, "Aunt", "Niece").await;
  let a = member(&s, "A").await;
  let b = member(&s, "B").await;
  let c = member(&s, "C").await;

  let primary = s
    .create_relationship(NewRelationship::new(a, parent, b))
    .await
    .unwrap();

  let updated = s
    .update_relationship(primary.relationship_id, NewRelationship::new(a, aunt, c))
    .await
    .unwrap();
  assert_eq!(updated.relationship_id, primary.relationship_id);

  let after = edges(&s).await;
  assert!(!after.contains(&(b, child, a)));
  assert_eq!(after, sorted(vec![(a, aunt, c), (c, niece, a)]));
}

#[tokio::test]
async fn update_to_type_without_inverse_leaves_only_the_primary() {
  let s = store().await;
  let (parent, _child) = inverse_pair(&s, "Parent", "Child").await;
  let friend = plain_type(&s, "Friend").await;
  let a = member(&s, "A").await;
  let b = member(&s, "B").await;

  let primary = s
    .create_relationship(NewRelationship::new(a, parent, b))
    .await
    .unwrap();
  s.update_relationship(primary.relationship_id, NewRelationship::new(a, friend, b))
    .await
    .unwrap();

  assert_eq!(edges(&s).await, vec![(a, friend, b)]);
}

#[tokio::test]
async fn update_reversing_direction_rebuilds_the_inverse() {
  let s = store().await;
  let (parent, child) = inverse_pair(&s, "Parent", "Child").await;
  let a = member(&s, "A").await;
  let b = member(&s, "B").await;

  let primary = s
    .create_relationship(NewRelationship::new(a, parent, b))
    .await
    .unwrap();
  s.update_relationship(primary.relationship_id, NewRelationship::new(b, parent, a))
    .await
    .unwrap();

  assert_eq!(edges(&s).await, sorted(vec![(b, parent, a), (a, child, b)]));
}

#[tokio::test]
async fn update_away_from_self_inverse_self_loop_keeps_the_primary() {
  let s = store().await;
  let spouse = self_inverse(&s, "Spouse").await;
  let a = member(&s, "A").await;
  let b = member(&s, "B").await;

  let primary = s
    .create_relationship(NewRelationship::new(a, spouse, a))
    .await
    .unwrap();
  let updated = s
    .update_relationship(primary.relationship_id, NewRelationship::new(a, spouse, b))
    .await
    .unwrap();

  assert_eq!(
    s.get_relationship(primary.relationship_id).await.unwrap(),
    Some(updated)
  );
  assert_eq!(edges(&s).await, sorted(vec![(a, spouse, b), (b, spouse, a)]));
}

#[tokio::test]
async fn update_missing_relationship_is_not_found() {
  let s = store().await;
  let friend = plain_type(&s, "Friend").await;
  let a = member(&s, "A").await;
  let b = member(&s, "B").await;
  let id = Uuid::new_v4();

  let err = s
    .update_relationship(id, NewRelationship::new(a, friend, b))
    .await
    .unwrap_err();
  assert_eq!(domain(err), CoreError::RelationshipNotFound(id));
  assert!(edges(&s).await.is_empty());
}

#[tokio::test]
async fn failed_update_restores_the_old_inverse() {
  let s = store().await;
  let (parent, child) = inverse_pair(&s, "Parent", "Child").await;
  let a = member(&s, "A").await;
  let b = member(&s, "B").await;

  let primary = s
    .create_relationship(NewRelationship::new(a, parent, b))
    .await
    .unwrap();

  // The old inverse is deleted before the primary update trips the foreign
  // key; both must be rolled back together.
  let err = s
    .update_relationship(primary.relationship_id, NewRelationship::new(a, parent, Uuid::new_v4()))
    .await
    .unwrap_err();
  assert!(matches!(domain(err), CoreError::UnknownReference(_)));
  assert_eq!(edges(&s).await, sorted(vec![(a, parent, b), (b, child, a)]));
}

// ─── Relationship writer: delete ─────────────────────────────────────────────

#[tokio::test]
async fn delete_twice_reports_not_found_without_side_effects() {
  let s = store().await;
  let (parent, _child) = inverse_pair(&s, "Parent", "Child").await;
  let spouse = self_inverse(&s, "Spouse").await;
  let a = member(&s, "A").await;
  let b = member(&s, "B").await;
  let c = member(&s, "C").await;

  let primary = s
    .create_relationship(NewRelationship::new(a, parent, b))
    .await
    .unwrap();
  s.create_relationship(NewRelationship::new(a, spouse, c)).await.unwrap();

  let deleted = s.delete_relationship(primary.relationship_id).await.unwrap();
  assert_eq!(deleted, primary);
  let remaining = sorted(vec![(a, spouse, c), (c, spouse, a)]);
  assert_eq!(edges(&s).await, remaining);

  let err = s.delete_relationship(primary.relationship_id).await.unwrap_err();
  assert_eq!(domain(err), CoreError::RelationshipNotFound(primary.relationship_id));
  assert_eq!(edges(&s).await, remaining);
}

#[tokio::test]
async fn delete_tolerates_an_already_removed_inverse() {
  let s = store().await;
  let (parent, child) = inverse_pair(&s, "Parent", "Child").await;
  let a = member(&s, "A").await;
  let b = member(&s, "B").await;

  let primary = s
    .create_relationship(NewRelationship::new(a, parent, b))
    .await
    .unwrap();

  // Remove the derived row behind the writer's back.
  s.connection()
    .call(move |conn| {
      conn.execute(
        "DELETE FROM relationships WHERE relationship_type_id = ?1",
        rusqlite::params![child.to_string()],
      )?;
      Ok(())
    })
    .await
    .unwrap();
  assert_eq!(edges(&s).await, vec![(a, parent, b)]);

  s.delete_relationship(primary.relationship_id).await.unwrap();
  assert!(edges(&s).await.is_empty());
}

#[tokio::test]
async fn deleting_a_derived_row_removes_its_mirror_too() {
  let s = store().await;
  let (parent, child) = inverse_pair(&s, "Parent", "Child").await;
  let a = member(&s, "A").await;
  let b = member(&s, "B").await;

  let primary = s
    .create_relationship(NewRelationship::new(a, parent, b))
    .await
    .unwrap();
  let derived = s
    .list_relationships(Some(b))
    .await
    .unwrap()
    .into_iter()
    .find(|v| v.relationship_type_id == child)
    .unwrap();

  s.delete_relationship(derived.relationship_id).await.unwrap();
  assert!(edges(&s).await.is_empty());
  let err = s.delete_relationship(primary.relationship_id).await.unwrap_err();
  assert!(domain(err).is_not_found());
}

#[tokio::test]
async fn delete_self_inverse_self_loop_removes_one_row() {
  let s = store().await;
  let spouse = self_inverse(&s, "Spouse").await;
  let a = member(&s, "A").await;

  let primary = s
    .create_relationship(NewRelationship::new(a, spouse, a))
    .await
    .unwrap();
  s.delete_relationship(primary.relationship_id).await.unwrap();
  assert!(edges(&s).await.is_empty());
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_relationships_joins_names_and_filters_by_subject() {
  let s = store().await;
  let (parent, child) = inverse_pair(&s, "Parent", "Child").await;
  let a = s.add_member(NewMember::new("Alice", "Smith")).await.unwrap();
  let b = s.add_member(NewMember::new("Bob", "Smith")).await.unwrap();

  s.create_relationship(NewRelationship::new(a.member_id, parent, b.member_id))
    .await
    .unwrap();

  let all = s.list_relationships(None).await.unwrap();
  assert_eq!(all.len(), 2);

  let for_bob = s.list_relationships(Some(b.member_id)).await.unwrap();
  assert_eq!(for_bob.len(), 1);
  let view = &for_bob[0];
  assert_eq!(view.member_1_name, "Bob Smith");
  assert_eq!(view.relationship_type_id, child);
  assert_eq!(view.relationship_type_name, "Child");
  assert_eq!(view.member_2_name, "Alice Smith");

  assert!(s.list_relationships(Some(Uuid::new_v4())).await.unwrap().is_empty());
}

#[tokio::test]
async fn get_relationship_by_id() {
  let s = store().await;
  let friend = plain_type(&s, "Friend").await;
  let a = member(&s, "A").await;
  let b = member(&s, "B").await;

  let created = s
    .create_relationship(NewRelationship::new(a, friend, b))
    .await
    .unwrap();
  assert_eq!(s.get_relationship(created.relationship_id).await.unwrap(), Some(created));
  assert_eq!(s.get_relationship(Uuid::new_v4()).await.unwrap(), None);
}
