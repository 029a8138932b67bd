//! Default relationship-type catalog.
//!
//! Seeding never renames a type and never replaces a declared inverse. It
//! creates missing types and fills in the inverse of any catalog type that
//! has none, so an interrupted run is completed by the next one. Running it
//! on a complete catalog is a no-op.

use lineage_core::{
  relationship::{NewRelationshipType, RelationshipType, RelationshipTypePatch},
  store::FamilyStore,
};

/// Pairs of mutually inverse types.
pub const INVERSE_PAIRS: &[(&str, &str)] = &[
  ("Parent", "Child"),
  ("Grandparent", "Grandchild"),
  ("Aunt/Uncle", "Niece/Nephew"),
];

/// Types that are their own inverse.
pub const SELF_INVERSE: &[&str] = &["Spouse", "Sibling", "Cousin", "Co-Wife"];

/// What one seeding run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
  /// Types that did not exist before.
  pub created: usize,
  /// Types whose missing inverse was filled in.
  pub linked:  usize,
}

/// Ensure every catalog type exists and declares its inverse.
pub async fn seed_relationship_types<S: FamilyStore>(store: &S) -> Result<SeedReport, S::Error> {
  let mut report = SeedReport::default();

  for &(name, inverse_name) in INVERSE_PAIRS {
    let a = find_or_add(store, name, &mut report).await?;
    let b = find_or_add(store, inverse_name, &mut report).await?;
    link_if_unset(store, &a, &b, &mut report).await?;
    link_if_unset(store, &b, &a, &mut report).await?;
  }

  for &name in SELF_INVERSE {
    let ty = find_or_add(store, name, &mut report).await?;
    link_if_unset(store, &ty, &ty, &mut report).await?;
  }

  tracing::info!(
    created = report.created,
    linked = report.linked,
    "relationship type catalog seeded"
  );
  Ok(report)
}

async fn find_or_add<S: FamilyStore>(
  store: &S,
  name: &str,
  report: &mut SeedReport,
) -> Result<RelationshipType, S::Error> {
  if let Some(existing) = store.find_relationship_type_by_name(name).await? {
    return Ok(existing);
  }
  let added = store
    .add_relationship_type(NewRelationshipType::new(name))
    .await?;
  tracing::debug!(name, id = %added.relationship_type_id, "seeded relationship type");
  report.created += 1;
  Ok(added)
}

/// Point `ty` at `inverse` unless `ty` already declares an inverse.
async fn link_if_unset<S: FamilyStore>(
  store: &S,
  ty: &RelationshipType,
  inverse: &RelationshipType,
  report: &mut SeedReport,
) -> Result<(), S::Error> {
  if ty.inverse_type_id.is_some() {
    return Ok(());
  }
  store
    .update_relationship_type(ty.relationship_type_id, RelationshipTypePatch {
      name:            None,
      inverse_type_id: Some(inverse.relationship_type_id),
    })
    .await?;
  report.linked += 1;
  Ok(())
}
