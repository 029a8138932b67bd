//! JSON REST API for Lineage.
//!
//! Exposes an axum [`Router`] backed by any
//! [`lineage_core::store::FamilyStore`]. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", lineage_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod extract;
pub mod members;
pub mod relationship_types;
pub mod relationships;

use std::sync::Arc;

use axum::{Router, routing::get};
use lineage_core::store::FamilyStore;
use serde::Serialize;

pub use error::ApiError;

/// Confirmation body returned by delete endpoints.
#[derive(Debug, Serialize)]
pub struct Ack {
  pub message: String,
}

impl Ack {
  pub fn new(message: impl Into<String>) -> Self { Self { message: message.into() } }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: FamilyStore + 'static,
{
  Router::new()
    // Members
    .route("/members", get(members::list::<S>).post(members::create::<S>))
    .route(
      "/members/{id}",
      get(members::get_one::<S>)
        .put(members::update::<S>)
        .delete(members::delete_one::<S>),
    )
    // Relationship types
    .route(
      "/relationship-types",
      get(relationship_types::list::<S>).post(relationship_types::create::<S>),
    )
    .route(
      "/relationship-types/{id}",
      get(relationship_types::get_one::<S>)
        .put(relationship_types::update::<S>)
        .delete(relationship_types::delete_one::<S>),
    )
    // Relationships
    .route(
      "/relationships",
      get(relationships::list_all::<S>).post(relationships::create::<S>),
    )
    .route(
      "/relationships/{id}",
      get(relationships::list_for_member::<S>)
        .put(relationships::update::<S>)
        .delete(relationships::delete_one::<S>),
    )
    .with_state(store)
}
