//! Handlers for `/relationships` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/relationships` | Every row, joined with member and type names |
//! | `POST`   | `/relationships` | Body: [`RelationshipBody`]; also writes the inverse |
//! | `GET`    | `/relationships/:member_id` | Rows where the member is `member_id_1` |
//! | `PUT`    | `/relationships/:id` | Reconciles the old and new inverse |
//! | `DELETE` | `/relationships/:id` | Deletes the row and its inverse |
//!
//! The `GET` and `PUT`/`DELETE` forms share one path shape; the id is a
//! member id for `GET` and a relationship id otherwise.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use lineage_core::{
  relationship::{NewRelationship, Relationship, RelationshipView},
  store::FamilyStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Ack,
  error::ApiError,
  extract::{JsonBody, Path},
};

#[derive(Debug, Deserialize)]
pub struct RelationshipBody {
  pub member_id_1:          Uuid,
  pub relationship_type_id: Uuid,
  pub member_id_2:          Uuid,
}

impl From<RelationshipBody> for NewRelationship {
  fn from(b: RelationshipBody) -> Self {
    NewRelationship::new(b.member_id_1, b.relationship_type_id, b.member_id_2)
  }
}

/// `GET /relationships`
pub async fn list_all<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<RelationshipView>>, ApiError>
where
  S: FamilyStore,
{
  let rows = store.list_relationships(None).await.map_err(ApiError::store)?;
  Ok(Json(rows))
}

/// `GET /relationships/:member_id`
///
/// An unknown member yields an empty list rather than 404.
pub async fn list_for_member<S>(
  State(store): State<Arc<S>>,
  Path(member_id): Path<Uuid>,
) -> Result<Json<Vec<RelationshipView>>, ApiError>
where
  S: FamilyStore,
{
  let rows = store
    .list_relationships(Some(member_id))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(rows))
}

/// `POST /relationships`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<RelationshipBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FamilyStore,
{
  let input = NewRelationship::from(body);
  input.validate()?;
  let created = store
    .create_relationship(input)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /relationships/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  JsonBody(body): JsonBody<RelationshipBody>,
) -> Result<Json<Relationship>, ApiError>
where
  S: FamilyStore,
{
  let input = NewRelationship::from(body);
  input.validate()?;
  let updated = store
    .update_relationship(id, input)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(updated))
}

/// `DELETE /relationships/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Ack>, ApiError>
where
  S: FamilyStore,
{
  store.delete_relationship(id).await.map_err(ApiError::store)?;
  Ok(Json(Ack::new(format!("relationship {id} deleted"))))
}
