//! Handlers for `/relationship-types` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/relationship-types` | Ordered by name |
//! | `POST`   | `/relationship-types` | Body: `{"name": "...", "inverse_type_id": "..."}` |
//! | `GET`    | `/relationship-types/:id` | 404 if not found |
//! | `PUT`    | `/relationship-types/:id` | Partial: omitted fields keep their value |
//! | `DELETE` | `/relationship-types/:id` | 409 while the type is in use |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use lineage_core::{
  relationship::{NewRelationshipType, RelationshipType, RelationshipTypePatch},
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
pub struct CreateBody {
  pub name:            String,
  pub inverse_type_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct PatchBody {
  pub name:            Option<String>,
  pub inverse_type_id: Option<Uuid>,
}

/// `GET /relationship-types`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<RelationshipType>>, ApiError>
where
  S: FamilyStore,
{
  let types = store.list_relationship_types().await.map_err(ApiError::store)?;
  Ok(Json(types))
}

/// `POST /relationship-types`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FamilyStore,
{
  let input = NewRelationshipType {
    name:            body.name.trim().to_owned(),
    inverse_type_id: body.inverse_type_id,
  };
  input.validate()?;
  let created = store
    .add_relationship_type(input)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /relationship-types/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<RelationshipType>, ApiError>
where
  S: FamilyStore,
{
  let found = store
    .get_relationship_type(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("relationship type {id} not found")))?;
  Ok(Json(found))
}

/// `PUT /relationship-types/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  JsonBody(body): JsonBody<PatchBody>,
) -> Result<Json<RelationshipType>, ApiError>
where
  S: FamilyStore,
{
  let patch = RelationshipTypePatch {
    name:            body.name.map(|n| n.trim().to_owned()),
    inverse_type_id: body.inverse_type_id,
  };
  patch.validate()?;
  let updated = store
    .update_relationship_type(id, patch)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(updated))
}

/// `DELETE /relationship-types/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Ack>, ApiError>
where
  S: FamilyStore,
{
  store
    .delete_relationship_type(id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Ack::new(format!("relationship type {id} deleted"))))
}
