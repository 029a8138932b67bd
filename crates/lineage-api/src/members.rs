//! Handlers for `/members` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/members` | Ordered by last name, first name |
//! | `POST`   | `/members` | Body: [`MemberBody`]; returns 201 + stored member |
//! | `GET`    | `/members/:id` | 404 if not found |
//! | `PUT`    | `/members/:id` | Body: [`MemberBody`]; full replacement |
//! | `DELETE` | `/members/:id` | 409 while any relationship references the member |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use lineage_core::{
  member::{Member, NewMember},
  store::FamilyStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Ack,
  error::ApiError,
  extract::{JsonBody, Path},
};

/// JSON body accepted by `POST /members` and `PUT /members/:id`.
#[derive(Debug, Deserialize)]
pub struct MemberBody {
  pub first_name:    String,
  pub middle_name:   Option<String>,
  pub last_name:     String,
  pub date_of_birth: Option<NaiveDate>,
  pub date_of_death: Option<NaiveDate>,
  /// When omitted, a member is alive unless a `date_of_death` is given.
  pub is_alive:      Option<bool>,
}

impl From<MemberBody> for NewMember {
  fn from(b: MemberBody) -> Self {
    NewMember {
      first_name:    b.first_name,
      middle_name:   b.middle_name,
      last_name:     b.last_name,
      date_of_birth: b.date_of_birth,
      date_of_death: b.date_of_death,
      is_alive:      b.is_alive.unwrap_or(b.date_of_death.is_none()),
    }
  }
}

/// `GET /members`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Member>>, ApiError>
where
  S: FamilyStore,
{
  let members = store.list_members().await.map_err(ApiError::store)?;
  Ok(Json(members))
}

/// `POST /members`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<MemberBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FamilyStore,
{
  let input = NewMember::from(body);
  input.validate()?;
  let member = store.add_member(input).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(member)))
}

/// `GET /members/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Member>, ApiError>
where
  S: FamilyStore,
{
  let member = store
    .get_member(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("member {id} not found")))?;
  Ok(Json(member))
}

/// `PUT /members/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  JsonBody(body): JsonBody<MemberBody>,
) -> Result<Json<Member>, ApiError>
where
  S: FamilyStore,
{
  let input = NewMember::from(body);
  input.validate()?;
  let member = store.update_member(id, input).await.map_err(ApiError::store)?;
  Ok(Json(member))
}

/// `DELETE /members/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Ack>, ApiError>
where
  S: FamilyStore,
{
  store.delete_member(id).await.map_err(ApiError::store)?;
  Ok(Json(Ack::new(format!("member {id} deleted"))))
}
