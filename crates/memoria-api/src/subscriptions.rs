//! Handlers for subscription endpoints.
//!
//! The path user is always the followee; the caller is the follower.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/users/:id/subscribers` | Follower profiles |
//! | `POST`   | `/users/:id/subscribers` | Caller subscribes to `:id` |
//! | `DELETE` | `/users/:id/subscribers` | Caller unsubscribes from `:id` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use memoria_core::{
  relationship::Subscription,
  service::SocialService,
  store::SocialStore,
  user::Profile,
};
use uuid::Uuid;

use crate::{error::ApiError, identity::Caller};

/// `GET /users/:id/subscribers`
pub async fn list<S: SocialStore>(
  State(service): State<Arc<SocialService<S>>>,
  Path(followee): Path<Uuid>,
) -> Result<Json<Vec<Profile>>, ApiError> {
  Ok(Json(service.subscribers(followee).await?))
}

/// `POST /users/:id/subscribers`
pub async fn create<S: SocialStore>(
  State(service): State<Arc<SocialService<S>>>,
  caller: Caller,
  Path(followee): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
  let subscription: Subscription =
    service.subscribe(caller.0, followee).await?;
  Ok((StatusCode::CREATED, Json(subscription)))
}

/// `DELETE /users/:id/subscribers`
pub async fn delete<S: SocialStore>(
  State(service): State<Arc<SocialService<S>>>,
  caller: Caller,
  Path(followee): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
  service.unsubscribe(caller.0, followee).await?;
  Ok(StatusCode::NO_CONTENT)
}
