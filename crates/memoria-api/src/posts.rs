//! Handlers for `/posts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST`   | `/posts` | Author is the caller |
//! | `GET`    | `/posts/:id` | Gated; 403 unless the author follows the caller |
//! | `PUT`    | `/posts/:id` | Partial update; absent fields keep their value |
//! | `DELETE` | `/posts/:id` | Owner only |
//! | `POST`   | `/posts/:id/likes` | No unlike endpoint exists for posts |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use memoria_core::{
  content::{NewPost, Post, PostPatch},
  service::SocialService,
  store::SocialStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{error::ApiError, identity::Caller};

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub title:           String,
  pub content:         String,
  pub image_name:      Option<String>,
  pub memory_timeline: Option<i64>,
  pub bgm:             Option<String>,
}

/// `POST /posts`
pub async fn create<S: SocialStore>(
  State(service): State<Arc<SocialService<S>>>,
  caller: Caller,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let post = service
    .create_post(NewPost {
      author:          caller.0,
      title:           body.title,
      content:         body.content,
      image_name:      body.image_name,
      memory_timeline: body.memory_timeline,
      bgm:             body.bgm,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(post)))
}

/// `GET /posts/:id`
pub async fn get_one<S: SocialStore>(
  State(service): State<Arc<SocialService<S>>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Post>, ApiError> {
  Ok(Json(service.view_post(caller.0, id).await?))
}

/// `PUT /posts/:id`
pub async fn update<S: SocialStore>(
  State(service): State<Arc<SocialService<S>>>,
  caller: Caller,
  Path(id): Path<Uuid>,
  Json(patch): Json<PostPatch>,
) -> Result<Json<Post>, ApiError> {
  Ok(Json(service.update_post(caller.0, id, patch).await?))
}

/// `DELETE /posts/:id`
pub async fn delete<S: SocialStore>(
  State(service): State<Arc<SocialService<S>>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
  service.delete_post(caller.0, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /posts/:id/likes`
pub async fn like<S: SocialStore>(
  State(service): State<Arc<SocialService<S>>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Post>, ApiError> {
  Ok(Json(service.like_post(caller.0, id).await?))
}
