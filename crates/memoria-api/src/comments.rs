//! Handlers for comment endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/posts/:id/comments` | Oldest first |
//! | `POST`   | `/posts/:id/comments` | `parent_id` makes it a reply |
//! | `POST`   | `/comments/:id/likes` | |
//! | `DELETE` | `/comments/:id/likes` | Comment likes can be withdrawn |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use memoria_core::{
  content::{Comment, NewComment},
  service::SocialService,
  store::SocialStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{error::ApiError, identity::Caller};

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub content:   String,
  pub parent_id: Option<Uuid>,
}

/// `GET /posts/:id/comments`
pub async fn list<S: SocialStore>(
  State(service): State<Arc<SocialService<S>>>,
  Path(post_id): Path<Uuid>,
) -> Result<Json<Vec<Comment>>, ApiError> {
  Ok(Json(service.list_comments(post_id).await?))
}

/// `POST /posts/:id/comments`
pub async fn create<S: SocialStore>(
  State(service): State<Arc<SocialService<S>>>,
  caller: Caller,
  Path(post_id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let comment = service
    .create_comment(NewComment {
      post_id,
      author: caller.0,
      content: body.content,
      parent_id: body.parent_id,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(comment)))
}

/// `POST /comments/:id/likes`
pub async fn like<S: SocialStore>(
  State(service): State<Arc<SocialService<S>>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Comment>, ApiError> {
  Ok(Json(service.like_comment(caller.0, id).await?))
}

/// `DELETE /comments/:id/likes`
pub async fn unlike<S: SocialStore>(
  State(service): State<Arc<SocialService<S>>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Comment>, ApiError> {
  Ok(Json(service.unlike_comment(caller.0, id).await?))
}
