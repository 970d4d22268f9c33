//! Handlers for `/notifications` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/notifications` | The caller's inbox, newest first |
//! | `POST` | `/notifications/:id/read` | Recipient only; idempotent |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use memoria_core::{
  notification::Notification,
  service::SocialService,
  store::SocialStore,
};
use uuid::Uuid;

use crate::{error::ApiError, identity::Caller};

/// `GET /notifications`
pub async fn list<S: SocialStore>(
  State(service): State<Arc<SocialService<S>>>,
  caller: Caller,
) -> Result<Json<Vec<Notification>>, ApiError> {
  Ok(Json(service.notifications(caller.0).await?))
}

/// `POST /notifications/:id/read`
pub async fn mark_read<S: SocialStore>(
  State(service): State<Arc<SocialService<S>>>,
  caller: Caller,
  Path(id): Path<Uuid>,
) -> Result<Json<Notification>, ApiError> {
  Ok(Json(service.mark_notification_read(caller.0, id).await?))
}
