//! Handlers for account endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users` | Register; body: `{"name","email","password"}` |
//! | `POST` | `/sessions` | Login; body: `{"email","password"}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use memoria_core::{
  Error,
  service::SocialService,
  store::SocialStore,
  user::{NewUser, Profile},
};
use serde::Deserialize;

use crate::{auth, error::ApiError};

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub name:     String,
  pub email:    String,
  pub password: String,
}

/// `POST /users`
pub async fn register<S: SocialStore>(
  State(service): State<Arc<SocialService<S>>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError> {
  if body.password.is_empty() {
    return Err(Error::MissingPassword.into());
  }

  let password_hash = auth::hash_password(&body.password)?;
  let user = service
    .register(NewUser {
      name: body.name,
      email: body.email,
      password_hash,
    })
    .await?;

  Ok((StatusCode::CREATED, Json(user.profile())))
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

/// `POST /sessions`
///
/// A failed login never says which half of the credentials was wrong.
pub async fn login<S: SocialStore>(
  State(service): State<Arc<SocialService<S>>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<Profile>, ApiError> {
  let rejected =
    || ApiError::BadRequest("invalid email or password".to_string());

  let user = service
    .find_user_by_email(&body.email)
    .await?
    .ok_or_else(rejected)?;

  if !auth::verify_password(&body.password, &user.password_hash) {
    return Err(rejected());
  }
  Ok(Json(user.profile()))
}
