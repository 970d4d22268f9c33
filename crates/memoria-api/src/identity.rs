//! Caller identity extractor.
//!
//! The API trusts an `x-user-id` header carrying the caller's UUID; session
//! management and TLS termination live in front of this service. Handlers
//! that take a [`Caller`] argument reject unidentified requests with 401
//! before any business logic runs.

use axum::{
  extract::FromRequestParts,
  http::{HeaderName, request::Parts},
};
use uuid::Uuid;

use crate::error::ApiError;

pub const USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");

/// The authenticated caller's user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Uuid);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    let value = parts
      .headers
      .get(USER_ID_HEADER)
      .and_then(|v| v.to_str().ok())
      .ok_or(ApiError::Unidentified)?;

    let user_id =
      Uuid::parse_str(value).map_err(|_| ApiError::Unidentified)?;
    Ok(Caller(user_id))
  }
}
