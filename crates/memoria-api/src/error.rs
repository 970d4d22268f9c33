//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Core errors carry their own taxonomy; the mapping to HTTP status codes
//! lives here and nowhere else. Upstream failures are logged with their
//! full chain and surfaced as an opaque 500.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use memoria_core::ErrorKind;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] memoria_core::Error),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The request carried no usable caller identity.
  #[error("missing or malformed caller identity")]
  Unidentified,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Core(e) => match e.kind() {
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, e.to_string()),
        ErrorKind::Conflict => (StatusCode::CONFLICT, e.to_string()),
        ErrorKind::Forbidden => (StatusCode::FORBIDDEN, e.to_string()),
        ErrorKind::InvalidInput => (StatusCode::BAD_REQUEST, e.to_string()),
        ErrorKind::Upstream => {
          tracing::error!(error = %e, "request failed upstream");
          (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal error".to_string(),
          )
        }
      },
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unidentified => (StatusCode::UNAUTHORIZED, self.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use axum::{http::StatusCode, response::IntoResponse};
  use memoria_core::Error;
  use uuid::Uuid;

  use super::ApiError;

  fn status(err: ApiError) -> StatusCode {
    err.into_response().status()
  }

  #[test]
  fn core_kinds_map_to_http_statuses() {
    assert_eq!(
      status(Error::PostNotFound(Uuid::new_v4()).into()),
      StatusCode::NOT_FOUND
    );
    assert_eq!(status(Error::EmailTaken.into()), StatusCode::CONFLICT);
    assert_eq!(
      status(Error::ViewDenied(Uuid::new_v4()).into()),
      StatusCode::FORBIDDEN
    );
    assert_eq!(status(Error::MissingPassword.into()), StatusCode::BAD_REQUEST);
    assert_eq!(
      status(Error::Store("boom".into()).into()),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn unidentified_is_unauthorized() {
    assert_eq!(status(ApiError::Unidentified), StatusCode::UNAUTHORIZED);
  }
}
