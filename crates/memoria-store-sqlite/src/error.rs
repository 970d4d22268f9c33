//! Error type for `memoria-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown notification kind: {0:?}")]
  UnknownKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every backend-internal failure surfaces to the core as `Upstream`.
impl From<Error> for memoria_core::Error {
  fn from(e: Error) -> Self {
    memoria_core::Error::Store(Box::new(e))
  }
}
