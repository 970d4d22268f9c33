//! Error types for `memoria-core`.
//!
//! Boundary layers never match on individual variants; they call
//! [`Error::kind`] and map the classification to their own vocabulary
//! (e.g. HTTP status codes). The core stays free of transport concerns.

use thiserror::Error;
use uuid::Uuid;

/// Failure classification consumed by boundary layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// A referenced entity does not exist.
  NotFound,
  /// A uniqueness invariant was violated (duplicate like, edge, or email).
  Conflict,
  /// The caller is not allowed to perform the operation.
  Forbidden,
  /// The request itself is malformed or incomplete.
  InvalidInput,
  /// The persistence layer failed; logged internally, surfaced generically.
  Upstream,
}

#[derive(Debug, Error)]
pub enum Error {
  // ── Not found ─────────────────────────────────────────────────────────
  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("post not found: {0}")]
  PostNotFound(Uuid),

  #[error("comment not found: {0}")]
  CommentNotFound(Uuid),

  #[error("notification not found: {0}")]
  NotificationNotFound(Uuid),

  #[error("{follower} is not subscribed to {followee}")]
  NotSubscribed { follower: Uuid, followee: Uuid },

  #[error("like not found")]
  LikeNotFound,

  // ── Conflicts ─────────────────────────────────────────────────────────
  #[error("already liked")]
  AlreadyLiked,

  #[error("already subscribed")]
  AlreadySubscribed,

  #[error("email already registered")]
  EmailTaken,

  // ── Authorization ─────────────────────────────────────────────────────
  /// The Access Gate denied a view of the post.
  #[error("not allowed to view post {0}")]
  ViewDenied(Uuid),

  #[error("not the owner of {0}")]
  NotOwner(Uuid),

  #[error("not the recipient of notification {0}")]
  NotRecipient(Uuid),

  // ── Input ─────────────────────────────────────────────────────────────
  #[error("invalid author: {0}")]
  InvalidAuthor(Uuid),

  #[error("password is required")]
  MissingPassword,

  // ── Persistence ───────────────────────────────────────────────────────
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::UserNotFound(_)
      | Self::PostNotFound(_)
      | Self::CommentNotFound(_)
      | Self::NotificationNotFound(_)
      | Self::NotSubscribed { .. }
      | Self::LikeNotFound => ErrorKind::NotFound,

      Self::AlreadyLiked | Self::AlreadySubscribed | Self::EmailTaken => {
        ErrorKind::Conflict
      }

      Self::ViewDenied(_) | Self::NotOwner(_) | Self::NotRecipient(_) => {
        ErrorKind::Forbidden
      }

      Self::InvalidAuthor(_) | Self::MissingPassword => ErrorKind::InvalidInput,

      Self::Store(_) => ErrorKind::Upstream,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
