//! Notification records and the fan-out draft type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type tag on a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
  NewPost,
  Like,
  Comment,
  Reply,
}

/// A delivered notification.
///
/// Created only by the fan-out engine. After creation the only permitted
/// transition is `unread -> read` (terminal), scoped to the owning
/// recipient; no normal flow deletes a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
  pub notification_id: Uuid,
  pub recipient:       Uuid,
  pub kind:            NotificationKind,
  pub message:         String,
  pub read:            bool,
  pub created_at:      DateTime<Utc>,
}

/// One planned fan-out write — input to
/// [`crate::store::SocialStore::push_notification`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
  pub recipient: Uuid,
  pub kind:      NotificationKind,
  pub message:   String,
}
