//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Notification kinds are stored as the same
//! snake_case tags serde uses.

use chrono::{DateTime, Utc};
use memoria_core::{
  content::{Comment, Post},
  notification::{Notification, NotificationKind},
  user::{Profile, User},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NotificationKind ────────────────────────────────────────────────────────

pub fn encode_kind(kind: NotificationKind) -> &'static str {
  match kind {
    NotificationKind::NewPost => "new_post",
    NotificationKind::Like => "like",
    NotificationKind::Comment => "comment",
    NotificationKind::Reply => "reply",
  }
}

pub fn decode_kind(s: &str) -> Result<NotificationKind> {
  match s {
    "new_post" => Ok(NotificationKind::NewPost),
    "like" => Ok(NotificationKind::Like),
    "comment" => Ok(NotificationKind::Comment),
    "reply" => Ok(NotificationKind::Reply),
    other => Err(Error::UnknownKind(other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      name:          self.name,
      email:         self.email,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Public columns of a `users` row, as returned by subscriber listings.
pub struct RawProfile {
  pub user_id: String,
  pub name:    String,
  pub email:   String,
}

impl RawProfile {
  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      user_id: decode_uuid(&self.user_id)?,
      name:    self.name,
      email:   self.email,
    })
  }
}

/// Raw strings read directly from a `posts` row.
pub struct RawPost {
  pub post_id:         String,
  pub author:          String,
  pub title:           String,
  pub content:         String,
  pub image_name:      Option<String>,
  pub memory_timeline: Option<i64>,
  pub bgm:             Option<String>,
  pub likes:           i64,
  pub created_at:      String,
}

impl RawPost {
  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      post_id:         decode_uuid(&self.post_id)?,
      author:          decode_uuid(&self.author)?,
      title:           self.title,
      content:         self.content,
      image_name:      self.image_name,
      memory_timeline: self.memory_timeline,
      bgm:             self.bgm,
      likes:           self.likes,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `comments` row.
pub struct RawComment {
  pub comment_id: String,
  pub post_id:    String,
  pub author:     String,
  pub content:    String,
  pub parent_id:  Option<String>,
  pub likes:      i64,
  pub created_at: String,
}

impl RawComment {
  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id: decode_uuid(&self.comment_id)?,
      post_id:    decode_uuid(&self.post_id)?,
      author:     decode_uuid(&self.author)?,
      content:    self.content,
      parent_id:  self.parent_id.as_deref().map(decode_uuid).transpose()?,
      likes:      self.likes,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `notifications` row.
pub struct RawNotification {
  pub notification_id: String,
  pub recipient:       String,
  pub kind:            String,
  pub message:         String,
  pub is_read:         bool,
  pub created_at:      String,
}

impl RawNotification {
  pub fn into_notification(self) -> Result<Notification> {
    Ok(Notification {
      notification_id: decode_uuid(&self.notification_id)?,
      recipient:       decode_uuid(&self.recipient)?,
      kind:            decode_kind(&self.kind)?,
      message:         self.message,
      read:            self.is_read,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}
