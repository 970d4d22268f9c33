//! Posts ("memories") and comments, with their input and patch types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Posts ───────────────────────────────────────────────────────────────────

/// A published memory. Owned exclusively by its author; only the author may
/// mutate or delete it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
  pub post_id:         Uuid,
  pub author:          Uuid,
  pub title:           String,
  pub content:         String,
  pub image_name:      Option<String>,
  /// Position of the memory on the author's timeline, if placed.
  pub memory_timeline: Option<i64>,
  pub bgm:             Option<String>,
  /// Denormalised count of live like rows; moves in lockstep with them and
  /// never goes negative.
  pub likes:           i64,
  pub created_at:      DateTime<Utc>,
}

/// Input to [`crate::store::SocialStore::create_post`].
/// The id, like counter, and timestamp are set by the store.
#[derive(Debug, Clone)]
pub struct NewPost {
  pub author:          Uuid,
  pub title:           String,
  pub content:         String,
  pub image_name:      Option<String>,
  pub memory_timeline: Option<i64>,
  pub bgm:             Option<String>,
}

/// Partial update for a post.
///
/// A `Some` field replaces the stored value — including with an empty
/// string; `None` retains it. Presence is the only signal, so legitimate
/// empty values are never discarded. Last write wins per field; this is not
/// a diff/patch protocol.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostPatch {
  pub title:           Option<String>,
  pub content:         Option<String>,
  pub image_name:      Option<String>,
  pub memory_timeline: Option<i64>,
  pub bgm:             Option<String>,
}

impl PostPatch {
  /// Replace each present field on `post`, leaving absent fields untouched.
  pub fn apply(self, post: &mut Post) {
    if let Some(title) = self.title {
      post.title = title;
    }
    if let Some(content) = self.content {
      post.content = content;
    }
    if let Some(image_name) = self.image_name {
      post.image_name = Some(image_name);
    }
    if let Some(memory_timeline) = self.memory_timeline {
      post.memory_timeline = Some(memory_timeline);
    }
    if let Some(bgm) = self.bgm {
      post.bgm = Some(bgm);
    }
  }
}

// ─── Comments ────────────────────────────────────────────────────────────────

/// A comment on a post. A set `parent_id` marks a threaded reply; the data
/// model permits arbitrary depth even though the product only nests one
/// level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: Uuid,
  pub post_id:    Uuid,
  pub author:     Uuid,
  pub content:    String,
  pub parent_id:  Option<Uuid>,
  pub likes:      i64,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::SocialStore::create_comment`].
#[derive(Debug, Clone)]
pub struct NewComment {
  pub post_id:   Uuid,
  pub author:    Uuid,
  pub content:   String,
  pub parent_id: Option<Uuid>,
}
