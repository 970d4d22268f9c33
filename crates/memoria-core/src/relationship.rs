//! Directed "follows" edges between users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A subscription edge: `follower` follows `followee`.
///
/// The pair is unique — re-subscribing is a conflict and unsubscribing
/// removes exactly one edge. Nothing rejects a self-edge; see DESIGN.md.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
  pub follower:   Uuid,
  pub followee:   Uuid,
  pub created_at: DateTime<Utc>,
}
