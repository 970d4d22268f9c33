//! User accounts and their public projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account.
///
/// The identifier is immutable once created; the credential hash may be
/// rotated. `password_hash` is an argon2 PHC string and is never serialised
/// outward — boundary layers expose [`Profile`] instead.
#[derive(Debug, Clone, Serialize)]
pub struct User {
  pub user_id:    Uuid,
  pub name:       String,
  pub email:      String,
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub created_at: DateTime<Utc>,
}

impl User {
  /// The public projection exposed to other users.
  pub fn profile(&self) -> Profile {
    Profile {
      user_id: self.user_id,
      name:    self.name.clone(),
      email:   self.email.clone(),
    }
  }
}

/// Public profile fields only — never credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub user_id: Uuid,
  pub name:    String,
  pub email:   String,
}

/// Input to [`crate::store::SocialStore::create_user`].
/// The id and `created_at` timestamp are set by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
}
