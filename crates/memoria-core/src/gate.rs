//! The Access Gate — the visibility decision for posts.
//!
//! Visibility is granted when the requester is the post's author, or when
//! the *author* subscribes to the requester (an edge with
//! follower = author, following = requester). Note the direction: following
//! an author grants them nothing; being followed by the author is what
//! opens their posts to you.

use std::sync::Arc;

use uuid::Uuid;

use crate::{Result, content::Post, store::SocialStore};

pub struct AccessGate<S> {
  store: Arc<S>,
}

impl<S: SocialStore> AccessGate<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store }
  }

  /// Decide whether `requester` may view `post`.
  ///
  /// Pure decision over at most one edge lookup; no side effects. The
  /// caller resolves the post first, so not-found and malformed-id
  /// signalling stay out of the gate.
  pub async fn can_view(&self, requester: Uuid, post: &Post) -> Result<bool> {
    if requester == post.author {
      return Ok(true);
    }
    // Edge direction: the post author must follow the requester.
    self.store.edge_exists(post.author, requester).await
  }
}
