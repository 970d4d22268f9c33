//! Use-case orchestration over a [`SocialStore`].
//!
//! Every operation follows the same shape: authorise (ownership or the
//! Access Gate), commit the change, then hand the event to the fan-out
//! engine. Fan-out is best-effort — by the time it runs the write has
//! already succeeded, so its failures are logged inside the engine and
//! never surface to the caller.
//!
//! The store handle is injected at construction; there is no ambient
//! global state.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  content::{Comment, NewComment, NewPost, Post, PostPatch},
  fanout::{Event, FanoutEngine},
  gate::AccessGate,
  notification::Notification,
  relationship::Subscription,
  store::SocialStore,
  user::{NewUser, Profile, User},
};

pub struct SocialService<S> {
  store:  Arc<S>,
  gate:   AccessGate<S>,
  fanout: FanoutEngine<S>,
}

impl<S: SocialStore> SocialService<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      gate:   AccessGate::new(Arc::clone(&store)),
      fanout: FanoutEngine::new(Arc::clone(&store)),
      store,
    }
  }

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create an account. Credential hashing is the boundary layer's job;
  /// the service receives the finished hash.
  pub async fn register(&self, input: NewUser) -> Result<User> {
    self.store.create_user(input).await
  }

  pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    self.store.find_user_by_email(email).await
  }

  // ── Posts ─────────────────────────────────────────────────────────────

  pub async fn create_post(&self, input: NewPost) -> Result<Post> {
    if self.store.get_user(input.author).await?.is_none() {
      return Err(Error::InvalidAuthor(input.author));
    }

    let post = self.store.create_post(input).await?;
    self.fanout.notify(Event::PostPublished { author: post.author }).await;
    Ok(post)
  }

  /// Resolve a post for `requester`, applying the Access Gate.
  pub async fn view_post(&self, requester: Uuid, post_id: Uuid) -> Result<Post> {
    let post = self
      .store
      .get_post(post_id)
      .await?
      .ok_or(Error::PostNotFound(post_id))?;

    if !self.gate.can_view(requester, &post).await? {
      return Err(Error::ViewDenied(post_id));
    }
    Ok(post)
  }

  pub async fn update_post(
    &self,
    caller: Uuid,
    post_id: Uuid,
    patch: PostPatch,
  ) -> Result<Post> {
    self.require_owner(caller, post_id).await?;
    self.store.update_post(post_id, patch).await
  }

  pub async fn delete_post(&self, caller: Uuid, post_id: Uuid) -> Result<()> {
    self.require_owner(caller, post_id).await?;
    self.store.delete_post(post_id).await
  }

  /// Not-found outranks forbidden: a caller probing a missing post learns
  /// nothing about ownership.
  async fn require_owner(&self, caller: Uuid, post_id: Uuid) -> Result<()> {
    let post = self
      .store
      .get_post(post_id)
      .await?
      .ok_or(Error::PostNotFound(post_id))?;

    if post.author != caller {
      return Err(Error::NotOwner(post_id));
    }
    Ok(())
  }

  // ── Engagement ────────────────────────────────────────────────────────

  pub async fn like_post(&self, actor: Uuid, post_id: Uuid) -> Result<Post> {
    // Uniqueness check, like row, and counter move as one store
    // transaction; only after that commits does the fan-out run.
    let post = self.store.like_post(post_id, actor).await?;
    self
      .fanout
      .notify(Event::PostLiked { post_author: post.author, actor })
      .await;
    Ok(post)
  }

  pub async fn like_comment(
    &self,
    actor: Uuid,
    comment_id: Uuid,
  ) -> Result<Comment> {
    let comment = self.store.like_comment(comment_id, actor).await?;
    self
      .fanout
      .notify(Event::CommentLiked { comment_author: comment.author, actor })
      .await;
    Ok(comment)
  }

  /// Posts have no unlike; the asymmetry is inherited from the product.
  pub async fn unlike_comment(
    &self,
    actor: Uuid,
    comment_id: Uuid,
  ) -> Result<Comment> {
    self.store.unlike_comment(comment_id, actor).await
  }

  // ── Comments ──────────────────────────────────────────────────────────

  pub async fn create_comment(&self, input: NewComment) -> Result<Comment> {
    let post = self
      .store
      .get_post(input.post_id)
      .await?
      .ok_or(Error::PostNotFound(input.post_id))?;

    if self.store.get_user(input.author).await?.is_none() {
      return Err(Error::UserNotFound(input.author));
    }

    // A reply redirects the notification to the parent comment's author.
    let parent_author = match input.parent_id {
      Some(parent_id) => {
        let parent = self
          .store
          .get_comment(parent_id)
          .await?
          .ok_or(Error::CommentNotFound(parent_id))?;
        Some(parent.author)
      }
      None => None,
    };

    let comment = self.store.create_comment(input).await?;

    let event = match parent_author {
      Some(parent_author) => {
        Event::ReplyPosted { parent_author, author: comment.author }
      }
      None => {
        Event::CommentPosted { post_author: post.author, author: comment.author }
      }
    };
    self.fanout.notify(event).await;

    Ok(comment)
  }

  pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
    self.store.list_comments(post_id).await
  }

  // ── Subscriptions ─────────────────────────────────────────────────────

  pub async fn subscribe(
    &self,
    follower: Uuid,
    followee: Uuid,
  ) -> Result<Subscription> {
    for user_id in [follower, followee] {
      if self.store.get_user(user_id).await?.is_none() {
        return Err(Error::UserNotFound(user_id));
      }
    }
    self.store.subscribe(follower, followee).await
  }

  pub async fn unsubscribe(&self, follower: Uuid, followee: Uuid) -> Result<()> {
    self.store.unsubscribe(follower, followee).await
  }

  pub async fn subscribers(&self, followee: Uuid) -> Result<Vec<Profile>> {
    self.store.subscribers(followee).await
  }

  // ── Notifications ─────────────────────────────────────────────────────

  /// All notifications for `recipient`, newest first.
  pub async fn notifications(&self, recipient: Uuid) -> Result<Vec<Notification>> {
    self.store.list_notifications(recipient).await
  }

  /// `unread -> read`, scoped to the owning recipient and idempotent.
  pub async fn mark_notification_read(
    &self,
    caller: Uuid,
    notification_id: Uuid,
  ) -> Result<Notification> {
    let notification = self
      .store
      .get_notification(notification_id)
      .await?
      .ok_or(Error::NotificationNotFound(notification_id))?;

    if notification.recipient != caller {
      return Err(Error::NotRecipient(notification_id));
    }
    self.store.mark_notification_read(notification_id).await
  }
}
