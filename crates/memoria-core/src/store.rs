//! The [`SocialStore`] trait — the persistence boundary of the core.
//!
//! The trait is implemented by storage backends (e.g.
//! `memoria-store-sqlite`). The gate, fan-out engine, and service layer
//! depend on this abstraction, not on any concrete backend.
//!
//! Methods return the core [`Error`](crate::Error) taxonomy directly:
//! backends report the uniqueness invariants (likes, edges, email) as the
//! matching conflict variants and wrap their internal failures in
//! [`Error::Store`](crate::Error::Store), so every layer above classifies
//! failures the same way.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  Result,
  content::{Comment, NewComment, NewPost, Post, PostPatch},
  notification::{Notification, NotificationDraft},
  relationship::Subscription,
  user::{NewUser, Profile, User},
};

pub trait SocialStore: Send + Sync {
  // ── Users ─────────────────────────────────────────────────────────────

  /// Create and persist a new account. Fails with
  /// [`Error::EmailTaken`](crate::Error::EmailTaken) if the email is
  /// already registered.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>>> + Send + '_;

  /// Look up a user by email — the login path.
  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>>> + Send + 'a;

  // ── Posts ─────────────────────────────────────────────────────────────

  fn create_post(
    &self,
    input: NewPost,
  ) -> impl Future<Output = Result<Post>> + Send + '_;

  fn get_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Post>>> + Send + '_;

  /// Apply a field-presence patch and return the updated post.
  /// Ownership is the service layer's concern, not the store's.
  fn update_post(
    &self,
    id: Uuid,
    patch: PostPatch,
  ) -> impl Future<Output = Result<Post>> + Send + '_;

  /// Delete a post and its dependent rows (comments, likes).
  fn delete_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  fn create_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Comment>> + Send + '_;

  fn get_comment(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Comment>>> + Send + '_;

  /// All comments on a post, oldest first.
  fn list_comments(
    &self,
    post_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Comment>>> + Send + '_;

  // ── Likes ─────────────────────────────────────────────────────────────

  /// Record a like and increment the post's counter as one transaction.
  /// Fails with [`Error::AlreadyLiked`](crate::Error::AlreadyLiked) if the
  /// `(actor, post)` pair already holds a like. Returns the updated post.
  fn like_post(
    &self,
    post_id: Uuid,
    actor: Uuid,
  ) -> impl Future<Output = Result<Post>> + Send + '_;

  /// Comment counterpart of [`SocialStore::like_post`].
  fn like_comment(
    &self,
    comment_id: Uuid,
    actor: Uuid,
  ) -> impl Future<Output = Result<Comment>> + Send + '_;

  /// Remove an existing like and decrement the counter as one transaction.
  /// Fails with [`Error::LikeNotFound`](crate::Error::LikeNotFound) if the
  /// pair holds no like. Comments only — posts have no unlike.
  fn unlike_comment(
    &self,
    comment_id: Uuid,
    actor: Uuid,
  ) -> impl Future<Output = Result<Comment>> + Send + '_;

  // ── Subscriptions ─────────────────────────────────────────────────────

  /// Create a follows edge. Fails with
  /// [`Error::AlreadySubscribed`](crate::Error::AlreadySubscribed) if the
  /// pair already exists.
  fn subscribe(
    &self,
    follower: Uuid,
    followee: Uuid,
  ) -> impl Future<Output = Result<Subscription>> + Send + '_;

  /// Remove exactly one edge; fails with
  /// [`Error::NotSubscribed`](crate::Error::NotSubscribed) if none matches.
  fn unsubscribe(
    &self,
    follower: Uuid,
    followee: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Whether the edge `(follower, followee)` exists — the Access Gate's
  /// only lookup.
  fn edge_exists(
    &self,
    follower: Uuid,
    followee: Uuid,
  ) -> impl Future<Output = Result<bool>> + Send + '_;

  /// Everyone following `followee`, resolved to public profiles.
  fn subscribers(
    &self,
    followee: Uuid,
  ) -> impl Future<Output = Result<Vec<Profile>>> + Send + '_;

  // ── Notifications ─────────────────────────────────────────────────────

  /// Persist one fan-out draft as an unread notification.
  fn push_notification(
    &self,
    draft: NotificationDraft,
  ) -> impl Future<Output = Result<Notification>> + Send + '_;

  /// All notifications for a recipient, newest first.
  fn list_notifications(
    &self,
    recipient: Uuid,
  ) -> impl Future<Output = Result<Vec<Notification>>> + Send + '_;

  fn get_notification(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Notification>>> + Send + '_;

  /// Flip the read flag to `true`. Idempotent; recipient scoping is the
  /// service layer's concern.
  fn mark_notification_read(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Notification>> + Send + '_;
}
