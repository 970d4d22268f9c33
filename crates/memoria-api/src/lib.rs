//! JSON REST API for Memoria.
//!
//! Exposes an axum [`Router`] over a [`SocialService`] backed by any
//! [`memoria_core::store::SocialStore`]. Session management, TLS, and
//! transport concerns are the caller's responsibility; handlers identify
//! the caller from the `x-user-id` header (see [`identity`]).
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", memoria_api::api_router(service.clone()))
//! ```

pub mod auth;
pub mod comments;
pub mod error;
pub mod identity;
pub mod notifications;
pub mod posts;
pub mod subscriptions;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use memoria_core::{service::SocialService, store::SocialStore};

pub use error::ApiError;
pub use identity::Caller;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<SocialService<S>>) -> Router<()>
where
  S: SocialStore + 'static,
{
  Router::new()
    // Accounts
    .route("/users", post(users::register::<S>))
    .route("/sessions", post(users::login::<S>))
    // Subscriptions
    .route(
      "/users/{id}/subscribers",
      get(subscriptions::list::<S>)
        .post(subscriptions::create::<S>)
        .delete(subscriptions::delete::<S>),
    )
    // Posts
    .route("/posts", post(posts::create::<S>))
    .route(
      "/posts/{id}",
      get(posts::get_one::<S>)
        .put(posts::update::<S>)
        .delete(posts::delete::<S>),
    )
    .route("/posts/{id}/likes", post(posts::like::<S>))
    // Comments
    .route(
      "/posts/{id}/comments",
      get(comments::list::<S>).post(comments::create::<S>),
    )
    .route(
      "/comments/{id}/likes",
      post(comments::like::<S>).delete(comments::unlike::<S>),
    )
    // Notifications
    .route("/notifications", get(notifications::list::<S>))
    .route("/notifications/{id}/read", post(notifications::mark_read::<S>))
    .with_state(service)
}
