//! The Notification Fan-out Engine.
//!
//! For every qualifying write event the engine produces exactly one
//! notification per distinct recipient, and never notifies the actor about
//! their own action. Fan-out runs in two explicit phases:
//!
//! 1. [`FanoutEngine::plan`] reads the store and renders one
//!    [`NotificationDraft`] per recipient — an explicit task list, built
//!    after the triggering write has committed.
//! 2. [`FanoutEngine::dispatch`] writes each draft independently. A
//!    recipient's failure is logged and skipped; it never rolls back the
//!    triggering write and never blocks the remaining recipients.
//!
//! The "new post" event is the unbounded case: one write per follower of
//! the author, proportional to follower count.

use std::{collections::HashSet, sync::Arc};

use uuid::Uuid;

use crate::{
  Result,
  notification::{NotificationDraft, NotificationKind},
  store::SocialStore,
};

// ─── Events ──────────────────────────────────────────────────────────────────

/// A qualifying write event, emitted by the service layer after the
/// corresponding store write has committed. Events carry the already
/// resolved owner ids so planning needs no second content lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
  /// `author` published a new post; fans out to every follower of `author`.
  PostPublished { author: Uuid },
  /// `actor` liked the post owned by `post_author`.
  PostLiked { post_author: Uuid, actor: Uuid },
  /// `actor` liked the comment written by `comment_author`.
  CommentLiked { comment_author: Uuid, actor: Uuid },
  /// `author` left a top-level comment on the post owned by `post_author`.
  CommentPosted { post_author: Uuid, author: Uuid },
  /// `author` replied to the comment written by `parent_author`.
  ReplyPosted { parent_author: Uuid, author: Uuid },
}

impl Event {
  /// The user whose action triggered the event — never a recipient.
  pub fn actor(&self) -> Uuid {
    match *self {
      Self::PostPublished { author } => author,
      Self::PostLiked { actor, .. } => actor,
      Self::CommentLiked { actor, .. } => actor,
      Self::CommentPosted { author, .. } => author,
      Self::ReplyPosted { author, .. } => author,
    }
  }

  /// The type tag stamped on every notification for this event.
  pub fn kind(&self) -> NotificationKind {
    match self {
      Self::PostPublished { .. } => NotificationKind::NewPost,
      Self::PostLiked { .. } | Self::CommentLiked { .. } => {
        NotificationKind::Like
      }
      Self::CommentPosted { .. } => NotificationKind::Comment,
      Self::ReplyPosted { .. } => NotificationKind::Reply,
    }
  }
}

/// Human-readable message for `event`, attributed to `actor_name`.
fn render_message(event: &Event, actor_name: &str) -> String {
  match event {
    Event::PostPublished { .. } => {
      format!("{actor_name} published a new post.")
    }
    Event::PostLiked { .. } => format!("{actor_name} liked your post."),
    Event::CommentLiked { .. } => format!("{actor_name} liked your comment."),
    Event::CommentPosted { .. } => {
      format!("{actor_name} commented on your post.")
    }
    Event::ReplyPosted { .. } => format!("{actor_name} replied to your comment."),
  }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

pub struct FanoutEngine<S> {
  store: Arc<S>,
}

impl<S: SocialStore> FanoutEngine<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store }
  }

  /// Compute the recipient set for `event` and render one draft per
  /// distinct recipient. Reads only; nothing is written.
  pub async fn plan(&self, event: Event) -> Result<Vec<NotificationDraft>> {
    let actor = event.actor();

    // A vanished actor must not sink the fan-out; fall back to the raw id.
    let actor_name = match self.store.get_user(actor).await? {
      Some(user) => user.name,
      None => actor.to_string(),
    };
    let message = render_message(&event, &actor_name);

    let recipients: Vec<Uuid> = match event {
      Event::PostPublished { author } => self
        .store
        .subscribers(author)
        .await?
        .into_iter()
        .map(|profile| profile.user_id)
        .collect(),
      Event::PostLiked { post_author, .. } => vec![post_author],
      Event::CommentLiked { comment_author, .. } => vec![comment_author],
      Event::CommentPosted { post_author, .. } => vec![post_author],
      Event::ReplyPosted { parent_author, .. } => vec![parent_author],
    };

    let mut seen = HashSet::new();
    Ok(
      recipients
        .into_iter()
        .filter(|recipient| *recipient != actor)
        .filter(|recipient| seen.insert(*recipient))
        .map(|recipient| NotificationDraft {
          recipient,
          kind: event.kind(),
          message: message.clone(),
        })
        .collect(),
    )
  }

  /// Write each draft independently and return the number delivered.
  ///
  /// A failed write is logged at `warn` and skipped; the remaining drafts
  /// still go out.
  pub async fn dispatch(&self, drafts: Vec<NotificationDraft>) -> usize {
    let mut delivered = 0;
    for draft in drafts {
      let recipient = draft.recipient;
      match self.store.push_notification(draft).await {
        Ok(_) => delivered += 1,
        Err(error) => {
          tracing::warn!(%recipient, %error, "dropping one fan-out notification");
        }
      }
    }
    delivered
  }

  /// Plan and dispatch. Best-effort by contract: every failure is logged
  /// and swallowed, so the triggering write's success is never revoked.
  pub async fn notify(&self, event: Event) -> usize {
    match self.plan(event).await {
      Ok(drafts) => self.dispatch(drafts).await,
      Err(error) => {
        tracing::warn!(?event, %error, "failed to plan notification fan-out");
        0
      }
    }
  }
}
