//! [`SqliteStore`] — the SQLite implementation of
//! [`SocialStore`](memoria_core::store::SocialStore).
//!
//! Conflict-sensitive operations (likes, edges, registration) run their
//! existence check and write inside one transaction, so two concurrent
//! callers cannot both pass the check, and the denormalised like counters
//! can never drift from the live like rows.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use memoria_core::{
  Error as CoreError, Result as CoreResult,
  content::{Comment, NewComment, NewPost, Post, PostPatch},
  notification::{Notification, NotificationDraft},
  relationship::Subscription,
  store::SocialStore,
  user::{NewUser, Profile, User},
};

use crate::{
  encode::{
    RawComment, RawNotification, RawPost, RawProfile, RawUser, encode_dt,
    encode_kind, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Row helpers ─────────────────────────────────────────────────────────────
//
// Plain functions so they can be used inside `conn.call` closures and
// against transactions alike.

fn user_row(
  conn: &rusqlite::Connection,
  id_str: &str,
) -> rusqlite::Result<Option<RawUser>> {
  conn
    .query_row(
      "SELECT user_id, name, email, password_hash, created_at
       FROM users WHERE user_id = ?1",
      rusqlite::params![id_str],
      |row| {
        Ok(RawUser {
          user_id:       row.get(0)?,
          name:          row.get(1)?,
          email:         row.get(2)?,
          password_hash: row.get(3)?,
          created_at:    row.get(4)?,
        })
      },
    )
    .optional()
}

fn post_row(
  conn: &rusqlite::Connection,
  id_str: &str,
) -> rusqlite::Result<Option<RawPost>> {
  conn
    .query_row(
      "SELECT post_id, author, title, content, image_name, memory_timeline,
              bgm, likes, created_at
       FROM posts WHERE post_id = ?1",
      rusqlite::params![id_str],
      |row| {
        Ok(RawPost {
          post_id:         row.get(0)?,
          author:          row.get(1)?,
          title:           row.get(2)?,
          content:         row.get(3)?,
          image_name:      row.get(4)?,
          memory_timeline: row.get(5)?,
          bgm:             row.get(6)?,
          likes:           row.get(7)?,
          created_at:      row.get(8)?,
        })
      },
    )
    .optional()
}

fn comment_row(
  conn: &rusqlite::Connection,
  id_str: &str,
) -> rusqlite::Result<Option<RawComment>> {
  conn
    .query_row(
      "SELECT comment_id, post_id, author, content, parent_id, likes, created_at
       FROM comments WHERE comment_id = ?1",
      rusqlite::params![id_str],
      |row| {
        Ok(RawComment {
          comment_id: row.get(0)?,
          post_id:    row.get(1)?,
          author:     row.get(2)?,
          content:    row.get(3)?,
          parent_id:  row.get(4)?,
          likes:      row.get(5)?,
          created_at: row.get(6)?,
        })
      },
    )
    .optional()
}

fn notification_row(
  conn: &rusqlite::Connection,
  id_str: &str,
) -> rusqlite::Result<Option<RawNotification>> {
  conn
    .query_row(
      "SELECT notification_id, recipient, kind, message, is_read, created_at
       FROM notifications WHERE notification_id = ?1",
      rusqlite::params![id_str],
      |row| {
        Ok(RawNotification {
          notification_id: row.get(0)?,
          recipient:       row.get(1)?,
          kind:            row.get(2)?,
          message:         row.get(3)?,
          is_read:         row.get(4)?,
          created_at:      row.get(5)?,
        })
      },
    )
    .optional()
}

fn row_exists(
  conn: &rusqlite::Connection,
  sql: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(sql, params, |_| Ok(true))
      .optional()?
      .unwrap_or(false),
  )
}

/// Outcome of a checked transactional write, lifted out of the `conn.call`
/// closure so the conflict/not-found decision is made with core errors.
enum Checked<R> {
  Missing,
  Conflict,
  Applied(R),
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Memoria social store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> crate::Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> crate::Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> crate::Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` on the connection thread, converting the transport error into
  /// this crate's error type.
  async fn call<F, R>(&self, f: F) -> crate::Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R>
      + Send
      + 'static,
    R: Send + 'static,
  {
    Ok(self.conn.call(f).await?)
  }
}

// ─── SocialStore impl ────────────────────────────────────────────────────────

impl SocialStore for SqliteStore {
  // ── Users ─────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> CoreResult<User> {
    let user = User {
      user_id:       Uuid::new_v4(),
      name:          input.name,
      email:         input.email,
      password_hash: input.password_hash,
      created_at:    Utc::now(),
    };

    let id_str   = encode_uuid(user.user_id);
    let at_str   = encode_dt(user.created_at);
    let name     = user.name.clone();
    let email    = user.email.clone();
    let hash     = user.password_hash.clone();

    let outcome = self
      .call(move |conn| {
        let tx = conn.transaction()?;
        if row_exists(
          &tx,
          "SELECT 1 FROM users WHERE email = ?1",
          rusqlite::params![email],
        )? {
          return Ok(Checked::Conflict);
        }
        tx.execute(
          "INSERT INTO users (user_id, name, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, email, hash, at_str],
        )?;
        tx.commit()?;
        Ok(Checked::Applied(()))
      })
      .await?;

    match outcome {
      Checked::Conflict => Err(CoreError::EmailTaken),
      _ => Ok(user),
    }
  }

  async fn get_user(&self, id: Uuid) -> CoreResult<Option<User>> {
    let id_str = encode_uuid(id);
    let raw = self.call(move |conn| Ok(user_row(conn, &id_str)?)).await?;
    Ok(raw.map(RawUser::into_user).transpose()?)
  }

  async fn find_user_by_email(&self, email: &str) -> CoreResult<Option<User>> {
    let email = email.to_owned();
    let raw: Option<RawUser> = self
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, name, email, password_hash, created_at
               FROM users WHERE email = ?1",
              rusqlite::params![email],
              |row| {
                Ok(RawUser {
                  user_id:       row.get(0)?,
                  name:          row.get(1)?,
                  email:         row.get(2)?,
                  password_hash: row.get(3)?,
                  created_at:    row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    Ok(raw.map(RawUser::into_user).transpose()?)
  }

  // ── Posts ─────────────────────────────────────────────────────────────

  async fn create_post(&self, input: NewPost) -> CoreResult<Post> {
    let post = Post {
      post_id:         Uuid::new_v4(),
      author:          input.author,
      title:           input.title,
      content:         input.content,
      image_name:      input.image_name,
      memory_timeline: input.memory_timeline,
      bgm:             input.bgm,
      likes:           0,
      created_at:      Utc::now(),
    };

    let id_str     = encode_uuid(post.post_id);
    let author_str = encode_uuid(post.author);
    let at_str     = encode_dt(post.created_at);
    let title      = post.title.clone();
    let content    = post.content.clone();
    let image_name = post.image_name.clone();
    let timeline   = post.memory_timeline;
    let bgm        = post.bgm.clone();

    self
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (
             post_id, author, title, content, image_name, memory_timeline,
             bgm, likes, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8)",
          rusqlite::params![
            id_str, author_str, title, content, image_name, timeline, bgm,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(post)
  }

  async fn get_post(&self, id: Uuid) -> CoreResult<Option<Post>> {
    let id_str = encode_uuid(id);
    let raw = self.call(move |conn| Ok(post_row(conn, &id_str)?)).await?;
    Ok(raw.map(RawPost::into_post).transpose()?)
  }

  async fn update_post(&self, id: Uuid, patch: PostPatch) -> CoreResult<Post> {
    let id_str = encode_uuid(id);

    // COALESCE realises the presence semantics: a NULL parameter (absent
    // field) keeps the stored value, anything else — an empty string
    // included — replaces it.
    let raw: Option<RawPost> = self
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE posts SET
             title           = COALESCE(?2, title),
             content         = COALESCE(?3, content),
             image_name      = COALESCE(?4, image_name),
             memory_timeline = COALESCE(?5, memory_timeline),
             bgm             = COALESCE(?6, bgm)
           WHERE post_id = ?1",
          rusqlite::params![
            id_str,
            patch.title,
            patch.content,
            patch.image_name,
            patch.memory_timeline,
            patch.bgm,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let raw = post_row(&tx, &id_str)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    match raw {
      Some(raw) => Ok(raw.into_post()?),
      None => Err(CoreError::PostNotFound(id)),
    }
  }

  async fn delete_post(&self, id: Uuid) -> CoreResult<()> {
    let id_str = encode_uuid(id);
    let deleted = self
      .call(move |conn| {
        // Dependent comments and like rows go with the post (ON DELETE
        // CASCADE).
        Ok(conn.execute(
          "DELETE FROM posts WHERE post_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(CoreError::PostNotFound(id));
    }
    Ok(())
  }

  // ── Comments ──────────────────────────────────────────────────────────

  async fn create_comment(&self, input: NewComment) -> CoreResult<Comment> {
    let comment = Comment {
      comment_id: Uuid::new_v4(),
      post_id:    input.post_id,
      author:     input.author,
      content:    input.content,
      parent_id:  input.parent_id,
      likes:      0,
      created_at: Utc::now(),
    };

    let id_str     = encode_uuid(comment.comment_id);
    let post_str   = encode_uuid(comment.post_id);
    let author_str = encode_uuid(comment.author);
    let parent_str = comment.parent_id.map(encode_uuid);
    let at_str     = encode_dt(comment.created_at);
    let content    = comment.content.clone();

    self
      .call(move |conn| {
        conn.execute(
          "INSERT INTO comments (
             comment_id, post_id, author, content, parent_id, likes, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
          rusqlite::params![id_str, post_str, author_str, content, parent_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(comment)
  }

  async fn get_comment(&self, id: Uuid) -> CoreResult<Option<Comment>> {
    let id_str = encode_uuid(id);
    let raw = self.call(move |conn| Ok(comment_row(conn, &id_str)?)).await?;
    Ok(raw.map(RawComment::into_comment).transpose()?)
  }

  async fn list_comments(&self, post_id: Uuid) -> CoreResult<Vec<Comment>> {
    let post_str = encode_uuid(post_id);
    let raws: Vec<RawComment> = self
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT comment_id, post_id, author, content, parent_id, likes, created_at
           FROM comments WHERE post_id = ?1 ORDER BY created_at ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![post_str], |row| {
            Ok(RawComment {
              comment_id: row.get(0)?,
              post_id:    row.get(1)?,
              author:     row.get(2)?,
              content:    row.get(3)?,
              parent_id:  row.get(4)?,
              likes:      row.get(5)?,
              created_at: row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|raw| raw.into_comment().map_err(CoreError::from))
      .collect()
  }

  // ── Likes ─────────────────────────────────────────────────────────────

  async fn like_post(&self, post_id: Uuid, actor: Uuid) -> CoreResult<Post> {
    let post_str  = encode_uuid(post_id);
    let actor_str = encode_uuid(actor);

    let outcome: Checked<RawPost> = self
      .call(move |conn| {
        let tx = conn.transaction()?;
        if post_row(&tx, &post_str)?.is_none() {
          return Ok(Checked::Missing);
        }
        if row_exists(
          &tx,
          "SELECT 1 FROM post_likes WHERE post_id = ?1 AND actor = ?2",
          rusqlite::params![post_str, actor_str],
        )? {
          return Ok(Checked::Conflict);
        }
        tx.execute(
          "INSERT INTO post_likes (post_id, actor) VALUES (?1, ?2)",
          rusqlite::params![post_str, actor_str],
        )?;
        tx.execute(
          "UPDATE posts SET likes = likes + 1 WHERE post_id = ?1",
          rusqlite::params![post_str],
        )?;
        let raw = match post_row(&tx, &post_str)? {
          Some(raw) => raw,
          None => return Ok(Checked::Missing),
        };
        tx.commit()?;
        Ok(Checked::Applied(raw))
      })
      .await?;

    match outcome {
      Checked::Missing => Err(CoreError::PostNotFound(post_id)),
      Checked::Conflict => Err(CoreError::AlreadyLiked),
      Checked::Applied(raw) => Ok(raw.into_post()?),
    }
  }

  async fn like_comment(
    &self,
    comment_id: Uuid,
    actor: Uuid,
  ) -> CoreResult<Comment> {
    let comment_str = encode_uuid(comment_id);
    let actor_str   = encode_uuid(actor);

    let outcome: Checked<RawComment> = self
      .call(move |conn| {
        let tx = conn.transaction()?;
        if comment_row(&tx, &comment_str)?.is_none() {
          return Ok(Checked::Missing);
        }
        if row_exists(
          &tx,
          "SELECT 1 FROM comment_likes WHERE comment_id = ?1 AND actor = ?2",
          rusqlite::params![comment_str, actor_str],
        )? {
          return Ok(Checked::Conflict);
        }
        tx.execute(
          "INSERT INTO comment_likes (comment_id, actor) VALUES (?1, ?2)",
          rusqlite::params![comment_str, actor_str],
        )?;
        tx.execute(
          "UPDATE comments SET likes = likes + 1 WHERE comment_id = ?1",
          rusqlite::params![comment_str],
        )?;
        let raw = match comment_row(&tx, &comment_str)? {
          Some(raw) => raw,
          None => return Ok(Checked::Missing),
        };
        tx.commit()?;
        Ok(Checked::Applied(raw))
      })
      .await?;

    match outcome {
      Checked::Missing => Err(CoreError::CommentNotFound(comment_id)),
      Checked::Conflict => Err(CoreError::AlreadyLiked),
      Checked::Applied(raw) => Ok(raw.into_comment()?),
    }
  }

  async fn unlike_comment(
    &self,
    comment_id: Uuid,
    actor: Uuid,
  ) -> CoreResult<Comment> {
    let comment_str = encode_uuid(comment_id);
    let actor_str   = encode_uuid(actor);

    let outcome: Checked<RawComment> = self
      .call(move |conn| {
        let tx = conn.transaction()?;
        if comment_row(&tx, &comment_str)?.is_none() {
          return Ok(Checked::Missing);
        }
        let removed = tx.execute(
          "DELETE FROM comment_likes WHERE comment_id = ?1 AND actor = ?2",
          rusqlite::params![comment_str, actor_str],
        )?;
        if removed == 0 {
          return Ok(Checked::Conflict);
        }
        tx.execute(
          "UPDATE comments SET likes = likes - 1 WHERE comment_id = ?1",
          rusqlite::params![comment_str],
        )?;
        let raw = match comment_row(&tx, &comment_str)? {
          Some(raw) => raw,
          None => return Ok(Checked::Missing),
        };
        tx.commit()?;
        Ok(Checked::Applied(raw))
      })
      .await?;

    match outcome {
      Checked::Missing => Err(CoreError::CommentNotFound(comment_id)),
      Checked::Conflict => Err(CoreError::LikeNotFound),
      Checked::Applied(raw) => Ok(raw.into_comment()?),
    }
  }

  // ── Subscriptions ─────────────────────────────────────────────────────

  async fn subscribe(
    &self,
    follower: Uuid,
    followee: Uuid,
  ) -> CoreResult<Subscription> {
    let subscription = Subscription {
      follower,
      followee,
      created_at: Utc::now(),
    };

    let follower_str = encode_uuid(follower);
    let followee_str = encode_uuid(followee);
    let at_str       = encode_dt(subscription.created_at);

    let outcome = self
      .call(move |conn| {
        let tx = conn.transaction()?;
        if row_exists(
          &tx,
          "SELECT 1 FROM subscriptions WHERE follower = ?1 AND followee = ?2",
          rusqlite::params![follower_str, followee_str],
        )? {
          return Ok(Checked::Conflict);
        }
        tx.execute(
          "INSERT INTO subscriptions (follower, followee, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![follower_str, followee_str, at_str],
        )?;
        tx.commit()?;
        Ok(Checked::Applied(()))
      })
      .await?;

    match outcome {
      Checked::Conflict => Err(CoreError::AlreadySubscribed),
      _ => Ok(subscription),
    }
  }

  async fn unsubscribe(&self, follower: Uuid, followee: Uuid) -> CoreResult<()> {
    let follower_str = encode_uuid(follower);
    let followee_str = encode_uuid(followee);

    let removed = self
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM subscriptions WHERE follower = ?1 AND followee = ?2",
          rusqlite::params![follower_str, followee_str],
        )?)
      })
      .await?;

    if removed == 0 {
      return Err(CoreError::NotSubscribed { follower, followee });
    }
    Ok(())
  }

  async fn edge_exists(&self, follower: Uuid, followee: Uuid) -> CoreResult<bool> {
    let follower_str = encode_uuid(follower);
    let followee_str = encode_uuid(followee);

    Ok(
      self
        .call(move |conn| {
          Ok(row_exists(
            conn,
            "SELECT 1 FROM subscriptions WHERE follower = ?1 AND followee = ?2",
            rusqlite::params![follower_str, followee_str],
          )?)
        })
        .await?,
    )
  }

  async fn subscribers(&self, followee: Uuid) -> CoreResult<Vec<Profile>> {
    let followee_str = encode_uuid(followee);

    let raws: Vec<RawProfile> = self
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT u.user_id, u.name, u.email
           FROM subscriptions s
           JOIN users u ON u.user_id = s.follower
           WHERE s.followee = ?1
           ORDER BY s.created_at ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![followee_str], |row| {
            Ok(RawProfile {
              user_id: row.get(0)?,
              name:    row.get(1)?,
              email:   row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|raw| raw.into_profile().map_err(CoreError::from))
      .collect()
  }

  // ── Notifications ─────────────────────────────────────────────────────

  async fn push_notification(
    &self,
    draft: NotificationDraft,
  ) -> CoreResult<Notification> {
    let notification = Notification {
      notification_id: Uuid::new_v4(),
      recipient:       draft.recipient,
      kind:            draft.kind,
      message:         draft.message,
      read:            false,
      created_at:      Utc::now(),
    };

    let id_str        = encode_uuid(notification.notification_id);
    let recipient_str = encode_uuid(notification.recipient);
    let kind_str      = encode_kind(notification.kind).to_owned();
    let at_str        = encode_dt(notification.created_at);
    let message       = notification.message.clone();

    self
      .call(move |conn| {
        conn.execute(
          "INSERT INTO notifications (
             notification_id, recipient, kind, message, is_read, created_at
           ) VALUES (?1, ?2, ?3, ?4, 0, ?5)",
          rusqlite::params![id_str, recipient_str, kind_str, message, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(notification)
  }

  async fn list_notifications(
    &self,
    recipient: Uuid,
  ) -> CoreResult<Vec<Notification>> {
    let recipient_str = encode_uuid(recipient);

    let raws: Vec<RawNotification> = self
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT notification_id, recipient, kind, message, is_read, created_at
           FROM notifications WHERE recipient = ?1
           ORDER BY created_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![recipient_str], |row| {
            Ok(RawNotification {
              notification_id: row.get(0)?,
              recipient:       row.get(1)?,
              kind:            row.get(2)?,
              message:         row.get(3)?,
              is_read:         row.get(4)?,
              created_at:      row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|raw| raw.into_notification().map_err(CoreError::from))
      .collect()
  }

  async fn get_notification(&self, id: Uuid) -> CoreResult<Option<Notification>> {
    let id_str = encode_uuid(id);
    let raw = self
      .call(move |conn| Ok(notification_row(conn, &id_str)?))
      .await?;
    Ok(raw.map(RawNotification::into_notification).transpose()?)
  }

  async fn mark_notification_read(&self, id: Uuid) -> CoreResult<Notification> {
    let id_str = encode_uuid(id);

    let raw: Option<RawNotification> = self
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "UPDATE notifications SET is_read = 1 WHERE notification_id = ?1",
          rusqlite::params![id_str],
        )?;
        let raw = notification_row(&tx, &id_str)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    match raw {
      Some(raw) => Ok(raw.into_notification()?),
      None => Err(CoreError::NotificationNotFound(id)),
    }
  }
}
