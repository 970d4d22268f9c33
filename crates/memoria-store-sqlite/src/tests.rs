//! Integration tests for `SqliteStore` against an in-memory database,
//! plus service-level tests that run the access gate and fan-out engine
//! over the real store.

use std::sync::Arc;

use memoria_core::{
  Error, ErrorKind,
  content::{NewComment, NewPost, PostPatch},
  notification::{NotificationDraft, NotificationKind},
  service::SocialService,
  store::SocialStore,
  user::{NewUser, User},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, name: &str, email: &str) -> User {
  s.create_user(NewUser {
    name:          name.into(),
    email:         email.into(),
    password_hash: "$argon2id$stub".into(),
  })
  .await
  .unwrap()
}

fn memory(author: Uuid, title: &str) -> NewPost {
  NewPost {
    author,
    title: title.into(),
    content: "we went to the lake".into(),
    image_name: None,
    memory_timeline: None,
    bgm: None,
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_user() {
  let s = store().await;
  let alice = user(&s, "Alice", "alice@example.com").await;

  let fetched = s.get_user(alice.user_id).await.unwrap().unwrap();
  assert_eq!(fetched.user_id, alice.user_id);
  assert_eq!(fetched.name, "Alice");
  assert_eq!(fetched.email, "alice@example.com");
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
  let s = store().await;
  user(&s, "Alice", "alice@example.com").await;

  let err = s
    .create_user(NewUser {
      name:          "Impostor".into(),
      email:         "alice@example.com".into(),
      password_hash: "$argon2id$stub".into(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EmailTaken));
  assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn find_user_by_email() {
  let s = store().await;
  let alice = user(&s, "Alice", "alice@example.com").await;

  let found = s.find_user_by_email("alice@example.com").await.unwrap();
  assert_eq!(found.unwrap().user_id, alice.user_id);

  let missing = s.find_user_by_email("nobody@example.com").await.unwrap();
  assert!(missing.is_none());
}

// ─── Posts ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_post() {
  let s = store().await;
  let alice = user(&s, "Alice", "alice@example.com").await;

  let post = s.create_post(memory(alice.user_id, "lake day")).await.unwrap();
  assert_eq!(post.likes, 0);

  let fetched = s.get_post(post.post_id).await.unwrap().unwrap();
  assert_eq!(fetched.post_id, post.post_id);
  assert_eq!(fetched.author, alice.user_id);
  assert_eq!(fetched.title, "lake day");
}

#[tokio::test]
async fn update_post_replaces_only_present_fields() {
  let s = store().await;
  let alice = user(&s, "Alice", "alice@example.com").await;
  let post = s
    .create_post(NewPost {
      bgm: Some("waves.mp3".into()),
      ..memory(alice.user_id, "lake day")
    })
    .await
    .unwrap();

  let updated = s
    .update_post(post.post_id, PostPatch {
      title: Some("lake weekend".into()),
      ..PostPatch::default()
    })
    .await
    .unwrap();

  assert_eq!(updated.title, "lake weekend");
  assert_eq!(updated.content, post.content);
  assert_eq!(updated.bgm.as_deref(), Some("waves.mp3"));
}

#[tokio::test]
async fn update_post_accepts_empty_string_values() {
  let s = store().await;
  let alice = user(&s, "Alice", "alice@example.com").await;
  let post = s.create_post(memory(alice.user_id, "lake day")).await.unwrap();

  // An explicitly present empty string is a replacement, not an omission.
  let updated = s
    .update_post(post.post_id, PostPatch {
      content: Some(String::new()),
      ..PostPatch::default()
    })
    .await
    .unwrap();

  assert_eq!(updated.content, "");
  assert_eq!(updated.title, "lake day");
}

#[tokio::test]
async fn update_missing_post_is_not_found() {
  let s = store().await;
  let err = s
    .update_post(Uuid::new_v4(), PostPatch::default())
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn delete_post_removes_its_comments() {
  let s = store().await;
  let alice = user(&s, "Alice", "alice@example.com").await;
  let post = s.create_post(memory(alice.user_id, "lake day")).await.unwrap();
  let comment = s
    .create_comment(NewComment {
      post_id:   post.post_id,
      author:    alice.user_id,
      content:   "good times".into(),
      parent_id: None,
    })
    .await
    .unwrap();

  s.delete_post(post.post_id).await.unwrap();

  assert!(s.get_post(post.post_id).await.unwrap().is_none());
  assert!(s.get_comment(comment.comment_id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_missing_post_is_not_found() {
  let s = store().await;
  let err = s.delete_post(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::PostNotFound(_)));
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_comments_oldest_first() {
  let s = store().await;
  let alice = user(&s, "Alice", "alice@example.com").await;
  let post = s.create_post(memory(alice.user_id, "lake day")).await.unwrap();

  for text in ["first", "second", "third"] {
    s.create_comment(NewComment {
      post_id:   post.post_id,
      author:    alice.user_id,
      content:   text.into(),
      parent_id: None,
    })
    .await
    .unwrap();
  }

  let comments = s.list_comments(post.post_id).await.unwrap();
  let contents: Vec<_> =
    comments.iter().map(|c| c.content.as_str()).collect();
  assert_eq!(contents, ["first", "second", "third"]);
}

#[tokio::test]
async fn reply_keeps_its_parent() {
  let s = store().await;
  let alice = user(&s, "Alice", "alice@example.com").await;
  let post = s.create_post(memory(alice.user_id, "lake day")).await.unwrap();
  let parent = s
    .create_comment(NewComment {
      post_id:   post.post_id,
      author:    alice.user_id,
      content:   "top level".into(),
      parent_id: None,
    })
    .await
    .unwrap();

  let reply = s
    .create_comment(NewComment {
      post_id:   post.post_id,
      author:    alice.user_id,
      content:   "nested".into(),
      parent_id: Some(parent.comment_id),
    })
    .await
    .unwrap();

  let fetched = s.get_comment(reply.comment_id).await.unwrap().unwrap();
  assert_eq!(fetched.parent_id, Some(parent.comment_id));
}

// ─── Likes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn like_post_moves_counter_once() {
  let s = store().await;
  let alice = user(&s, "Alice", "alice@example.com").await;
  let bob = user(&s, "Bob", "bob@example.com").await;
  let post = s.create_post(memory(alice.user_id, "lake day")).await.unwrap();

  let liked = s.like_post(post.post_id, bob.user_id).await.unwrap();
  assert_eq!(liked.likes, 1);

  let err = s.like_post(post.post_id, bob.user_id).await.unwrap_err();
  assert!(matches!(err, Error::AlreadyLiked));

  // The failed second like must not have touched the counter.
  let fetched = s.get_post(post.post_id).await.unwrap().unwrap();
  assert_eq!(fetched.likes, 1);
}

#[tokio::test]
async fn like_missing_post_is_not_found() {
  let s = store().await;
  let alice = user(&s, "Alice", "alice@example.com").await;
  let err = s.like_post(Uuid::new_v4(), alice.user_id).await.unwrap_err();
  assert!(matches!(err, Error::PostNotFound(_)));
}

#[tokio::test]
async fn comment_like_and_unlike_round_trip() {
  let s = store().await;
  let alice = user(&s, "Alice", "alice@example.com").await;
  let bob = user(&s, "Bob", "bob@example.com").await;
  let post = s.create_post(memory(alice.user_id, "lake day")).await.unwrap();
  let comment = s
    .create_comment(NewComment {
      post_id:   post.post_id,
      author:    alice.user_id,
      content:   "good times".into(),
      parent_id: None,
    })
    .await
    .unwrap();

  let liked = s.like_comment(comment.comment_id, bob.user_id).await.unwrap();
  assert_eq!(liked.likes, 1);

  let unliked = s
    .unlike_comment(comment.comment_id, bob.user_id)
    .await
    .unwrap();
  assert_eq!(unliked.likes, 0);

  // Nothing left to withdraw.
  let err = s
    .unlike_comment(comment.comment_id, bob.user_id)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::LikeNotFound));
}

// ─── Subscriptions ───────────────────────────────────────────────────────────

#[tokio::test]
async fn subscription_edges_are_directional() {
  let s = store().await;
  let alice = user(&s, "Alice", "alice@example.com").await;
  let bob = user(&s, "Bob", "bob@example.com").await;

  s.subscribe(bob.user_id, alice.user_id).await.unwrap();

  assert!(s.edge_exists(bob.user_id, alice.user_id).await.unwrap());
  assert!(!s.edge_exists(alice.user_id, bob.user_id).await.unwrap());
}

#[tokio::test]
async fn duplicate_subscription_is_a_conflict() {
  let s = store().await;
  let alice = user(&s, "Alice", "alice@example.com").await;
  let bob = user(&s, "Bob", "bob@example.com").await;

  s.subscribe(bob.user_id, alice.user_id).await.unwrap();
  let err = s.subscribe(bob.user_id, alice.user_id).await.unwrap_err();
  assert!(matches!(err, Error::AlreadySubscribed));
}

#[tokio::test]
async fn unsubscribe_removes_the_edge() {
  let s = store().await;
  let alice = user(&s, "Alice", "alice@example.com").await;
  let bob = user(&s, "Bob", "bob@example.com").await;

  s.subscribe(bob.user_id, alice.user_id).await.unwrap();
  s.unsubscribe(bob.user_id, alice.user_id).await.unwrap();
  assert!(!s.edge_exists(bob.user_id, alice.user_id).await.unwrap());

  let err = s.unsubscribe(bob.user_id, alice.user_id).await.unwrap_err();
  assert!(matches!(err, Error::NotSubscribed { .. }));
}

#[tokio::test]
async fn subscribers_lists_follower_profiles() {
  let s = store().await;
  let alice = user(&s, "Alice", "alice@example.com").await;
  let bob = user(&s, "Bob", "bob@example.com").await;
  let carol = user(&s, "Carol", "carol@example.com").await;

  s.subscribe(bob.user_id, alice.user_id).await.unwrap();
  s.subscribe(carol.user_id, alice.user_id).await.unwrap();

  let followers = s.subscribers(alice.user_id).await.unwrap();
  assert_eq!(followers.len(), 2);
  assert!(followers.iter().any(|p| p.user_id == bob.user_id));
  assert!(followers.iter().any(|p| p.user_id == carol.user_id));
}

// ─── Notifications ───────────────────────────────────────────────────────────

#[tokio::test]
async fn notifications_list_newest_first() {
  let s = store().await;
  let alice = user(&s, "Alice", "alice@example.com").await;

  for message in ["oldest", "middle", "newest"] {
    s.push_notification(NotificationDraft {
      recipient: alice.user_id,
      kind:      NotificationKind::Like,
      message:   message.into(),
    })
    .await
    .unwrap();
  }

  let listed = s.list_notifications(alice.user_id).await.unwrap();
  let messages: Vec<_> = listed.iter().map(|n| n.message.as_str()).collect();
  assert_eq!(messages, ["newest", "middle", "oldest"]);
}

#[tokio::test]
async fn mark_read_is_idempotent() {
  let s = store().await;
  let alice = user(&s, "Alice", "alice@example.com").await;
  let pushed = s
    .push_notification(NotificationDraft {
      recipient: alice.user_id,
      kind:      NotificationKind::Comment,
      message:   "Bob commented on your post.".into(),
    })
    .await
    .unwrap();
  assert!(!pushed.read);

  let first = s
    .mark_notification_read(pushed.notification_id)
    .await
    .unwrap();
  assert!(first.read);

  let second = s
    .mark_notification_read(pushed.notification_id)
    .await
    .unwrap();
  assert!(second.read);
}

#[tokio::test]
async fn mark_read_missing_is_not_found() {
  let s = store().await;
  let err = s.mark_notification_read(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::NotificationNotFound(_)));
}

// ─── Service: access gate ────────────────────────────────────────────────────

async fn service() -> (SocialService<SqliteStore>, Arc<SqliteStore>) {
  let store = Arc::new(store().await);
  (SocialService::new(Arc::clone(&store)), store)
}

#[tokio::test]
async fn author_always_sees_their_own_post() {
  let (svc, store) = service().await;
  let alice = user(&store, "Alice", "alice@example.com").await;
  let post = svc.create_post(memory(alice.user_id, "lake day")).await.unwrap();

  let seen = svc.view_post(alice.user_id, post.post_id).await.unwrap();
  assert_eq!(seen.post_id, post.post_id);
}

#[tokio::test]
async fn following_an_author_does_not_open_their_posts() {
  let (svc, store) = service().await;
  let alice = user(&store, "Alice", "alice@example.com").await;
  let bob = user(&store, "Bob", "bob@example.com").await;

  // Bob follows Alice. The gate checks the opposite edge, so Bob still
  // cannot see Alice's posts.
  svc.subscribe(bob.user_id, alice.user_id).await.unwrap();
  let post = svc.create_post(memory(alice.user_id, "lake day")).await.unwrap();

  let err = svc.view_post(bob.user_id, post.post_id).await.unwrap_err();
  assert!(matches!(err, Error::ViewDenied(_)));
  assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn author_following_the_requester_opens_the_post() {
  let (svc, store) = service().await;
  let alice = user(&store, "Alice", "alice@example.com").await;
  let bob = user(&store, "Bob", "bob@example.com").await;

  svc.subscribe(alice.user_id, bob.user_id).await.unwrap();
  let post = svc.create_post(memory(alice.user_id, "lake day")).await.unwrap();

  let seen = svc.view_post(bob.user_id, post.post_id).await.unwrap();
  assert_eq!(seen.post_id, post.post_id);
}

#[tokio::test]
async fn view_missing_post_is_not_found_not_forbidden() {
  let (svc, store) = service().await;
  let alice = user(&store, "Alice", "alice@example.com").await;

  let err = svc.view_post(alice.user_id, Uuid::new_v4()).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ─── Service: ownership ──────────────────────────────────────────────────────

#[tokio::test]
async fn only_the_author_may_edit_or_delete() {
  let (svc, store) = service().await;
  let alice = user(&store, "Alice", "alice@example.com").await;
  let bob = user(&store, "Bob", "bob@example.com").await;
  let post = svc.create_post(memory(alice.user_id, "lake day")).await.unwrap();

  let err = svc
    .update_post(bob.user_id, post.post_id, PostPatch::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotOwner(_)));

  let err = svc.delete_post(bob.user_id, post.post_id).await.unwrap_err();
  assert!(matches!(err, Error::NotOwner(_)));

  svc.delete_post(alice.user_id, post.post_id).await.unwrap();
}

#[tokio::test]
async fn editing_a_missing_post_reports_not_found_before_ownership() {
  let (svc, store) = service().await;
  let bob = user(&store, "Bob", "bob@example.com").await;

  let err = svc
    .update_post(bob.user_id, Uuid::new_v4(), PostPatch::default())
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn posting_as_an_unknown_author_is_invalid() {
  let (svc, _store) = service().await;
  let err = svc
    .create_post(memory(Uuid::new_v4(), "ghost"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidAuthor(_)));
  assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

// ─── Service: fan-out ────────────────────────────────────────────────────────

#[tokio::test]
async fn new_post_notifies_every_follower() {
  let (svc, store) = service().await;
  let alice = user(&store, "Alice", "alice@example.com").await;
  let bob = user(&store, "Bob", "bob@example.com").await;
  let carol = user(&store, "Carol", "carol@example.com").await;

  svc.subscribe(bob.user_id, alice.user_id).await.unwrap();
  svc.subscribe(carol.user_id, alice.user_id).await.unwrap();

  svc.create_post(memory(alice.user_id, "lake day")).await.unwrap();

  for follower in [bob.user_id, carol.user_id] {
    let inbox = svc.notifications(follower).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::NewPost);
    assert_eq!(inbox[0].message, "Alice published a new post.");
    assert!(!inbox[0].read);
  }

  // The author hears nothing about their own post.
  assert!(svc.notifications(alice.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn like_notifies_the_post_author() {
  let (svc, store) = service().await;
  let alice = user(&store, "Alice", "alice@example.com").await;
  let bob = user(&store, "Bob", "bob@example.com").await;
  let post = svc.create_post(memory(alice.user_id, "lake day")).await.unwrap();

  svc.like_post(bob.user_id, post.post_id).await.unwrap();

  let inbox = svc.notifications(alice.user_id).await.unwrap();
  assert_eq!(inbox.len(), 1);
  assert_eq!(inbox[0].kind, NotificationKind::Like);
  assert_eq!(inbox[0].message, "Bob liked your post.");
}

#[tokio::test]
async fn liking_your_own_post_stays_silent() {
  let (svc, store) = service().await;
  let alice = user(&store, "Alice", "alice@example.com").await;
  let post = svc.create_post(memory(alice.user_id, "lake day")).await.unwrap();

  let liked = svc.like_post(alice.user_id, post.post_id).await.unwrap();
  assert_eq!(liked.likes, 1);

  assert!(svc.notifications(alice.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn comment_and_reply_notify_the_right_people() {
  let (svc, store) = service().await;
  let alice = user(&store, "Alice", "alice@example.com").await;
  let bob = user(&store, "Bob", "bob@example.com").await;
  let carol = user(&store, "Carol", "carol@example.com").await;
  let post = svc.create_post(memory(alice.user_id, "lake day")).await.unwrap();

  let comment = svc
    .create_comment(NewComment {
      post_id:   post.post_id,
      author:    bob.user_id,
      content:   "looks fun".into(),
      parent_id: None,
    })
    .await
    .unwrap();

  let alice_inbox = svc.notifications(alice.user_id).await.unwrap();
  assert_eq!(alice_inbox.len(), 1);
  assert_eq!(alice_inbox[0].kind, NotificationKind::Comment);
  assert_eq!(alice_inbox[0].message, "Bob commented on your post.");

  // A reply goes to the parent comment's author, not the post author.
  svc
    .create_comment(NewComment {
      post_id:   post.post_id,
      author:    carol.user_id,
      content:   "it was!".into(),
      parent_id: Some(comment.comment_id),
    })
    .await
    .unwrap();

  let bob_inbox = svc.notifications(bob.user_id).await.unwrap();
  assert_eq!(bob_inbox.len(), 1);
  assert_eq!(bob_inbox[0].kind, NotificationKind::Reply);
  assert_eq!(bob_inbox[0].message, "Carol replied to your comment.");
  assert_eq!(svc.notifications(alice.user_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn comment_like_notifies_the_comment_author() {
  let (svc, store) = service().await;
  let alice = user(&store, "Alice", "alice@example.com").await;
  let bob = user(&store, "Bob", "bob@example.com").await;
  let post = svc.create_post(memory(alice.user_id, "lake day")).await.unwrap();
  let comment = svc
    .create_comment(NewComment {
      post_id:   post.post_id,
      author:    bob.user_id,
      content:   "looks fun".into(),
      parent_id: None,
    })
    .await
    .unwrap();

  svc.like_comment(alice.user_id, comment.comment_id).await.unwrap();

  let inbox = svc.notifications(bob.user_id).await.unwrap();
  assert_eq!(inbox.len(), 1);
  assert_eq!(inbox[0].kind, NotificationKind::Like);
  assert_eq!(inbox[0].message, "Alice liked your comment.");
}

#[tokio::test]
async fn replying_to_a_missing_parent_is_not_found() {
  let (svc, store) = service().await;
  let alice = user(&store, "Alice", "alice@example.com").await;
  let post = svc.create_post(memory(alice.user_id, "lake day")).await.unwrap();

  let err = svc
    .create_comment(NewComment {
      post_id:   post.post_id,
      author:    alice.user_id,
      content:   "into the void".into(),
      parent_id: Some(Uuid::new_v4()),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::CommentNotFound(_)));
}

// ─── Service: notification ownership ─────────────────────────────────────────

#[tokio::test]
async fn only_the_recipient_may_mark_read() {
  let (svc, store) = service().await;
  let alice = user(&store, "Alice", "alice@example.com").await;
  let bob = user(&store, "Bob", "bob@example.com").await;
  let post = svc.create_post(memory(alice.user_id, "lake day")).await.unwrap();
  svc.like_post(bob.user_id, post.post_id).await.unwrap();

  let inbox = svc.notifications(alice.user_id).await.unwrap();
  let notification_id = inbox[0].notification_id;

  let err = svc
    .mark_notification_read(bob.user_id, notification_id)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotRecipient(_)));
  assert_eq!(err.kind(), ErrorKind::Forbidden);

  let read = svc
    .mark_notification_read(alice.user_id, notification_id)
    .await
    .unwrap();
  assert!(read.read);
}

#[tokio::test]
async fn subscribing_with_an_unknown_user_is_not_found() {
  let (svc, store) = service().await;
  let alice = user(&store, "Alice", "alice@example.com").await;

  let err = svc
    .subscribe(alice.user_id, Uuid::new_v4())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UserNotFound(_)));
}
