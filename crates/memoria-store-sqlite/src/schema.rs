//! SQL schema for the Memoria SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS posts (
    post_id         TEXT PRIMARY KEY,
    author          TEXT NOT NULL REFERENCES users(user_id),
    title           TEXT NOT NULL,
    content         TEXT NOT NULL,
    image_name      TEXT,
    memory_timeline INTEGER,
    bgm             TEXT,
    likes           INTEGER NOT NULL DEFAULT 0 CHECK (likes >= 0),
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    comment_id TEXT PRIMARY KEY,
    post_id    TEXT NOT NULL REFERENCES posts(post_id) ON DELETE CASCADE,
    author     TEXT NOT NULL REFERENCES users(user_id),
    content    TEXT NOT NULL,
    parent_id  TEXT REFERENCES comments(comment_id) ON DELETE CASCADE,
    likes      INTEGER NOT NULL DEFAULT 0 CHECK (likes >= 0),
    created_at TEXT NOT NULL
);

-- Identifier-less join rows; the (target, actor) pair is the identity.
CREATE TABLE IF NOT EXISTS post_likes (
    post_id TEXT NOT NULL REFERENCES posts(post_id) ON DELETE CASCADE,
    actor   TEXT NOT NULL REFERENCES users(user_id),
    UNIQUE (post_id, actor)
);

CREATE TABLE IF NOT EXISTS comment_likes (
    comment_id TEXT NOT NULL REFERENCES comments(comment_id) ON DELETE CASCADE,
    actor      TEXT NOT NULL REFERENCES users(user_id),
    UNIQUE (comment_id, actor)
);

CREATE TABLE IF NOT EXISTS subscriptions (
    follower   TEXT NOT NULL REFERENCES users(user_id),
    followee   TEXT NOT NULL REFERENCES users(user_id),
    created_at TEXT NOT NULL,
    UNIQUE (follower, followee)
);

-- Notifications are written only by the fan-out engine. The only UPDATE
-- ever issued against this table flips is_read.
CREATE TABLE IF NOT EXISTS notifications (
    notification_id TEXT PRIMARY KEY,
    recipient       TEXT NOT NULL REFERENCES users(user_id),
    kind            TEXT NOT NULL,   -- 'new_post' | 'like' | 'comment' | 'reply'
    message         TEXT NOT NULL,
    is_read         INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS posts_author_idx            ON posts(author);
CREATE INDEX IF NOT EXISTS comments_post_idx           ON comments(post_id);
CREATE INDEX IF NOT EXISTS subscriptions_followee_idx  ON subscriptions(followee);
CREATE INDEX IF NOT EXISTS notifications_recipient_idx ON notifications(recipient, created_at);

PRAGMA user_version = 1;
";
