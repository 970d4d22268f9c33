//! Core types and trait definitions for the Memoria social-journaling
//! backend.
//!
//! This crate holds the domain model, the [`store::SocialStore`] persistence
//! boundary, the access-control gate, the notification fan-out engine, and
//! the use-case orchestration layer. It is deliberately free of HTTP and
//! database dependencies; all other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod content;
pub mod error;
pub mod fanout;
pub mod gate;
pub mod notification;
pub mod relationship;
pub mod service;
pub mod store;
pub mod user;

pub use error::{Error, ErrorKind, Result};
