//! SQLite backend for the Memoria social store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Uniqueness invariants (likes,
//! subscription edges, emails) are enforced by the schema and reported as
//! the core conflict variants; like-row and counter writes share one
//! transaction.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
