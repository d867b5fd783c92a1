//! SQLite storage backend implementation.
//!
//! Implements the entity store traits using `rusqlite` for synchronous
//! operations and `tokio-rusqlite` to run them off the async executor.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteStore;
