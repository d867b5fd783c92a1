//! In-memory storage backend.
//!
//! Stores every table in ordered maps behind `Arc<RwLock<_>>`. Used for
//! development and as the store under unit and router tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use postline::storage::inmemory::InMemoryStore;
//!
//! let store = InMemoryStore::new();
//! let id = EntityStore::<Account>::insert(&store, &account).await?;
//! ```

mod repository;

pub use repository::InMemoryStore;
