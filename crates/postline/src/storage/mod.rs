//! Storage backend implementations.
//!
//! Concrete implementations of the entity store traits defined in
//! `postline_core::storage`, plus the cache-aside repository that wraps them.
//! The store is selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): ordered maps behind `RwLock`s
//! - `sqlite`: SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//!
//! These features are mutually exclusive.
//!
//! # Examples
//!
//! Build with SQLite:
//! ```bash
//! cargo build -p postline --no-default-features --features sqlite,memory
//! ```

#[cfg(all(feature = "inmemory", feature = "sqlite"))]
compile_error!(
    "Features 'inmemory' and 'sqlite' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "inmemory", feature = "sqlite")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'sqlite' feature. \
    Example: cargo build -p postline --features inmemory"
);

pub mod cached;

// The in-memory store also backs unit tests regardless of the selected backend.
#[cfg(any(test, feature = "inmemory"))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use cached::CachedRepository;

#[cfg(any(test, feature = "inmemory"))]
pub use inmemory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
