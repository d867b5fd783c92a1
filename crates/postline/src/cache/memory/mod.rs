//! In-memory cache backend.
//!
//! A single-process LRU cache with lazy TTL expiry. Entries are not shared
//! between server instances.

mod cache;

pub use cache::MemoryCache;
