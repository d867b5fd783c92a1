//! Redis cache backend.
//!
//! A cache shared by every server instance pointed at the same Redis.

mod cache;
mod error;

pub use cache::RedisCache;
