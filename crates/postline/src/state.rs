//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. Services hold repository trait objects, and the backend
//! combination is chosen via feature flags.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use postline_auth::TokenKeys;
use postline_core::blog::{Account, Comment, Post};
use postline_core::cache::Cache;
use postline_core::storage::{AccountStore, EntityStore};

use crate::config::Config;
use crate::services::{AccountService, AuthService, CommentService, PostService};
use crate::storage::CachedRepository;

/// Shared application state.
///
/// Cloned for each request; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub posts: PostService,
    pub comments: CommentService,
    pub auth: AuthService,
    pub token_keys: TokenKeys,
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        state.token_keys.clone()
    }
}

impl AppState {
    /// Wires one cached repository per entity over a shared store and cache.
    pub fn build<S, C>(store: Arc<S>, cache: Arc<C>, cache_ttl: Duration, token_keys: TokenKeys) -> Self
    where
        S: AccountStore + EntityStore<Post> + EntityStore<Comment> + 'static,
        C: Cache + 'static,
    {
        let accounts = Arc::new(CachedRepository::<Account, _, _>::new(
            store.clone(),
            cache.clone(),
            cache_ttl,
        ));
        let posts = Arc::new(CachedRepository::<Post, _, _>::new(
            store.clone(),
            cache.clone(),
            cache_ttl,
        ));
        let comments = Arc::new(CachedRepository::<Comment, _, _>::new(store, cache, cache_ttl));

        Self {
            accounts: AccountService::new(accounts.clone(), posts.clone(), comments.clone()),
            posts: PostService::new(posts.clone(), comments.clone()),
            comments: CommentService::new(comments, posts),
            auth: AuthService::new(accounts, token_keys.clone()),
            token_keys,
        }
    }

    /// State over a fresh in-memory store and cache.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::build(
            Arc::new(crate::storage::InMemoryStore::new()),
            Arc::new(crate::cache::MemoryCache::new(1_000)),
            Duration::from_secs(300),
            TokenKeys::new("test-secret", Duration::from_secs(3600)),
        )
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::storage::InMemoryStore;

    impl AppState {
        /// Creates AppState with in-memory storage and in-memory cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            tracing::warn!("Using in-memory storage, data is lost on restart");

            Ok(Self::build(
                Arc::new(InMemoryStore::new()),
                Arc::new(MemoryCache::new(config.cache_max_entries)),
                config.cache_ttl(),
                TokenKeys::from_config(&config.auth),
            ))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "redis"))]
mod inmemory_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::storage::InMemoryStore;

    impl AppState {
        /// Creates AppState with in-memory storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            tracing::warn!("Using in-memory storage, data is lost on restart");

            Ok(Self::build(
                Arc::new(InMemoryStore::new()),
                Arc::new(RedisCache::new(&config.redis_url).await?),
                config.cache_ttl(),
                TokenKeys::from_config(&config.auth),
            ))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "memory"))]
mod sqlite_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::storage::SqliteStore;

    impl AppState {
        /// Creates AppState with SQLite storage and in-memory cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let store = SqliteStore::new(&config.sqlite_path).await?;
            tracing::info!(path = %config.sqlite_path, "Opened SQLite database");

            Ok(Self::build(
                Arc::new(store),
                Arc::new(MemoryCache::new(config.cache_max_entries)),
                config.cache_ttl(),
                TokenKeys::from_config(&config.auth),
            ))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis"))]
mod sqlite_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::storage::SqliteStore;

    impl AppState {
        /// Creates AppState with SQLite storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let store = SqliteStore::new(&config.sqlite_path).await?;
            tracing::info!(path = %config.sqlite_path, "Opened SQLite database");

            Ok(Self::build(
                Arc::new(store),
                Arc::new(RedisCache::new(&config.redis_url).await?),
                config.cache_ttl(),
                TokenKeys::from_config(&config.auth),
            ))
        }
    }
}
