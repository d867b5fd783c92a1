//! Cached repository decorator.
//!
//! Wraps an entity store with the cache-aside pattern:
//!
//! - **Reads**: Check cache first, on miss fetch from the store and populate cache
//! - **Writes**: Persist to the store, then invalidate the cached snapshot
//! - **Lists**: Always read the store
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let store = Arc::new(SqliteStore::new("postline.db").await?);
//! let cache = Arc::new(MemoryCache::new(10_000));
//!
//! let posts: CachedRepository<Post, _, _> =
//!     CachedRepository::new(store, cache, Duration::from_secs(300));
//! ```

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use postline_core::blog::{Account, Entity, Id};
use postline_core::cache::{deserialize_entity, entity_key, serialize_entity, Cache};
use postline_core::storage::{
    AccountRepository, AccountStore, EntityStore, Page, Repository, RepositoryError, Result,
};

/// Cache-aside repository for one entity type.
///
/// Invalidation completes before `update` or `delete` returns, so a later
/// `get` never serves the pre-mutation snapshot. Cache faults other than a
/// miss propagate as `RepositoryError::Cache`.
///
/// # Type Parameters
///
/// * `E` - The entity type
/// * `S` - The underlying entity store
/// * `C` - The cache implementation
pub struct CachedRepository<E, S, C> {
    store: Arc<S>,
    cache: Arc<C>,
    ttl: Duration,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S, C> CachedRepository<E, S, C>
where
    E: Entity,
    S: EntityStore<E>,
    C: Cache,
{
    /// Creates a new cached repository.
    ///
    /// # Arguments
    ///
    /// * `store` - The underlying store to cache
    /// * `cache` - The cache implementation
    /// * `ttl` - Time-to-live for cached snapshots
    pub fn new(store: Arc<S>, cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            store,
            cache,
            ttl,
            _entity: PhantomData,
        }
    }

    async fn invalidate(&self, id: Id) -> Result<()> {
        let removed = self.cache.delete(&entity_key::<E>(id)).await?;
        tracing::trace!(kind = E::KIND, id, removed, "Invalidated cached snapshot");
        Ok(())
    }
}

#[async_trait]
impl<E, S, C> Repository<E> for CachedRepository<E, S, C>
where
    E: Entity,
    S: EntityStore<E> + 'static,
    C: Cache + 'static,
{
    async fn create(&self, entity: E) -> Result<E> {
        let id = self.store.insert(&entity).await?;
        tracing::debug!(kind = E::KIND, id, "Entity created");
        self.get(id).await
    }

    async fn get(&self, id: Id) -> Result<E> {
        let cache_key = entity_key::<E>(id);

        if let Some(bytes) = self.cache.get(&cache_key).await? {
            match deserialize_entity::<E>(&bytes) {
                Ok(entity) => {
                    tracing::trace!(kind = E::KIND, id, "Cache hit");
                    return Ok(entity);
                }
                // Corrupt snapshot - treat as cache miss
                Err(err) => {
                    tracing::warn!(kind = E::KIND, id, error = %err, "Cache deserialization failed");
                }
            }
        }

        tracing::trace!(kind = E::KIND, id, "Cache miss");
        let entity = self
            .store
            .find(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(E::KIND, id))?;

        match serialize_entity(&entity) {
            Ok(bytes) => self.cache.set(&cache_key, &bytes, Some(self.ttl)).await?,
            Err(err) => {
                tracing::warn!(kind = E::KIND, id, error = %err, "Cache serialization failed");
            }
        }

        Ok(entity)
    }

    async fn list(&self, page: Page, filter: &E::Filter) -> Result<Vec<E>> {
        self.store.list(page, filter).await
    }

    async fn update(&self, entity: E) -> Result<E> {
        let id = entity.id();
        self.store.update(&entity).await?;
        self.invalidate(id).await?;
        tracing::debug!(kind = E::KIND, id, "Entity updated");
        self.get(id).await
    }

    async fn delete(&self, id: Id) -> Result<()> {
        self.store.delete(id).await?;
        self.invalidate(id).await?;
        tracing::debug!(kind = E::KIND, id, "Entity deleted");
        Ok(())
    }
}

#[async_trait]
impl<S, C> AccountRepository for CachedRepository<Account, S, C>
where
    S: AccountStore + 'static,
    C: Cache + 'static,
{
    async fn get_by_email(&self, email: &str) -> Result<Option<Account>> {
        self.store.find_by_email(email).await
    }
}
