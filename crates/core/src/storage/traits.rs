use async_trait::async_trait;

use crate::blog::{Account, Entity, Id};

use super::{Page, Result};

/// Durable storage for one entity type.
///
/// Backends only store and fetch rows; they never cache and never check
/// ownership.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Inserts a new row and returns the id the store assigned.
    async fn insert(&self, entity: &E) -> Result<Id>;

    /// Finds a row by id. A missing row is `Ok(None)`.
    async fn find(&self, id: Id) -> Result<Option<E>>;

    /// Lists rows matching `filter` in ascending id order.
    async fn list(&self, page: Page, filter: &E::Filter) -> Result<Vec<E>>;

    /// Overwrites the row keyed by `entity.id()`. Fails with `NotFound` when
    /// there is no such row.
    async fn update(&self, entity: &E) -> Result<()>;

    /// Deletes a row by id. Deleting a missing row succeeds.
    async fn delete(&self, id: Id) -> Result<()>;
}

/// Account storage with lookup by the unique email column.
#[async_trait]
pub trait AccountStore: EntityStore<Account> {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;
}

/// Entity access as seen by services: absence is an error, reads may be
/// served from a cache.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Persists a new entity and returns its canonical stored form.
    async fn create(&self, entity: E) -> Result<E>;

    /// Gets an entity by id, failing with `NotFound` when it does not exist.
    async fn get(&self, id: Id) -> Result<E>;

    /// Lists entities. Never served from the cache.
    async fn list(&self, page: Page, filter: &E::Filter) -> Result<Vec<E>>;

    /// Overwrites an entity and returns its canonical stored form.
    async fn update(&self, entity: E) -> Result<E>;

    /// Deletes an entity. Deleting a missing entity succeeds.
    async fn delete(&self, id: Id) -> Result<()>;
}

/// Account repository with lookup by email.
#[async_trait]
pub trait AccountRepository: Repository<Account> {
    /// Finds an account by email, always reading the store.
    async fn get_by_email(&self, email: &str) -> Result<Option<Account>>;
}
