//! In-memory entity store implementation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use postline_core::blog::{Account, AccountFilter, Comment, CommentFilter, Entity, Id, Post, PostFilter};
use postline_core::storage::{AccountStore, EntityStore, Page, RepositoryError, Result};

/// One table: rows ordered by id plus an id sequence and a read counter.
#[derive(Debug)]
struct Table<E> {
    rows: RwLock<BTreeMap<Id, E>>,
    next_id: AtomicI64,
    reads: AtomicUsize,
}

impl<E: Entity> Table<E> {
    fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            reads: AtomicUsize::new(0),
        }
    }

    fn allocate_id(&self) -> Id {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    async fn find(&self, id: Id) -> Option<E> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.rows.read().await.get(&id).cloned()
    }

    async fn contains(&self, id: Id) -> bool {
        self.rows.read().await.contains_key(&id)
    }

    async fn list(&self, page: Page, matches: impl Fn(&E) -> bool) -> Vec<E> {
        self.rows
            .read()
            .await
            .values()
            .filter(|&row| matches(row))
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect()
    }

    async fn update(&self, entity: &E) -> Result<()> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&entity.id()) {
            Some(row) => {
                *row = entity.clone();
                Ok(())
            }
            None => Err(RepositoryError::not_found(E::KIND, entity.id())),
        }
    }
}

/// In-memory storage backend.
///
/// Rows live in `BTreeMap`s behind `Arc<RwLock<_>>`, so listing is naturally
/// in id order. Ids are never reused. Foreign keys are checked on insert and
/// deletes cascade the way the SQLite schema does. Data is lost when the
/// store is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    accounts: Arc<Table<Account>>,
    posts: Arc<Table<Post>>,
    comments: Arc<Table<Comment>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(Table::new()),
            posts: Arc::new(Table::new()),
            comments: Arc::new(Table::new()),
        }
    }

    /// Number of single-row reads served for accounts.
    pub fn account_reads(&self) -> usize {
        self.accounts.reads.load(Ordering::SeqCst)
    }

    /// Number of single-row reads served for posts.
    pub fn post_reads(&self) -> usize {
        self.posts.reads.load(Ordering::SeqCst)
    }

    /// Number of single-row reads served for comments.
    pub fn comment_reads(&self) -> usize {
        self.comments.reads.load(Ordering::SeqCst)
    }
}

fn missing_reference(kind: &str, id: Id) -> RepositoryError {
    RepositoryError::InvalidData(format!("referenced {} {} does not exist", kind, id))
}

#[async_trait]
impl EntityStore<Account> for InMemoryStore {
    async fn insert(&self, account: &Account) -> Result<Id> {
        // Hold the write lock across the uniqueness check.
        let mut rows = self.accounts.rows.write().await;
        if rows.values().any(|a| a.email == account.email) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: Account::KIND,
                id: account.email.clone(),
            });
        }
        let id = self.accounts.allocate_id();
        rows.insert(id, account.clone().with_id(id));
        Ok(id)
    }

    async fn find(&self, id: Id) -> Result<Option<Account>> {
        Ok(self.accounts.find(id).await)
    }

    async fn list(&self, page: Page, filter: &AccountFilter) -> Result<Vec<Account>> {
        Ok(self.accounts.list(page, |a| filter.matches(a)).await)
    }

    async fn update(&self, account: &Account) -> Result<()> {
        // One write guard covers the uniqueness check and the replacement.
        let mut rows = self.accounts.rows.write().await;
        if rows
            .values()
            .any(|a| a.email == account.email && a.id != account.id)
        {
            return Err(RepositoryError::AlreadyExists {
                entity_type: Account::KIND,
                id: account.email.clone(),
            });
        }
        match rows.get_mut(&account.id) {
            Some(row) => {
                *row = account.clone();
                Ok(())
            }
            None => Err(RepositoryError::not_found(Account::KIND, account.id)),
        }
    }

    async fn delete(&self, id: Id) -> Result<()> {
        if self.accounts.rows.write().await.remove(&id).is_none() {
            return Ok(());
        }

        let owned_posts: Vec<Id> = {
            let mut posts = self.posts.rows.write().await;
            let ids: Vec<Id> = posts
                .values()
                .filter(|p| p.account_id == id)
                .map(|p| p.id)
                .collect();
            for post_id in &ids {
                posts.remove(post_id);
            }
            ids
        };

        self.comments
            .rows
            .write()
            .await
            .retain(|_, c| c.account_id != id && !owned_posts.contains(&c.post_id));
        Ok(())
    }
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        self.accounts.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .accounts
            .rows
            .read()
            .await
            .values()
            .find(|a| a.email == email)
            .cloned())
    }
}

#[async_trait]
impl EntityStore<Post> for InMemoryStore {
    async fn insert(&self, post: &Post) -> Result<Id> {
        if !self.accounts.contains(post.account_id).await {
            return Err(missing_reference(Account::KIND, post.account_id));
        }
        let id = self.posts.allocate_id();
        self.posts
            .rows
            .write()
            .await
            .insert(id, post.clone().with_id(id));
        Ok(id)
    }

    async fn find(&self, id: Id) -> Result<Option<Post>> {
        Ok(self.posts.find(id).await)
    }

    async fn list(&self, page: Page, filter: &PostFilter) -> Result<Vec<Post>> {
        Ok(self.posts.list(page, |p| filter.matches(p)).await)
    }

    async fn update(&self, post: &Post) -> Result<()> {
        self.posts.update(post).await
    }

    async fn delete(&self, id: Id) -> Result<()> {
        if self.posts.rows.write().await.remove(&id).is_some() {
            self.comments
                .rows
                .write()
                .await
                .retain(|_, c| c.post_id != id);
        }
        Ok(())
    }
}

#[async_trait]
impl EntityStore<Comment> for InMemoryStore {
    async fn insert(&self, comment: &Comment) -> Result<Id> {
        if !self.accounts.contains(comment.account_id).await {
            return Err(missing_reference(Account::KIND, comment.account_id));
        }
        if !self.posts.contains(comment.post_id).await {
            return Err(missing_reference(Post::KIND, comment.post_id));
        }
        let id = self.comments.allocate_id();
        self.comments
            .rows
            .write()
            .await
            .insert(id, comment.clone().with_id(id));
        Ok(id)
    }

    async fn find(&self, id: Id) -> Result<Option<Comment>> {
        Ok(self.comments.find(id).await)
    }

    async fn list(&self, page: Page, filter: &CommentFilter) -> Result<Vec<Comment>> {
        Ok(self.comments.list(page, |c| filter.matches(c)).await)
    }

    async fn update(&self, comment: &Comment) -> Result<()> {
        self.comments.update(comment).await
    }

    async fn delete(&self, id: Id) -> Result<()> {
        self.comments.rows.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    async fn seed_account(store: &InMemoryStore, email: &str) -> Id {
        EntityStore::<Account>::insert(store, &Account::new("Ada", email, "hash", Utc::now()))
            .await
            .unwrap()
    }

    async fn seed_post(store: &InMemoryStore, account_id: Id, title: &str) -> Id {
        EntityStore::<Post>::insert(store, &Post::new(title, "Body", account_id, Utc::now()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_ids_are_assigned_sequentially() {
        let store = InMemoryStore::new();
        let account_id = seed_account(&store, "ada@example.com").await;

        assert_eq!(seed_post(&store, account_id, "One").await, 1);
        assert_eq!(seed_post(&store, account_id, "Two").await, 2);

        let post = EntityStore::<Post>::find(&store, 2).await.unwrap().unwrap();
        assert_eq!(post.id, 2);
        assert_eq!(post.title, "Two");
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = InMemoryStore::new();
        let account_id = seed_account(&store, "ada@example.com").await;
        let first = seed_post(&store, account_id, "One").await;

        EntityStore::<Post>::delete(&store, first).await.unwrap();

        assert_eq!(seed_post(&store, account_id, "Two").await, first + 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = InMemoryStore::new();
        seed_account(&store, "ada@example.com").await;

        let result = EntityStore::<Account>::insert(
            &store,
            &Account::new("Other", "ada@example.com", "hash", Utc::now()),
        )
        .await;

        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_update_to_taken_email_is_rejected() {
        let store = InMemoryStore::new();
        seed_account(&store, "ada@example.com").await;
        let grace_id = seed_account(&store, "grace@example.com").await;

        let mut grace = EntityStore::<Account>::find(&store, grace_id)
            .await
            .unwrap()
            .unwrap();
        grace.email = "ada@example.com".to_string();

        let result = EntityStore::<Account>::update(&store, &grace).await;
        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_never_share_an_email() {
        let store = InMemoryStore::new();
        let mut ids = Vec::new();
        for n in 0..16 {
            ids.push(seed_account(&store, &format!("user{n}@example.com")).await);
        }

        let mut tasks = Vec::new();
        for id in ids {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                let mut account = EntityStore::<Account>::find(&store, id)
                    .await
                    .unwrap()
                    .unwrap();
                account.email = "contested@example.com".to_string();
                let _ = EntityStore::<Account>::update(&store, &account).await;
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let filter = AccountFilter::default();
        let holders = EntityStore::<Account>::list(&store, Page::new(100, 0), &filter)
            .await
            .unwrap()
            .into_iter()
            .filter(|a| a.email == "contested@example.com")
            .count();
        assert_eq!(holders, 1);
    }

    #[tokio::test]
    async fn test_post_requires_existing_account() {
        let store = InMemoryStore::new();

        let result =
            EntityStore::<Post>::insert(&store, &Post::new("Orphan", "Body", 42, Utc::now())).await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates_in_id_order() {
        let store = InMemoryStore::new();
        let account_id = seed_account(&store, "ada@example.com").await;
        for title in ["Rust one", "Go", "Rust two", "Rust three"] {
            seed_post(&store, account_id, title).await;
        }

        let filter = PostFilter {
            title: Some("Rust".to_string()),
            account_id: None,
        };
        let page = EntityStore::<Post>::list(&store, Page::new(2, 1), &filter)
            .await
            .unwrap();

        let titles: Vec<&str> = page.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Rust two", "Rust three"]);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryStore::new();

        let result =
            EntityStore::<Comment>::update(&store, &Comment::new("x", 1, 1, Utc::now()).with_id(5))
                .await;

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = InMemoryStore::new();

        assert!(EntityStore::<Post>::delete(&store, 404).await.is_ok());
    }

    #[tokio::test]
    async fn test_deleting_post_cascades_to_comments() {
        let store = InMemoryStore::new();
        let account_id = seed_account(&store, "ada@example.com").await;
        let post_id = seed_post(&store, account_id, "Hello").await;
        let comment_id = EntityStore::<Comment>::insert(
            &store,
            &Comment::new("Nice", account_id, post_id, Utc::now()),
        )
        .await
        .unwrap();

        EntityStore::<Post>::delete(&store, post_id).await.unwrap();

        assert!(EntityStore::<Comment>::find(&store, comment_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_read_counters() {
        let store = InMemoryStore::new();
        let account_id = seed_account(&store, "ada@example.com").await;
        let post_id = seed_post(&store, account_id, "Hello").await;

        EntityStore::<Post>::find(&store, post_id).await.unwrap();
        EntityStore::<Post>::find(&store, post_id).await.unwrap();

        assert_eq!(store.post_reads(), 2);
        assert_eq!(store.comment_reads(), 0);
    }
}
