//! SQLite store implementation.
//!
//! Implements the entity store traits from `postline_core::storage` using SQLite.

use async_trait::async_trait;
use rusqlite::params;
use tokio_rusqlite::Connection;

use postline_core::blog::{Account, AccountFilter, Comment, CommentFilter, Entity, Id, Post, PostFilter};
use postline_core::storage::{AccountStore, EntityStore, Page, RepositoryError, Result};

use super::conversions::{
    format_datetime, format_optional_datetime, row_to_account, row_to_comment, row_to_post,
};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Turns an affected-row count of zero into `QueryReturnedNoRows`.
fn require_row(rows: usize) -> std::result::Result<(), tokio_rusqlite::Error> {
    if rows == 0 {
        Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
    } else {
        Ok(())
    }
}

/// SQLite-based storage backend.
///
/// Provides async access to SQLite storage for all entity types. Ids come
/// from `AUTOINCREMENT` and are never reused. Deletes cascade through the
/// foreign keys declared in the schema.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens a file-based database, creating it and its tables if needed.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Opens an in-memory database. Data is lost when the store is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// Account
// ============================================================================

#[async_trait]
impl EntityStore<Account> for SqliteStore {
    async fn insert(&self, account: &Account) -> Result<Id> {
        let email = account.email.clone();
        let account = account.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_ACCOUNT,
                    params![
                        account.name,
                        account.email,
                        account.password,
                        format_datetime(&account.created_at),
                        format_optional_datetime(&account.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Account::KIND, email))
    }

    async fn find(&self, id: Id) -> Result<Option<Account>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_ACCOUNT_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([id], row_to_account) {
                    Ok(account) => Ok(Some(account)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Account::KIND, id.to_string()))
    }

    async fn list(&self, page: Page, filter: &AccountFilter) -> Result<Vec<Account>> {
        let name = filter.name.clone();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_ACCOUNTS).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(params![name, page.limit, page.offset], row_to_account)
                    .map_err(wrap_err)?;

                let mut accounts = Vec::new();
                for row_result in rows {
                    accounts.push(row_result.map_err(wrap_err)?);
                }
                Ok(accounts)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn update(&self, account: &Account) -> Result<()> {
        let id = account.id;
        let email = account.email.clone();
        let account = account.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_ACCOUNT,
                        params![
                            account.id,
                            account.name,
                            account.email,
                            account.password,
                            format_optional_datetime(&account.updated_at),
                        ],
                    )
                    .map_err(wrap_err)?;
                require_row(rows)
            })
            .await
            .map_err(|e| match map_tokio_rusqlite_error(e, Account::KIND, id.to_string()) {
                // The only unique column on accounts is the email.
                RepositoryError::AlreadyExists { entity_type, .. } => {
                    RepositoryError::AlreadyExists { entity_type, id: email }
                }
                other => other,
            })
    }

    async fn delete(&self, id: Id) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute(schema::DELETE_ACCOUNT, [id]).map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Account::KIND, id.to_string()))
    }
}

#[async_trait]
impl AccountStore for SqliteStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let email = email.to_string();
        let key = email.clone();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ACCOUNT_BY_EMAIL)
                    .map_err(wrap_err)?;
                match stmt.query_row([&email], row_to_account) {
                    Ok(account) => Ok(Some(account)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Account::KIND, key))
    }
}

// ============================================================================
// Post
// ============================================================================

#[async_trait]
impl EntityStore<Post> for SqliteStore {
    async fn insert(&self, post: &Post) -> Result<Id> {
        let post = post.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_POST,
                    params![
                        post.title,
                        post.body,
                        format_datetime(&post.created_at),
                        format_optional_datetime(&post.updated_at),
                        post.account_id,
                    ],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Post::KIND, "new"))
    }

    async fn find(&self, id: Id) -> Result<Option<Post>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_POST_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([id], row_to_post) {
                    Ok(post) => Ok(Some(post)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Post::KIND, id.to_string()))
    }

    async fn list(&self, page: Page, filter: &PostFilter) -> Result<Vec<Post>> {
        let title = filter.title.clone();
        let account_id = filter.account_id;

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_POSTS).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(
                        params![title, account_id, page.limit, page.offset],
                        row_to_post,
                    )
                    .map_err(wrap_err)?;

                let mut posts = Vec::new();
                for row_result in rows {
                    posts.push(row_result.map_err(wrap_err)?);
                }
                Ok(posts)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn update(&self, post: &Post) -> Result<()> {
        let id = post.id;
        let post = post.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_POST,
                        params![
                            post.id,
                            post.title,
                            post.body,
                            format_optional_datetime(&post.updated_at),
                        ],
                    )
                    .map_err(wrap_err)?;
                require_row(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Post::KIND, id.to_string()))
    }

    async fn delete(&self, id: Id) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute(schema::DELETE_POST, [id]).map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Post::KIND, id.to_string()))
    }
}

// ============================================================================
// Comment
// ============================================================================

#[async_trait]
impl EntityStore<Comment> for SqliteStore {
    async fn insert(&self, comment: &Comment) -> Result<Id> {
        let comment = comment.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_COMMENT,
                    params![
                        comment.body,
                        format_datetime(&comment.created_at),
                        format_optional_datetime(&comment.updated_at),
                        comment.account_id,
                        comment.post_id,
                    ],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Comment::KIND, "new"))
    }

    async fn find(&self, id: Id) -> Result<Option<Comment>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_COMMENT_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([id], row_to_comment) {
                    Ok(comment) => Ok(Some(comment)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Comment::KIND, id.to_string()))
    }

    async fn list(&self, page: Page, filter: &CommentFilter) -> Result<Vec<Comment>> {
        let CommentFilter {
            post_id,
            account_id,
        } = *filter;

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_COMMENTS).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(
                        params![post_id, account_id, page.limit, page.offset],
                        row_to_comment,
                    )
                    .map_err(wrap_err)?;

                let mut comments = Vec::new();
                for row_result in rows {
                    comments.push(row_result.map_err(wrap_err)?);
                }
                Ok(comments)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn update(&self, comment: &Comment) -> Result<()> {
        let id = comment.id;
        let comment = comment.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_COMMENT,
                        params![
                            comment.id,
                            comment.body,
                            format_optional_datetime(&comment.updated_at),
                        ],
                    )
                    .map_err(wrap_err)?;
                require_row(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Comment::KIND, id.to_string()))
    }

    async fn delete(&self, id: Id) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute(schema::DELETE_COMMENT, [id]).map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, Comment::KIND, id.to_string()))
    }
}
