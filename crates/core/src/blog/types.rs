use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Identifier assigned by the entity store on insert.
pub type Id = i64;

/// A resource type that can be stored, cached, and owned.
///
/// `KIND` doubles as the cache key prefix and as the entity name in
/// repository errors, so it must be stable across releases.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Stable lowercase name of the resource type (e.g. `"post"`).
    const KIND: &'static str;

    /// Filter accepted by list queries for this resource type.
    type Filter: Send + Sync;

    /// Returns the store-assigned identifier (0 before insert).
    fn id(&self) -> Id;

    /// Returns the entity with its identifier replaced.
    fn with_id(self, id: Id) -> Self;
}

/// A registered account.
///
/// `password` holds an opaque PHC hash string. It is part of the stored and
/// cached snapshot but never part of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Creates an unsaved account stamped with the given creation time.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            email: email.into(),
            password: password_hash.into(),
            created_at,
            updated_at: None,
        }
    }
}

impl Entity for Account {
    const KIND: &'static str = "account";
    type Filter = AccountFilter;

    fn id(&self) -> Id {
        self.id
    }

    fn with_id(mut self, id: Id) -> Self {
        self.id = id;
        self
    }
}

/// A blog post owned by exactly one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Id,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub account_id: Id,
}

impl Post {
    /// Creates an unsaved post owned by `account_id`.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        account_id: Id,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            body: body.into(),
            created_at,
            updated_at: None,
            account_id,
        }
    }
}

impl Entity for Post {
    const KIND: &'static str = "post";
    type Filter = PostFilter;

    fn id(&self) -> Id {
        self.id
    }

    fn with_id(mut self, id: Id) -> Self {
        self.id = id;
        self
    }
}

/// A comment on a post, authored by exactly one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Id,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub account_id: Id,
    pub post_id: Id,
}

impl Comment {
    /// Creates an unsaved comment on `post_id` authored by `account_id`.
    pub fn new(body: impl Into<String>, account_id: Id, post_id: Id, created_at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            body: body.into(),
            created_at,
            updated_at: None,
            account_id,
            post_id,
        }
    }
}

impl Entity for Comment {
    const KIND: &'static str = "comment";
    type Filter = CommentFilter;

    fn id(&self) -> Id {
        self.id
    }

    fn with_id(mut self, id: Id) -> Self {
        self.id = id;
        self
    }
}

/// List filter for accounts: case-sensitive substring match on the name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilter {
    pub name: Option<String>,
}

impl AccountFilter {
    /// Returns true if the account passes this filter.
    pub fn matches(&self, account: &Account) -> bool {
        self.name
            .as_deref()
            .is_none_or(|name| account.name.contains(name))
    }
}

/// List filter for posts: substring match on the title, optionally
/// restricted to one author.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub title: Option<String>,
    pub account_id: Option<Id>,
}

impl PostFilter {
    /// Posts written by `account_id`.
    pub fn by_account(account_id: Id) -> Self {
        Self {
            title: None,
            account_id: Some(account_id),
        }
    }

    /// Returns true if the post passes this filter.
    pub fn matches(&self, post: &Post) -> bool {
        self.title
            .as_deref()
            .is_none_or(|title| post.title.contains(title))
            && self.account_id.is_none_or(|id| post.account_id == id)
    }
}

/// List filter for comments, by post and/or by author.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentFilter {
    pub post_id: Option<Id>,
    pub account_id: Option<Id>,
}

impl CommentFilter {
    /// Comments on `post_id`.
    pub fn on_post(post_id: Id) -> Self {
        Self {
            post_id: Some(post_id),
            account_id: None,
        }
    }

    /// Comments written by `account_id`, on any post.
    pub fn by_account(account_id: Id) -> Self {
        Self {
            post_id: None,
            account_id: Some(account_id),
        }
    }

    /// Returns true if the comment passes this filter.
    pub fn matches(&self, comment: &Comment) -> bool {
        self.post_id.is_none_or(|id| comment.post_id == id)
            && self.account_id.is_none_or(|id| comment.account_id == id)
    }
}
