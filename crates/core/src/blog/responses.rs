//! API response types for blog operations.
//!
//! Built by explicit field mapping so nothing stored on an entity leaks into
//! a response by accident.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Account, Comment, Id, Post};

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl AccountResponse {
    pub fn from_account(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Id,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub account_id: Id,
}

impl PostResponse {
    pub fn from_post(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            body: post.body.clone(),
            created_at: post.created_at,
            updated_at: post.updated_at,
            account_id: post.account_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Id,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub account_id: Id,
    pub post_id: Id,
}

impl CommentResponse {
    pub fn from_comment(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            body: comment.body.clone(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            account_id: comment.account_id,
            post_id: comment.post_id,
        }
    }
}

/// Issued bearer token returned by login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_account_response_omits_password() {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut account = Account::new("Ada", "ada@example.com", "$argon2id$secret", created_at);
        account.id = 3;

        let json = serde_json::to_value(AccountResponse::from_account(&account)).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["email"], "ada@example.com");
        assert!(json.get("password").is_none());
        assert!(json["updated_at"].is_null());
    }

    #[test]
    fn test_comment_response_copies_ownership() {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut comment = Comment::new("Nice post", 5, 9, created_at);
        comment.id = 11;

        let response = CommentResponse::from_comment(&comment);

        assert_eq!(response.id, 11);
        assert_eq!(response.account_id, 5);
        assert_eq!(response.post_id, 9);
    }
}
