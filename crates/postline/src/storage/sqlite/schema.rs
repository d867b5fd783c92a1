//! SQLite schema definitions and SQL query constants.

/// SQL statement to create all tables.
///
/// Foreign keys are enforced per connection, so the pragma runs with the
/// schema on every open.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT
);

CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT,
    account_id INTEGER NOT NULL,
    FOREIGN KEY (account_id) REFERENCES accounts(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    body TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT,
    account_id INTEGER NOT NULL,
    post_id INTEGER NOT NULL,
    FOREIGN KEY (account_id) REFERENCES accounts(id) ON DELETE CASCADE,
    FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_posts_account_id ON posts(account_id);
CREATE INDEX IF NOT EXISTS idx_comments_post_id ON comments(post_id);
"#;

// Account queries
pub const INSERT_ACCOUNT: &str = r#"
INSERT INTO accounts (name, email, password, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_ACCOUNT_BY_ID: &str = r#"
SELECT id, name, email, password, created_at, updated_at
FROM accounts
WHERE id = ?1
"#;

pub const SELECT_ACCOUNT_BY_EMAIL: &str = r#"
SELECT id, name, email, password, created_at, updated_at
FROM accounts
WHERE email = ?1
"#;

pub const SELECT_ACCOUNTS: &str = r#"
SELECT id, name, email, password, created_at, updated_at
FROM accounts
WHERE ?1 IS NULL OR instr(name, ?1) > 0
ORDER BY id
LIMIT ?2 OFFSET ?3
"#;

pub const UPDATE_ACCOUNT: &str = r#"
UPDATE accounts
SET name = ?2, email = ?3, password = ?4, updated_at = ?5
WHERE id = ?1
"#;

pub const DELETE_ACCOUNT: &str = "DELETE FROM accounts WHERE id = ?1";

// Post queries
pub const INSERT_POST: &str = r#"
INSERT INTO posts (title, body, created_at, updated_at, account_id)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_POST_BY_ID: &str = r#"
SELECT id, title, body, created_at, updated_at, account_id
FROM posts
WHERE id = ?1
"#;

pub const SELECT_POSTS: &str = r#"
SELECT id, title, body, created_at, updated_at, account_id
FROM posts
WHERE (?1 IS NULL OR instr(title, ?1) > 0)
  AND (?2 IS NULL OR account_id = ?2)
ORDER BY id
LIMIT ?3 OFFSET ?4
"#;

pub const UPDATE_POST: &str = r#"
UPDATE posts
SET title = ?2, body = ?3, updated_at = ?4
WHERE id = ?1
"#;

pub const DELETE_POST: &str = "DELETE FROM posts WHERE id = ?1";

// Comment queries
pub const INSERT_COMMENT: &str = r#"
INSERT INTO comments (body, created_at, updated_at, account_id, post_id)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_COMMENT_BY_ID: &str = r#"
SELECT id, body, created_at, updated_at, account_id, post_id
FROM comments
WHERE id = ?1
"#;

pub const SELECT_COMMENTS: &str = r#"
SELECT id, body, created_at, updated_at, account_id, post_id
FROM comments
WHERE (?1 IS NULL OR post_id = ?1)
  AND (?2 IS NULL OR account_id = ?2)
ORDER BY id
LIMIT ?3 OFFSET ?4
"#;

pub const UPDATE_COMMENT: &str = r#"
UPDATE comments
SET body = ?2, updated_at = ?3
WHERE id = ?1
"#;

pub const DELETE_COMMENT: &str = "DELETE FROM comments WHERE id = ?1";
