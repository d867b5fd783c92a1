//! SQLite row conversion functions.
//!
//! Timestamps are stored as RFC 3339 text.

use chrono::{DateTime, Utc};
use postline_core::blog::{Account, Comment, Post};
use rusqlite::Row;

/// Convert a SQLite row to an Account.
///
/// Expected columns: id, name, email, password, created_at, updated_at
pub fn row_to_account(row: &Row) -> rusqlite::Result<Account> {
    let created_at: String = row.get(4)?;
    let updated_at: Option<String> = row.get(5)?;

    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        created_at: parse_datetime(4, &created_at)?,
        updated_at: parse_optional_datetime(5, updated_at)?,
    })
}

/// Convert a SQLite row to a Post.
///
/// Expected columns: id, title, body, created_at, updated_at, account_id
pub fn row_to_post(row: &Row) -> rusqlite::Result<Post> {
    let created_at: String = row.get(3)?;
    let updated_at: Option<String> = row.get(4)?;

    Ok(Post {
        id: row.get(0)?,
        title: row.get(1)?,
        body: row.get(2)?,
        created_at: parse_datetime(3, &created_at)?,
        updated_at: parse_optional_datetime(4, updated_at)?,
        account_id: row.get(5)?,
    })
}

/// Convert a SQLite row to a Comment.
///
/// Expected columns: id, body, created_at, updated_at, account_id, post_id
pub fn row_to_comment(row: &Row) -> rusqlite::Result<Comment> {
    let created_at: String = row.get(2)?;
    let updated_at: Option<String> = row.get(3)?;

    Ok(Comment {
        id: row.get(0)?,
        body: row.get(1)?,
        created_at: parse_datetime(2, &created_at)?,
        updated_at: parse_optional_datetime(3, updated_at)?,
        account_id: row.get(4)?,
        post_id: row.get(5)?,
    })
}

fn parse_datetime(column: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_optional_datetime(
    column: usize,
    s: Option<String>,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    s.map(|s| parse_datetime(column, &s)).transpose()
}

/// Format a DateTime for SQLite storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub fn format_optional_datetime(dt: &Option<DateTime<Utc>>) -> Option<String> {
    dt.as_ref().map(format_datetime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_datetime_round_trips_through_text() {
        let dt = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        let text = format_datetime(&dt);

        assert_eq!(text, "2024-06-15T10:30:00+00:00");
        assert_eq!(parse_datetime(0, &text).unwrap(), dt);
    }

    #[test]
    fn test_missing_updated_at_is_none() {
        assert_eq!(parse_optional_datetime(5, None).unwrap(), None);
        assert_eq!(format_optional_datetime(&None), None);
    }

    #[test]
    fn test_malformed_datetime_reports_column() {
        let err = parse_datetime(3, "yesterday").unwrap_err();

        assert!(matches!(
            err,
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, _)
        ));
    }
}
