//! Pure functions for mapping repository errors to HTTP status codes.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404
/// - `AlreadyExists` -> 409
/// - `ConnectionFailed` and `Cache` -> 503
/// - `QueryFailed` and `Serialization` -> 500
/// - `InvalidData` -> 400
///
/// Services translate repository errors before they reach a handler, so this
/// is only consulted for diagnostics.
///
/// # Examples
///
/// ```
/// use postline_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::not_found("post", 42);
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::InvalidData(_) => 400,
        RepositoryError::Cache(_) => 503,
    }
}
