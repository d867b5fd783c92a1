use std::fmt;

use thiserror::Error;

/// The resource a service operation acted on, used to qualify `NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Account,
    Post,
    Comment,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Account => write!(f, "account"),
            Resource::Post => write!(f, "post"),
            Resource::Comment => write!(f, "comment"),
        }
    }
}

/// Structural validation failures for incoming requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} too long (max {max} characters)")]
    TooLong { field: &'static str, max: usize },
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("invalid email address")]
    InvalidEmail,
}

/// Errors surfaced by resource services.
///
/// Every storage or cache fault other than "not found" collapses into
/// `Server`; the cause is logged where the translation happens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(Resource),
    #[error("unauthorized")]
    Unauthorized,
    #[error("validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("wrong password")]
    WrongPassword,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("internal server error")]
    Server,
}

/// Result type alias for service operations.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Maps a service error to its HTTP status code.
///
/// Kept free of any HTTP crate so the core stays I/O-agnostic.
///
/// # Examples
///
/// ```
/// use postline_core::blog::{service_error_to_status_code, Resource, ServiceError};
///
/// assert_eq!(service_error_to_status_code(&ServiceError::NotFound(Resource::Post)), 404);
/// assert_eq!(service_error_to_status_code(&ServiceError::Unauthorized), 401);
/// ```
pub fn service_error_to_status_code(error: &ServiceError) -> u16 {
    match error {
        ServiceError::NotFound(_) => 404,
        ServiceError::Unauthorized => 401,
        ServiceError::ValidationFailed(_) => 400,
        ServiceError::Conflict(_) => 409,
        ServiceError::WrongPassword => 400,
        ServiceError::InvalidCredentials => 401,
        ServiceError::Server => 500,
    }
}
