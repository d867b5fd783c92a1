//! Authentication for postline.
//!
//! This crate provides:
//! - HS256 bearer tokens carrying the account id
//! - Argon2 password hashing
//! - Axum extractors resolving the acting principal

mod config;
mod error;
mod extractors;
mod password;
mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::{MaybePrincipal, API_KEY_HEADER};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKeys};
