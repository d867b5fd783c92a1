pub mod accounts;
pub mod comments;
pub mod error;
pub mod extract;
pub mod health;
pub mod posts;

pub use error::ApiError;
pub use extract::{ApiJson, ApiPath, ApiQuery};
