mod error;
mod requests;
mod responses;
mod types;
mod validation;

pub use error::{service_error_to_status_code, Resource, ServiceError, ServiceResult, ValidationError};
pub use requests::{
    CreateAccountRequest, CreateCommentRequest, CreatePostRequest, LoginRequest,
    UpdateAccountRequest, UpdateCommentRequest, UpdatePasswordRequest, UpdatePostRequest,
};
pub use responses::{AccountResponse, CommentResponse, PostResponse, TokenResponse};
pub use types::{Account, AccountFilter, Comment, CommentFilter, Entity, Id, Post, PostFilter};
pub use validation::{
    is_valid_email, validate_create_account, validate_create_comment, validate_create_post,
    validate_login, validate_update_account, validate_update_comment, validate_update_password,
    validate_update_post, MAX_BODY_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_TITLE_LEN,
    MIN_PASSWORD_LEN,
};
