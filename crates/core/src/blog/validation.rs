use super::error::ValidationError;
use super::requests::{
    CreateAccountRequest, CreateCommentRequest, CreatePostRequest, LoginRequest,
    UpdateAccountRequest, UpdateCommentRequest, UpdatePasswordRequest, UpdatePostRequest,
};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_BODY_LEN: usize = 20_000;
pub const MIN_PASSWORD_LEN: usize = 8;

fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

fn bounded(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    required(field, value)?;
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required("password"));
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Checks that an email has the `local@domain.tld` shape.
///
/// This is a structural check only; deliverability is not verified.
///
/// # Examples
///
/// ```
/// use postline_core::blog::is_valid_email;
///
/// assert!(is_valid_email("ada@example.com"));
/// assert!(!is_valid_email("ada@localhost"));
/// assert!(!is_valid_email("not an email"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn email(value: &str) -> Result<(), ValidationError> {
    bounded("email", value, MAX_EMAIL_LEN)?;
    if !is_valid_email(value) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_create_account(request: &CreateAccountRequest) -> Result<(), ValidationError> {
    bounded("name", &request.name, MAX_NAME_LEN)?;
    email(&request.email)?;
    password(&request.password)
}

pub fn validate_update_account(request: &UpdateAccountRequest) -> Result<(), ValidationError> {
    bounded("name", &request.name, MAX_NAME_LEN)?;
    email(&request.email)
}

pub fn validate_update_password(request: &UpdatePasswordRequest) -> Result<(), ValidationError> {
    if request.old_password.is_empty() {
        return Err(ValidationError::Required("old_password"));
    }
    password(&request.new_password)
}

/// Login only checks presence; a short password simply fails to match.
pub fn validate_login(request: &LoginRequest) -> Result<(), ValidationError> {
    required("email", &request.email)?;
    if request.password.is_empty() {
        return Err(ValidationError::Required("password"));
    }
    Ok(())
}

pub fn validate_create_post(request: &CreatePostRequest) -> Result<(), ValidationError> {
    bounded("title", &request.title, MAX_TITLE_LEN)?;
    bounded("body", &request.body, MAX_BODY_LEN)
}

pub fn validate_update_post(request: &UpdatePostRequest) -> Result<(), ValidationError> {
    bounded("title", &request.title, MAX_TITLE_LEN)?;
    bounded("body", &request.body, MAX_BODY_LEN)
}

pub fn validate_create_comment(request: &CreateCommentRequest) -> Result<(), ValidationError> {
    if request.post_id <= 0 {
        return Err(ValidationError::Required("post_id"));
    }
    bounded("body", &request.body, MAX_BODY_LEN)
}

pub fn validate_update_comment(request: &UpdateCommentRequest) -> Result<(), ValidationError> {
    bounded("body", &request.body, MAX_BODY_LEN)
}
