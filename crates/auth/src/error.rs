use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors for the postline_auth crate.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid authorization header")]
    InvalidHeader,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    TokenExpired,

    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("password hash error: {0}")]
    PasswordHash(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::InvalidHeader | AuthError::InvalidToken(_) | AuthError::TokenExpired => {
                tracing::debug!(error = %self, "Rejected credentials");
                (StatusCode::UNAUTHORIZED, "unauthorized".to_string())
            }
            AuthError::Signing(_) | AuthError::PasswordHash(_) => {
                tracing::error!("Auth error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn status_and_body(error: AuthError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_token_errors_are_unauthorized() {
        let (status, body) = status_and_body(AuthError::TokenExpired).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");

        let (status, _) = status_and_body(AuthError::InvalidToken("bad".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_hash_errors_hide_details() {
        let (status, body) =
            status_and_body(AuthError::PasswordHash("salt too short".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal server error");
    }
}
