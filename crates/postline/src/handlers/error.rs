use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use postline_core::blog::{service_error_to_status_code, ServiceError};

/// Error returned by every API handler, rendered as `{"error": "<message>"}`.
#[derive(Debug)]
pub enum ApiError {
    /// A service outcome other than success.
    Service(ServiceError),
    /// The request could not be decoded (body, path, or query).
    BadRequest(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Service(err) => {
                let code = service_error_to_status_code(&err);
                let status =
                    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, err.to_string())
            }
            Self::BadRequest(message) => {
                tracing::debug!(%message, "Rejected malformed request");
                (StatusCode::BAD_REQUEST, message)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
