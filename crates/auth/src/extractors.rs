//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use postline_core::authz::Principal;

use crate::{AuthError, TokenKeys};

/// Header carrying a bare token, checked before `Authorization`.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extractor for the optional acting principal.
///
/// A request without credentials yields `None` so that public reads work;
/// credentials that are present but invalid are rejected with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybePrincipal(pub Option<Principal>);

impl MaybePrincipal {
    pub fn principal(&self) -> Option<&Principal> {
        self.0.as_ref()
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    if let Some(value) = headers.get(API_KEY_HEADER) {
        let token = value.to_str().map_err(|_| AuthError::InvalidHeader)?.trim();
        if token.is_empty() {
            return Err(AuthError::InvalidHeader);
        }
        return Ok(Some(token));
    }

    match headers.get(AUTHORIZATION) {
        Some(value) => {
            let header_value = value.to_str().map_err(|_| AuthError::InvalidHeader)?;
            header_value
                .strip_prefix("Bearer ")
                .map(|token| Some(token.trim()))
                .ok_or(AuthError::InvalidHeader)
        }
        None => Ok(None),
    }
}

impl<S> FromRequestParts<S> for MaybePrincipal
where
    TokenKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers)? else {
            return Ok(MaybePrincipal(None));
        };

        let keys = TokenKeys::from_ref(state);
        let principal = keys.verify(token)?;

        tracing::trace!(account_id = principal.account_id, "Authenticated request");
        Ok(MaybePrincipal(Some(principal)))
    }
}
