use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use postline_core::authz::Principal;
use postline_core::blog::Id;
use serde::{Deserialize, Serialize};

use crate::{AuthConfig, AuthError};

/// Claims carried by an issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id of the bearer.
    pub id: Id,
    pub iat: i64,
    pub exp: i64,
}

/// Signing and verification keys for HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl)
    }

    /// Issues a token for `account_id` valid from now.
    pub fn issue(&self, account_id: Id) -> Result<String, AuthError> {
        self.issue_at(account_id, Utc::now())
    }

    /// Issues a token for `account_id` as if signed at `issued_at`.
    pub fn issue_at(&self, account_id: Id, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| AuthError::Signing(e.to_string()))?;
        let claims = Claims {
            id: account_id,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verifies signature and expiry, returning the bearer's principal.
    pub fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(Principal::new(data.claims.id))
    }
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new("test-secret", Duration::from_secs(3600))
    }

    #[test]
    fn test_issue_and_verify() {
        let keys = keys();
        let token = keys.issue(42).unwrap();

        assert_eq!(keys.verify(&token).unwrap(), Principal::new(42));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let keys = keys();
        let issued_at = Utc::now() - chrono::Duration::hours(3);
        let token = keys.issue_at(42, issued_at).unwrap();

        assert!(matches!(keys.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = TokenKeys::new("other-secret", Duration::from_secs(3600))
            .issue(42)
            .unwrap();

        assert!(matches!(
            keys().verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            keys().verify("not-a-jwt"),
            Err(AuthError::InvalidToken(_))
        ));
    }
}
