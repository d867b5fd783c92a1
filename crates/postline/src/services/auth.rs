use std::sync::Arc;

use postline_auth::TokenKeys;
use postline_core::blog::{validate_login, LoginRequest, Resource, ServiceError, ServiceResult};
use postline_core::storage::AccountRepository;

use super::{auth_failure, translate, verify_blocking};

/// Exchanges credentials for a bearer token.
#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    keys: TokenKeys,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn AccountRepository>, keys: TokenKeys) -> Self {
        Self { accounts, keys }
    }

    /// Verifies email and password and issues a token for the account.
    ///
    /// An unknown email and a wrong password are indistinguishable to the caller.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<String> {
        validate_login(&request)?;

        let account = self
            .accounts
            .get_by_email(&request.email)
            .await
            .map_err(translate(Resource::Account))?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !verify_blocking(request.password, account.password).await? {
            tracing::warn!(account_id = account.id, "Login rejected: wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.keys.issue(account.id).map_err(auth_failure)?;
        tracing::info!(account_id = account.id, "Issued token");
        Ok(token)
    }
}
