use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;

use postline_auth::MaybePrincipal;
use postline_core::blog::{
    AccountFilter, AccountResponse, CreateAccountRequest, Id, LoginRequest, TokenResponse,
    UpdateAccountRequest, UpdatePasswordRequest,
};
use postline_core::storage::Page;

use super::{ApiError, ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct AccountListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Substring match on the account name.
    pub name: Option<String>,
}

/// Exchange credentials for a token (POST /v1/accounts/auth).
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.auth.login(request).await?;
    Ok(Json(TokenResponse { token }))
}

/// Register an account (POST /v1/accounts).
pub async fn create_account(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.accounts.create(request).await?;
    Ok((StatusCode::CREATED, Json(AccountResponse::from_account(&account))))
}

/// List accounts (GET /v1/accounts).
pub async fn list_accounts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AccountListQuery>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let page = Page::from_query(query.limit, query.offset);
    let filter = AccountFilter { name: query.name };

    let accounts = state.accounts.list(page, &filter).await?;
    Ok(Json(accounts.iter().map(AccountResponse::from_account).collect()))
}

/// Get a single account (GET /v1/accounts/{id}).
pub async fn get_account(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.accounts.get(id).await?;
    Ok(Json(AccountResponse::from_account(&account)))
}

/// Update name and email (PUT /v1/accounts/{id}).
pub async fn update_account(
    State(state): State<AppState>,
    principal: MaybePrincipal,
    ApiPath(id): ApiPath<Id>,
    ApiJson(request): ApiJson<UpdateAccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .accounts
        .update(principal.principal(), id, request)
        .await?;
    Ok(Json(AccountResponse::from_account(&account)))
}

/// Change the password (PUT /v1/accounts/{id}/password).
pub async fn update_password(
    State(state): State<AppState>,
    principal: MaybePrincipal,
    ApiPath(id): ApiPath<Id>,
    ApiJson(request): ApiJson<UpdatePasswordRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .accounts
        .update_password(principal.principal(), id, request)
        .await?;
    Ok(Json(AccountResponse::from_account(&account)))
}

/// Delete an account with its posts and comments (DELETE /v1/accounts/{id}).
pub async fn delete_account(
    State(state): State<AppState>,
    principal: MaybePrincipal,
    ApiPath(id): ApiPath<Id>,
) -> Result<StatusCode, ApiError> {
    state.accounts.delete(principal.principal(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
