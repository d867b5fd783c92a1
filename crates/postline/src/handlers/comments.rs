use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;

use postline_auth::MaybePrincipal;
use postline_core::blog::{
    CommentResponse, CreateCommentRequest, Id, ServiceError, UpdateCommentRequest,
    ValidationError,
};
use postline_core::storage::Page;

use super::{ApiError, ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

/// Query parameters for listing comments. `post_id` is required.
#[derive(Debug, Deserialize)]
pub struct CommentListQuery {
    pub post_id: Option<Id>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Comment on a post (POST /v1/comments).
pub async fn create_comment(
    State(state): State<AppState>,
    principal: MaybePrincipal,
    ApiJson(request): ApiJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = state.comments.create(principal.principal(), request).await?;
    Ok((StatusCode::CREATED, Json(CommentResponse::from_comment(&comment))))
}

/// List the comments of a post (GET /v1/comments?post_id=).
pub async fn list_comments(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CommentListQuery>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let post_id = query
        .post_id
        .ok_or(ServiceError::ValidationFailed(ValidationError::Required("post_id")))?;
    let page = Page::from_query(query.limit, query.offset);

    let comments = state.comments.list(page, post_id).await?;
    Ok(Json(comments.iter().map(CommentResponse::from_comment).collect()))
}

/// Get a single comment (GET /v1/comments/{id}).
pub async fn get_comment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<CommentResponse>, ApiError> {
    let comment = state.comments.get(id).await?;
    Ok(Json(CommentResponse::from_comment(&comment)))
}

/// Update a comment (PUT /v1/comments/{id}).
pub async fn update_comment(
    State(state): State<AppState>,
    principal: MaybePrincipal,
    ApiPath(id): ApiPath<Id>,
    ApiJson(request): ApiJson<UpdateCommentRequest>,
) -> Result<Json<CommentResponse>, ApiError> {
    let comment = state
        .comments
        .update(principal.principal(), id, request)
        .await?;
    Ok(Json(CommentResponse::from_comment(&comment)))
}

/// Delete a comment (DELETE /v1/comments/{id}).
pub async fn delete_comment(
    State(state): State<AppState>,
    principal: MaybePrincipal,
    ApiPath(id): ApiPath<Id>,
) -> Result<StatusCode, ApiError> {
    state.comments.delete(principal.principal(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
