use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;

use postline_auth::MaybePrincipal;
use postline_core::blog::{CreatePostRequest, Id, PostFilter, PostResponse, UpdatePostRequest};
use postline_core::storage::Page;

use super::{ApiError, ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

/// Query parameters for listing posts.
#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Substring match on the title.
    pub title: Option<String>,
}

/// Create a post (POST /v1/posts).
pub async fn create_post(
    State(state): State<AppState>,
    principal: MaybePrincipal,
    ApiJson(request): ApiJson<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.posts.create(principal.principal(), request).await?;
    Ok((StatusCode::CREATED, Json(PostResponse::from_post(&post))))
}

/// List posts (GET /v1/posts).
pub async fn list_posts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PostListQuery>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let page = Page::from_query(query.limit, query.offset);
    let filter = PostFilter {
        title: query.title,
        account_id: None,
    };

    let posts = state.posts.list(page, &filter).await?;
    Ok(Json(posts.iter().map(PostResponse::from_post).collect()))
}

/// Get a single post (GET /v1/posts/{id}).
pub async fn get_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state.posts.get(id).await?;
    Ok(Json(PostResponse::from_post(&post)))
}

/// Update a post (PUT /v1/posts/{id}).
pub async fn update_post(
    State(state): State<AppState>,
    principal: MaybePrincipal,
    ApiPath(id): ApiPath<Id>,
    ApiJson(request): ApiJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state
        .posts
        .update(principal.principal(), id, request)
        .await?;
    Ok(Json(PostResponse::from_post(&post)))
}

/// Delete a post and its comments (DELETE /v1/posts/{id}).
pub async fn delete_post(
    State(state): State<AppState>,
    principal: MaybePrincipal,
    ApiPath(id): ApiPath<Id>,
) -> Result<StatusCode, ApiError> {
    state.posts.delete(principal.principal(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
