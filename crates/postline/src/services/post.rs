use std::sync::Arc;

use chrono::Utc;

use postline_core::authz::{authorize_owner, Principal};
use postline_core::blog::{
    validate_create_post, validate_update_post, Comment, CommentFilter, CreatePostRequest, Id,
    Post, PostFilter, Resource, ServiceResult, UpdatePostRequest,
};
use postline_core::storage::{Page, Repository};

use super::{delete_matching, denied, require, translate};

/// Post operations.
///
/// Holds the comment repository as well so that deleting a post also
/// evicts its comments from the cache.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn Repository<Post>>,
    comments: Arc<dyn Repository<Comment>>,
}

impl PostService {
    pub fn new(posts: Arc<dyn Repository<Post>>, comments: Arc<dyn Repository<Comment>>) -> Self {
        Self { posts, comments }
    }

    /// Creates a post owned by the principal.
    pub async fn create(
        &self,
        principal: Option<&Principal>,
        request: CreatePostRequest,
    ) -> ServiceResult<Post> {
        validate_create_post(&request)?;
        let principal = require(principal, Resource::Post)?;

        let post = Post::new(request.title, request.body, principal.account_id, Utc::now());
        let post = self
            .posts
            .create(post)
            .await
            .map_err(translate(Resource::Post))?;

        tracing::info!(post_id = post.id, account_id = post.account_id, "Created post");
        Ok(post)
    }

    pub async fn list(&self, page: Page, filter: &PostFilter) -> ServiceResult<Vec<Post>> {
        self.posts
            .list(page, filter)
            .await
            .map_err(translate(Resource::Post))
    }

    pub async fn get(&self, id: Id) -> ServiceResult<Post> {
        self.posts.get(id).await.map_err(translate(Resource::Post))
    }

    /// Replaces title and body. Only the owner may update.
    pub async fn update(
        &self,
        principal: Option<&Principal>,
        id: Id,
        request: UpdatePostRequest,
    ) -> ServiceResult<Post> {
        validate_update_post(&request)?;

        let mut post = self.get(id).await?;
        authorize_owner(principal, post.account_id).map_err(denied(Resource::Post, id))?;

        post.title = request.title;
        post.body = request.body;
        post.updated_at = Some(Utc::now());

        let post = self
            .posts
            .update(post)
            .await
            .map_err(translate(Resource::Post))?;

        tracing::info!(post_id = id, "Updated post");
        Ok(post)
    }

    /// Deletes a post and its comments.
    pub async fn delete(&self, principal: Option<&Principal>, id: Id) -> ServiceResult<()> {
        let post = self.get(id).await?;
        authorize_owner(principal, post.account_id).map_err(denied(Resource::Post, id))?;

        purge_post(self.posts.as_ref(), self.comments.as_ref(), id).await
    }
}

/// Deletes a post after its comments, leaf first.
pub(super) async fn purge_post(
    posts: &dyn Repository<Post>,
    comments: &dyn Repository<Comment>,
    id: Id,
) -> ServiceResult<()> {
    let removed =
        delete_matching(comments, &CommentFilter::on_post(id), Resource::Comment).await?;

    posts
        .delete(id)
        .await
        .map_err(translate(Resource::Post))?;

    tracing::info!(post_id = id, comments = removed, "Deleted post");
    Ok(())
}
