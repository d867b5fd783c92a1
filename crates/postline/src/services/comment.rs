use std::sync::Arc;

use chrono::Utc;

use postline_core::authz::{authorize_owner, Principal};
use postline_core::blog::{
    validate_create_comment, validate_update_comment, Comment, CommentFilter, CreateCommentRequest,
    Id, Post, Resource, ServiceResult, UpdateCommentRequest,
};
use postline_core::storage::{Page, Repository};

use super::{denied, require, translate};

/// Comment operations.
///
/// Holds the post repository as well so that a comment is only accepted
/// for a post that exists.
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn Repository<Comment>>,
    posts: Arc<dyn Repository<Post>>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn Repository<Comment>>, posts: Arc<dyn Repository<Post>>) -> Self {
        Self { comments, posts }
    }

    pub async fn create(
        &self,
        principal: Option<&Principal>,
        request: CreateCommentRequest,
    ) -> ServiceResult<Comment> {
        validate_create_comment(&request)?;
        let principal = require(principal, Resource::Comment)?;

        let post = self
            .posts
            .get(request.post_id)
            .await
            .map_err(translate(Resource::Post))?;

        let comment = Comment::new(request.body, principal.account_id, post.id, Utc::now());
        let comment = self
            .comments
            .create(comment)
            .await
            .map_err(translate(Resource::Comment))?;

        tracing::info!(
            comment_id = comment.id,
            post_id = comment.post_id,
            account_id = comment.account_id,
            "Created comment"
        );
        Ok(comment)
    }

    /// Lists the comments of one post.
    pub async fn list(&self, page: Page, post_id: Id) -> ServiceResult<Vec<Comment>> {
        self.comments
            .list(page, &CommentFilter::on_post(post_id))
            .await
            .map_err(translate(Resource::Comment))
    }

    pub async fn get(&self, id: Id) -> ServiceResult<Comment> {
        self.comments
            .get(id)
            .await
            .map_err(translate(Resource::Comment))
    }

    pub async fn update(
        &self,
        principal: Option<&Principal>,
        id: Id,
        request: UpdateCommentRequest,
    ) -> ServiceResult<Comment> {
        validate_update_comment(&request)?;

        let mut comment = self.get(id).await?;
        authorize_owner(principal, comment.account_id).map_err(denied(Resource::Comment, id))?;

        comment.body = request.body;
        comment.updated_at = Some(Utc::now());

        let comment = self
            .comments
            .update(comment)
            .await
            .map_err(translate(Resource::Comment))?;

        tracing::info!(comment_id = id, "Updated comment");
        Ok(comment)
    }

    pub async fn delete(&self, principal: Option<&Principal>, id: Id) -> ServiceResult<()> {
        let comment = self.get(id).await?;
        authorize_owner(principal, comment.account_id).map_err(denied(Resource::Comment, id))?;

        self.comments
            .delete(id)
            .await
            .map_err(translate(Resource::Comment))?;

        tracing::info!(comment_id = id, "Deleted comment");
        Ok(())
    }
}
