use std::sync::Arc;

use chrono::Utc;

use postline_core::authz::{authorize_owner, Principal};
use postline_core::blog::{
    validate_create_account, validate_update_account, validate_update_password, Account,
    AccountFilter, Comment, CommentFilter, CreateAccountRequest, Id, Post, PostFilter, Resource,
    ServiceError, ServiceResult, UpdateAccountRequest, UpdatePasswordRequest,
};
use postline_core::storage::{AccountRepository, Page, Repository};

use super::post::purge_post;
use super::{collect_ids, delete_matching, denied, hash_blocking, translate, verify_blocking};

/// Account operations.
///
/// An account is its own owner: mutations compare the principal with the
/// target id directly. Post and comment repositories are held for deletes.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    posts: Arc<dyn Repository<Post>>,
    comments: Arc<dyn Repository<Comment>>,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        posts: Arc<dyn Repository<Post>>,
        comments: Arc<dyn Repository<Comment>>,
    ) -> Self {
        Self {
            accounts,
            posts,
            comments,
        }
    }

    /// Registers a new account. No principal is required.
    pub async fn create(&self, request: CreateAccountRequest) -> ServiceResult<Account> {
        validate_create_account(&request)?;
        self.ensure_email_free(&request.email, None).await?;

        let hash = hash_blocking(request.password).await?;
        let account = Account::new(request.name, request.email, hash, Utc::now());
        let account = self
            .accounts
            .create(account)
            .await
            .map_err(translate(Resource::Account))?;

        tracing::info!(account_id = account.id, "Created account");
        Ok(account)
    }

    pub async fn list(&self, page: Page, filter: &AccountFilter) -> ServiceResult<Vec<Account>> {
        self.accounts
            .list(page, filter)
            .await
            .map_err(translate(Resource::Account))
    }

    pub async fn get(&self, id: Id) -> ServiceResult<Account> {
        self.accounts
            .get(id)
            .await
            .map_err(translate(Resource::Account))
    }

    /// Replaces name and email of the principal's own account.
    pub async fn update(
        &self,
        principal: Option<&Principal>,
        id: Id,
        request: UpdateAccountRequest,
    ) -> ServiceResult<Account> {
        validate_update_account(&request)?;
        authorize_owner(principal, id).map_err(denied(Resource::Account, id))?;

        let mut account = self.get(id).await?;
        if account.email != request.email {
            self.ensure_email_free(&request.email, Some(id)).await?;
        }

        account.name = request.name;
        account.email = request.email;
        account.updated_at = Some(Utc::now());

        let account = self
            .accounts
            .update(account)
            .await
            .map_err(translate(Resource::Account))?;

        tracing::info!(account_id = id, "Updated account");
        Ok(account)
    }

    /// Changes the password after verifying the current one and returns the
    /// updated account.
    pub async fn update_password(
        &self,
        principal: Option<&Principal>,
        id: Id,
        request: UpdatePasswordRequest,
    ) -> ServiceResult<Account> {
        validate_update_password(&request)?;
        authorize_owner(principal, id).map_err(denied(Resource::Account, id))?;

        let mut account = self.get(id).await?;
        if !verify_blocking(request.old_password, account.password.clone()).await? {
            tracing::warn!(account_id = id, "Password change rejected: wrong current password");
            return Err(ServiceError::WrongPassword);
        }

        account.password = hash_blocking(request.new_password).await?;
        account.updated_at = Some(Utc::now());

        let account = self
            .accounts
            .update(account)
            .await
            .map_err(translate(Resource::Account))?;

        tracing::info!(account_id = id, "Changed account password");
        Ok(account)
    }

    /// Deletes the principal's own account along with its posts and comments.
    pub async fn delete(&self, principal: Option<&Principal>, id: Id) -> ServiceResult<()> {
        authorize_owner(principal, id).map_err(denied(Resource::Account, id))?;
        self.get(id).await?;

        // Comments the account left on other people's posts go first.
        let comments = delete_matching(
            self.comments.as_ref(),
            &CommentFilter::by_account(id),
            Resource::Comment,
        )
        .await?;

        let posts =
            collect_ids(self.posts.as_ref(), &PostFilter::by_account(id), Resource::Post).await?;
        for post_id in &posts {
            purge_post(self.posts.as_ref(), self.comments.as_ref(), *post_id).await?;
        }

        self.accounts
            .delete(id)
            .await
            .map_err(translate(Resource::Account))?;

        tracing::info!(
            account_id = id,
            posts = posts.len(),
            comments,
            "Deleted account"
        );
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str, except: Option<Id>) -> ServiceResult<()> {
        let existing = self
            .accounts
            .get_by_email(email)
            .await
            .map_err(translate(Resource::Account))?;

        match existing {
            Some(account) if Some(account.id) != except => Err(ServiceError::Conflict(format!(
                "email {email} is already registered"
            ))),
            _ => Ok(()),
        }
    }
}
