//! Resource services.
//!
//! Each service validates the request, applies the ownership guard, and
//! drives a repository. Repository and auth faults are translated into
//! `ServiceError` here and nowhere else.

mod account;
mod auth;
mod comment;
mod post;

pub use account::AccountService;
pub use auth::AuthService;
pub use comment::CommentService;
pub use post::PostService;

use postline_core::authz::{Denial, Principal};
use postline_core::blog::{Entity, Id, Resource, ServiceError, ServiceResult};
use postline_core::storage::{repository_error_to_status_code, Page, Repository, RepositoryError};

/// Translates a repository fault into the service taxonomy.
///
/// `NotFound` keeps its meaning and a unique-constraint race becomes a
/// conflict. Anything else is logged and collapses into `Server`.
fn translate(resource: Resource) -> impl Fn(RepositoryError) -> ServiceError {
    move |err| match err {
        RepositoryError::NotFound { .. } => ServiceError::NotFound(resource),
        RepositoryError::AlreadyExists { id, .. } => {
            ServiceError::Conflict(format!("{resource} {id} already exists"))
        }
        other => {
            tracing::error!(
                %resource,
                error = %other,
                upstream_status = repository_error_to_status_code(&other),
                "Repository operation failed"
            );
            ServiceError::Server
        }
    }
}

/// Logs a guard refusal and converts it to `Unauthorized`.
fn denied(resource: Resource, id: Id) -> impl Fn(Denial) -> ServiceError {
    move |denial| {
        tracing::warn!(%resource, id, reason = %denial, "Ownership check denied");
        ServiceError::from(denial)
    }
}

/// Logs an auth-crate fault and collapses it into `Server`.
fn auth_failure(err: postline_auth::AuthError) -> ServiceError {
    tracing::error!(error = %err, "Credential operation failed");
    ServiceError::Server
}

/// Hashes a password on the blocking pool; Argon2 is CPU bound.
async fn hash_blocking(password: String) -> ServiceResult<String> {
    tokio::task::spawn_blocking(move || postline_auth::hash_password(&password))
        .await
        .map_err(join_failure)?
        .map_err(auth_failure)
}

/// Verifies a password against a stored hash on the blocking pool.
async fn verify_blocking(password: String, hash: String) -> ServiceResult<bool> {
    tokio::task::spawn_blocking(move || postline_auth::verify_password(&password, &hash))
        .await
        .map_err(join_failure)?
        .map_err(auth_failure)
}

fn join_failure(err: tokio::task::JoinError) -> ServiceError {
    tracing::error!(error = %err, "Credential task did not complete");
    ServiceError::Server
}

fn require(principal: Option<&Principal>, resource: Resource) -> ServiceResult<Principal> {
    postline_core::authz::require_principal(principal).map_err(|denial| {
        tracing::warn!(%resource, reason = %denial, "Unauthenticated mutation");
        ServiceError::from(denial)
    })
}

/// Collects the ids of every row matching `filter`, one full page at a time.
async fn collect_ids<E: Entity>(
    repo: &dyn Repository<E>,
    filter: &E::Filter,
    resource: Resource,
) -> ServiceResult<Vec<Id>> {
    let mut ids = Vec::new();
    let mut offset = 0;
    loop {
        let batch = repo
            .list(Page::new(Page::MAX_LIMIT, offset), filter)
            .await
            .map_err(translate(resource))?;
        let fetched = batch.len() as u32;
        ids.extend(batch.iter().map(Entity::id));
        if fetched < Page::MAX_LIMIT {
            return Ok(ids);
        }
        offset += fetched;
    }
}

/// Deletes every row matching `filter` through the repository.
///
/// Stores cascade on their own, but only a repository delete drops the
/// cached snapshot, so dependents are removed one by one before their parent.
async fn delete_matching<E: Entity>(
    repo: &dyn Repository<E>,
    filter: &E::Filter,
    resource: Resource,
) -> ServiceResult<usize> {
    let ids = collect_ids(repo, filter, resource).await?;
    for id in &ids {
        repo.delete(*id).await.map_err(translate(resource))?;
    }
    Ok(ids.len())
}
