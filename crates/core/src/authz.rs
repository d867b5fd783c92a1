//! Ownership guard.
//!
//! Pure functions deciding whether the acting principal may mutate a resource.
//! Only the owner may; there are no roles and no delegation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blog::{Id, ServiceError};

/// The authenticated identity attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub account_id: Id,
}

impl Principal {
    pub fn new(account_id: Id) -> Self {
        Self { account_id }
    }
}

/// Why the guard refused an operation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    #[error("no authenticated principal")]
    Unauthenticated,
    #[error("account {principal} does not own resource owned by {owner}")]
    NotOwner { principal: Id, owner: Id },
}

impl From<Denial> for ServiceError {
    fn from(_: Denial) -> Self {
        ServiceError::Unauthorized
    }
}

/// Requires that a principal is present.
pub fn require_principal(principal: Option<&Principal>) -> Result<Principal, Denial> {
    principal.copied().ok_or(Denial::Unauthenticated)
}

/// Allows the operation only when the principal owns the resource.
///
/// # Examples
///
/// ```
/// use postline_core::authz::{authorize_owner, Denial, Principal};
///
/// let owner = Principal::new(7);
/// assert_eq!(authorize_owner(Some(&owner), 7), Ok(owner));
/// assert_eq!(
///     authorize_owner(Some(&owner), 8),
///     Err(Denial::NotOwner { principal: 7, owner: 8 })
/// );
/// assert_eq!(authorize_owner(None, 7), Err(Denial::Unauthenticated));
/// ```
pub fn authorize_owner(principal: Option<&Principal>, owner_id: Id) -> Result<Principal, Denial> {
    let principal = require_principal(principal)?;
    if principal.account_id != owner_id {
        return Err(Denial::NotOwner {
            principal: principal.account_id,
            owner: owner_id,
        });
    }
    Ok(principal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_allowed() {
        let principal = Principal::new(1);
        assert_eq!(authorize_owner(Some(&principal), 1), Ok(principal));
    }

    #[test]
    fn other_account_is_denied() {
        let principal = Principal::new(1);
        assert_eq!(
            authorize_owner(Some(&principal), 2),
            Err(Denial::NotOwner {
                principal: 1,
                owner: 2
            })
        );
    }

    #[test]
    fn missing_principal_is_denied() {
        assert_eq!(require_principal(None), Err(Denial::Unauthenticated));
        assert_eq!(authorize_owner(None, 1), Err(Denial::Unauthenticated));
    }

    #[test]
    fn denials_map_to_unauthorized() {
        assert_eq!(
            ServiceError::from(Denial::Unauthenticated),
            ServiceError::Unauthorized
        );
        assert_eq!(
            ServiceError::from(Denial::NotOwner {
                principal: 1,
                owner: 2
            }),
            ServiceError::Unauthorized
        );
    }
}
