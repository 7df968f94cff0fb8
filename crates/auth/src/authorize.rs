use thiserror::Error;

use famledger_core::DomainError;

use crate::PrincipalId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("principal '{caller}' is not the admin '{admin}'")]
    NotAdmin { caller: PrincipalId, admin: PrincipalId },
}

impl From<AuthzError> for DomainError {
    fn from(err: AuthzError) -> Self {
        DomainError::unauthorized(err.to_string())
    }
}

/// Allow the call only when `caller` is the recorded `admin`.
///
/// - No IO
/// - No panics
/// - Equality only; issuing and validating identities is the host's job
pub fn ensure_admin(caller: &PrincipalId, admin: &PrincipalId) -> Result<(), AuthzError> {
    if caller == admin {
        Ok(())
    } else {
        Err(AuthzError::NotAdmin {
            caller: caller.clone(),
            admin: admin.clone(),
        })
    }
}
