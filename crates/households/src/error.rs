use thiserror::Error;

use famledger_core::DomainError;
use famledger_store::StoreError;

pub type HouseholdResult<T> = Result<T, HouseholdError>;

#[derive(Debug, Error)]
pub enum HouseholdError {
    /// NotFound / Unauthorized and other expected rejections.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The storage collaborator failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl HouseholdError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::Domain(DomainError::not_found(msg))
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Domain(DomainError::unauthorized(msg))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_not_found())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_unauthorized())
    }
}
