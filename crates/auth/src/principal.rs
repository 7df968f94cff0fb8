use core::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of a calling principal.
///
/// Opaque to this system: it is issued and validated by the host, and only
/// ever compared for equality against a stored admin.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(Arc<str>);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("principal id must not be empty")]
pub struct InvalidPrincipal;

impl PrincipalId {
    /// Accepts any non-blank token; surrounding whitespace is trimmed.
    pub fn parse(raw: &str) -> Result<Self, InvalidPrincipal> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(InvalidPrincipal);
        }
        Ok(Self(Arc::from(raw)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PrincipalId {
    type Err = InvalidPrincipal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
