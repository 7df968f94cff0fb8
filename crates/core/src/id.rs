//! Strongly-typed identifiers and the unique id source.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a family record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(Arc<str>);

/// Identifier of a family expense record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(Arc<str>);

macro_rules! impl_string_newtype {
    ($t:ty) => {
        impl $t {
            /// Draw a fresh identifier from `ids`.
            pub fn generate(ids: &dyn IdGenerator) -> Self {
                Self::from(ids.next_id())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(Arc::from(value))
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(Arc::from(value))
            }
        }
    };
}

impl_string_newtype!(FamilyId);
impl_string_newtype!(ExpenseId);

/// Source of collision-free identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random (v4) uuid strings backed by the platform RNG.
#[derive(Debug, Default, Copy, Clone)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic uuid strings (`00000000-...-000000000001`, `...02`, ...).
///
/// Intended for tests; unique within one generator instance only.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        Uuid::from_u128(u128::from(n)).to_string()
    }
}
