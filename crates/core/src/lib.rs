//! `famledger-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no storage, no transport).
//! The host-provided collaborators the households services rely on (clock and
//! unique id source) are modelled here as small traits.

pub mod entity;
pub mod error;
pub mod id;
pub mod time;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ExpenseId, FamilyId, IdGenerator, RandomIds, SequentialIds};
pub use time::{Clock, ManualClock, SystemClock, Timestamp};
