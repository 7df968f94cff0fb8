//! `famledger-auth` — caller identity and admin-ownership checks.
//!
//! This crate is intentionally decoupled from HTTP and storage: the hosting
//! environment establishes who is calling, and this crate only compares that
//! identity against the admin recorded on a family.

pub mod authorize;
pub mod principal;

pub use authorize::{AuthzError, ensure_admin};
pub use principal::{InvalidPrincipal, PrincipalId};
