//! Households domain module: the family registry and the expense ledger.
//!
//! Both services are thin layers over a [`KeyValueStore`](famledger_store::KeyValueStore).
//! Every operation runs to completion against the store before returning, and
//! every rejected call is rejected before anything is written.

pub mod error;
pub mod expense;
pub mod family;

#[cfg(test)]
mod scenarios;
#[cfg(test)]
mod test_support;

pub use error::{HouseholdError, HouseholdResult};
pub use expense::{ExpenseDeletion, ExpenseLedger, FamilyExpense, FamilyExpensePayload};
pub use family::{Family, FamilyPayload, FamilyRegistry};
