use std::sync::Arc;

use serde::{Deserialize, Serialize};

use famledger_auth::PrincipalId;
use famledger_core::{Clock, Entity, ExpenseId, FamilyId, IdGenerator, Timestamp};
use famledger_store::KeyValueStore;

use crate::{Family, FamilyRegistry, HouseholdError, HouseholdResult};

/// A single expense attributed to a family. Immutable once recorded.
///
/// `family_id` is a plain reference: the family may be deleted while the
/// expense stays behind (an orphan).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyExpense {
    id: ExpenseId,
    family_id: FamilyId,
    amount: f64,
    #[serde(rename = "attachmentURL")]
    attachment_url: String,
    created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyExpensePayload {
    pub family_id: FamilyId,
    pub amount: f64,
    /// Opaque pointer to supporting evidence (e.g. a receipt image).
    #[serde(rename = "attachmentURL")]
    pub attachment_url: String,
}

impl FamilyExpense {
    pub fn family_id(&self) -> &FamilyId {
        &self.family_id
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn attachment_url(&self) -> &str {
        &self.attachment_url
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

impl Entity for FamilyExpense {
    type Id = ExpenseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Result of a successful `delete_family_expense`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "expense", rename_all = "snake_case")]
pub enum ExpenseDeletion {
    /// The family's admin deleted the expense.
    Deleted(FamilyExpense),
    /// The expense referenced a family that no longer exists; it was removed
    /// without an ownership check.
    OrphanCleanup(FamilyExpense),
}

impl ExpenseDeletion {
    pub fn expense(&self) -> &FamilyExpense {
        match self {
            Self::Deleted(e) | Self::OrphanCleanup(e) => e,
        }
    }

    pub fn into_expense(self) -> FamilyExpense {
        match self {
            Self::Deleted(e) | Self::OrphanCleanup(e) => e,
        }
    }

    pub fn is_orphan_cleanup(&self) -> bool {
        matches!(self, Self::OrphanCleanup(_))
    }
}

/// Expense records plus the derived net-income view.
///
/// Reads the [`FamilyRegistry`] for existence and ownership; never writes to it.
pub struct ExpenseLedger<E, F> {
    store: E,
    families: Arc<FamilyRegistry<F>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl<E, F> ExpenseLedger<E, F>
where
    E: KeyValueStore<ExpenseId, FamilyExpense>,
    F: KeyValueStore<FamilyId, Family>,
{
    pub fn new(
        store: E,
        families: Arc<FamilyRegistry<F>>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            store,
            families,
            clock,
            ids,
        }
    }

    /// Expenses recorded against `family_id`. An unknown family yields an
    /// empty list, same as a family without expenses.
    pub fn list_family_expenses(&self, family_id: &FamilyId) -> HouseholdResult<Vec<FamilyExpense>> {
        Ok(self
            .store
            .values()?
            .into_iter()
            .filter(|e| e.family_id == *family_id)
            .collect())
    }

    /// `total_income` minus every stored expense of the family. Never persisted.
    pub fn net_family_income(&self, family_id: &FamilyId) -> HouseholdResult<f64> {
        let family = self.families.find_family(family_id)?.ok_or_else(|| {
            HouseholdError::not_found(format!("Couldn't find family with id {family_id}."))
        })?;

        let net = self
            .list_family_expenses(family_id)?
            .iter()
            .fold(family.total_income(), |net, e| net - e.amount);
        Ok(net)
    }

    /// Record an expense. Only the family's admin may do this.
    pub fn add_family_expense(
        &self,
        caller: &PrincipalId,
        payload: FamilyExpensePayload,
    ) -> HouseholdResult<FamilyExpense> {
        let family = self.families.find_family(&payload.family_id)?.ok_or_else(|| {
            HouseholdError::not_found(format!("Family with id={} not found.", payload.family_id))
        })?;
        family.authorize(caller)?;

        let expense = FamilyExpense {
            id: ExpenseId::generate(self.ids.as_ref()),
            family_id: payload.family_id,
            amount: payload.amount,
            attachment_url: payload.attachment_url,
            created_at: self.clock.now(),
        };

        self.store.insert(expense.id.clone(), expense.clone())?;
        tracing::info!(
            expense_id = %expense.id,
            family_id = %expense.family_id,
            %caller,
            amount = expense.amount,
            "family expense added"
        );
        Ok(expense)
    }

    /// Delete an expense.
    ///
    /// If its family still exists only the admin may delete it. If the family
    /// is gone the expense is removed for anyone and reported as
    /// [`ExpenseDeletion::OrphanCleanup`].
    pub fn delete_family_expense(
        &self,
        caller: &PrincipalId,
        id: &ExpenseId,
    ) -> HouseholdResult<ExpenseDeletion> {
        let expense = self.store.get(id)?.ok_or_else(|| {
            HouseholdError::not_found(format!(
                "Couldn't delete a family expense with id={id}. It has not been found."
            ))
        })?;

        match self.families.find_family(&expense.family_id)? {
            None => {
                self.store.remove(id)?;
                tracing::warn!(
                    expense_id = %id,
                    family_id = %expense.family_id,
                    %caller,
                    "deleted orphaned family expense"
                );
                Ok(ExpenseDeletion::OrphanCleanup(expense))
            }
            Some(family) => {
                family.authorize(caller)?;
                self.store.remove(id)?;
                tracing::info!(expense_id = %id, family_id = %expense.family_id, %caller, "family expense deleted");
                Ok(ExpenseDeletion::Deleted(expense))
            }
        }
    }
}
