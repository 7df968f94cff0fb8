//! Registry/ledger wiring and store selection.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::{Mutex, MutexGuard};

use famledger_core::{Clock, ExpenseId, FamilyId, IdGenerator, RandomIds, SystemClock};
use famledger_households::{ExpenseLedger, Family, FamilyExpense, FamilyRegistry};
use famledger_store::{InMemoryStore, JsonFileStore, KeyValueStore};

use crate::config::ApiConfig;

pub type FamilyStore = Arc<dyn KeyValueStore<FamilyId, Family>>;
pub type ExpenseStore = Arc<dyn KeyValueStore<ExpenseId, FamilyExpense>>;

pub const FAMILIES_FILE: &str = "families.json";
pub const EXPENSES_FILE: &str = "expenses.json";

/// The two household services, used together under one lock.
pub struct Households {
    pub registry: Arc<FamilyRegistry<FamilyStore>>,
    pub ledger: ExpenseLedger<ExpenseStore, FamilyStore>,
}

/// Shared application services.
///
/// Every request takes the lock for the whole operation, so calls run to
/// completion one at a time against the stores.
pub struct AppServices {
    households: Mutex<Households>,
}

impl AppServices {
    pub fn new(families: FamilyStore, expenses: ExpenseStore) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
        let ids: Arc<dyn IdGenerator> = Arc::new(RandomIds);

        let registry = Arc::new(FamilyRegistry::new(families, clock.clone(), ids.clone()));
        let ledger = ExpenseLedger::new(expenses, registry.clone(), clock, ids);

        Self {
            households: Mutex::new(Households { registry, ledger }),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryStore::<FamilyId, Family>::new()),
            Arc::new(InMemoryStore::<ExpenseId, FamilyExpense>::new()),
        )
    }

    /// JSON-file stores under `dir`.
    pub fn open_dir(dir: &Path) -> anyhow::Result<Self> {
        let families: JsonFileStore<FamilyId, Family> = JsonFileStore::open(dir.join(FAMILIES_FILE))
            .with_context(|| format!("failed to open family store in {}", dir.display()))?;
        let expenses: JsonFileStore<ExpenseId, FamilyExpense> = JsonFileStore::open(dir.join(EXPENSES_FILE))
            .with_context(|| format!("failed to open expense store in {}", dir.display()))?;
        Ok(Self::new(Arc::new(families), Arc::new(expenses)))
    }

    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Self> {
        match &config.data_dir {
            Some(dir) => {
                tracing::info!(data_dir = %dir.display(), "using json file stores");
                Self::open_dir(dir)
            }
            None => {
                tracing::warn!("no data directory configured; records will not survive restart");
                Ok(Self::in_memory())
            }
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, Households> {
        self.households.lock().await
    }
}
