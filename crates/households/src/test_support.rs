use std::sync::Arc;

use famledger_auth::PrincipalId;
use famledger_core::{Clock, FamilyId, IdGenerator, ManualClock, SequentialIds};
use famledger_store::InMemoryStore;

use crate::{ExpenseLedger, Family, FamilyExpense, FamilyRegistry};

pub(crate) type Registry = FamilyRegistry<Arc<InMemoryStore<FamilyId, Family>>>;
pub(crate) type Ledger = ExpenseLedger<
    Arc<InMemoryStore<famledger_core::ExpenseId, FamilyExpense>>,
    Arc<InMemoryStore<FamilyId, Family>>,
>;

pub(crate) fn principal(s: &str) -> PrincipalId {
    PrincipalId::parse(s).unwrap()
}

/// Registry + ledger over in-memory stores, a manual clock and sequential ids.
pub(crate) struct Fixture {
    pub clock: Arc<ManualClock>,
    pub registry: Arc<Registry>,
    pub ledger: Ledger,
}

impl Fixture {
    pub const START: u64 = 1_700_000_000_000_000_000;

    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::starting_at(Self::START));
        let ids: Arc<dyn IdGenerator> = Arc::new(SequentialIds::new());
        let dyn_clock: Arc<dyn Clock> = clock.clone();

        let registry = Arc::new(FamilyRegistry::new(
            Arc::new(InMemoryStore::new()),
            dyn_clock.clone(),
            ids.clone(),
        ));
        let ledger = ExpenseLedger::new(Arc::new(InMemoryStore::new()), registry.clone(), dyn_clock, ids);

        Self {
            clock,
            registry,
            ledger,
        }
    }

    /// An id no fixture-generated record will ever use.
    pub fn unknown_family(&self) -> FamilyId {
        FamilyId::from("nonexistent")
    }
}
