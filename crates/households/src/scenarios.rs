//! Registry and ledger exercised together.

use proptest::prelude::*;

use famledger_core::{Entity, FamilyId};

use crate::test_support::{Fixture, principal};
use crate::{ExpenseDeletion, FamilyExpensePayload, FamilyPayload};

fn household(income: f64) -> FamilyPayload {
    FamilyPayload {
        name: "Okafor".to_string(),
        members: vec!["Chidi".to_string(), "Ada".to_string()],
        address: "9 Harbour Lane".to_string(),
        income,
    }
}

fn receipt(family_id: FamilyId, amount: f64) -> FamilyExpensePayload {
    FamilyExpensePayload {
        family_id,
        amount,
        attachment_url: format!("ipfs://receipt-{amount}"),
    }
}

#[test]
fn net_income_walkthrough() {
    let fx = Fixture::new();
    let a = principal("admin-a");
    let b = principal("caller-b");

    let f = fx.registry.add_family(&a, household(1000.0)).unwrap();
    let e1 = fx.ledger.add_family_expense(&a, receipt(f.id().clone(), 200.0)).unwrap();
    fx.ledger.add_family_expense(&a, receipt(f.id().clone(), 150.0)).unwrap();

    assert_eq!(fx.ledger.net_family_income(f.id()).unwrap(), 650.0);

    fx.ledger.delete_family_expense(&a, e1.id()).unwrap();
    assert_eq!(fx.ledger.net_family_income(f.id()).unwrap(), 850.0);

    let err = fx.registry.update_family(&b, f.id(), household(0.0)).unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(fx.registry.get_family(f.id()).unwrap(), f);
}

#[test]
fn unknown_family_rejects_reads_and_expense_writes() {
    let fx = Fixture::new();
    let ghost = FamilyId::from("nonexistent");

    let err = fx.registry.get_family(&ghost).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "not found: Family with id=nonexistent not found.");

    let err = fx
        .ledger
        .add_family_expense(&principal("a"), receipt(ghost.clone(), 1.0))
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(fx.ledger.list_family_expenses(&ghost).unwrap().is_empty());
}

#[test]
fn deleting_family_leaves_orphaned_expenses() {
    let fx = Fixture::new();
    let a = principal("admin-a");
    let f = fx.registry.add_family(&a, household(500.0)).unwrap();
    let e1 = fx.ledger.add_family_expense(&a, receipt(f.id().clone(), 10.0)).unwrap();
    let e2 = fx.ledger.add_family_expense(&a, receipt(f.id().clone(), 20.0)).unwrap();

    fx.registry.delete_family(&a, f.id()).unwrap();

    assert_eq!(fx.ledger.list_family_expenses(f.id()).unwrap(), vec![e1.clone(), e2]);
    assert!(fx.ledger.net_family_income(f.id()).unwrap_err().is_not_found());

    let outcome = fx.ledger.delete_family_expense(&a, e1.id()).unwrap();
    assert_eq!(outcome, ExpenseDeletion::OrphanCleanup(e1));
    assert_eq!(fx.ledger.list_family_expenses(f.id()).unwrap().len(), 1);
}

#[test]
fn replace_then_adjust_income() {
    let fx = Fixture::new();
    let a = principal("admin-a");
    let f = fx.registry.add_family(&a, household(1000.0)).unwrap();

    fx.registry.update_family(&a, f.id(), household(200.0)).unwrap();
    fx.registry.update_family_income(&a, f.id(), 50.0).unwrap();
    let again = fx.registry.update_family_income(&a, f.id(), 50.0).unwrap();

    assert_eq!(again.total_income(), 300.0);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    /// Property: income adjustments accumulate, whatever their sign.
    #[test]
    fn income_adjustments_accumulate(
        original in -1_000_000i32..1_000_000i32,
        d1 in -1_000_000i32..1_000_000i32,
        d2 in -1_000_000i32..1_000_000i32,
    ) {
        let fx = Fixture::new();
        let a = principal("admin-a");
        let f = fx.registry.add_family(&a, household(f64::from(original))).unwrap();

        fx.registry.update_family_income(&a, f.id(), f64::from(d1)).unwrap();
        let after = fx.registry.update_family_income(&a, f.id(), f64::from(d2)).unwrap();

        prop_assert_eq!(after.total_income(), f64::from(original) + f64::from(d1) + f64::from(d2));
    }

    /// Property: net income is income minus the sum of stored expenses, and
    /// adding then deleting an expense of amount A moves it by exactly A.
    #[test]
    fn net_income_tracks_stored_expenses(
        income in 0u32..10_000_000u32,
        amounts in prop::collection::vec(0u32..100_000u32, 0..12),
        extra in 0u32..100_000u32,
    ) {
        let fx = Fixture::new();
        let a = principal("admin-a");
        let f = fx.registry.add_family(&a, household(f64::from(income))).unwrap();

        for amount in &amounts {
            fx.ledger.add_family_expense(&a, receipt(f.id().clone(), f64::from(*amount))).unwrap();
        }

        let total: f64 = amounts.iter().map(|x| f64::from(*x)).sum();
        let before = fx.ledger.net_family_income(f.id()).unwrap();
        prop_assert_eq!(before, f64::from(income) - total);

        let e = fx.ledger.add_family_expense(&a, receipt(f.id().clone(), f64::from(extra))).unwrap();
        prop_assert_eq!(fx.ledger.net_family_income(f.id()).unwrap(), before - f64::from(extra));

        fx.ledger.delete_family_expense(&a, e.id()).unwrap();
        prop_assert_eq!(fx.ledger.net_family_income(f.id()).unwrap(), before);
    }

    /// Property: a non-admin never changes a stored family.
    #[test]
    fn non_admin_updates_never_apply(name in "[a-z]{0,12}", income in -1e6f64..1e6f64) {
        let fx = Fixture::new();
        let f = fx.registry.add_family(&principal("admin-a"), household(10.0)).unwrap();
        let payload = FamilyPayload { name, members: vec![], address: String::new(), income };

        let err = fx.registry.update_family(&principal("intruder"), f.id(), payload).unwrap_err();

        prop_assert!(err.is_unauthorized());
        prop_assert_eq!(fx.registry.get_family(f.id()).unwrap(), f);
    }
}
