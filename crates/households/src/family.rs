use std::sync::Arc;

use serde::{Deserialize, Serialize};

use famledger_auth::{PrincipalId, ensure_admin};
use famledger_core::{Clock, Entity, FamilyId, IdGenerator, Timestamp};
use famledger_store::KeyValueStore;

use crate::{HouseholdError, HouseholdResult};

/// A household tracked by the registry.
///
/// `id`, `admin` and `created_at` are fixed at creation; there is no setter
/// for them. `total_income` is gross income (expenses are never netted in).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    id: FamilyId,
    admin: PrincipalId,
    name: String,
    members: Vec<String>,
    address: String,
    total_income: f64,
    created_at: Timestamp,
    updated_at: Option<Timestamp>,
}

/// Caller-supplied family fields (create and full update).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyPayload {
    pub name: String,
    pub members: Vec<String>,
    pub address: String,
    pub income: f64,
}

impl Family {
    fn create(id: FamilyId, admin: PrincipalId, payload: FamilyPayload, now: Timestamp) -> Self {
        Self {
            id,
            admin,
            name: payload.name,
            members: payload.members,
            address: payload.address,
            total_income: payload.income,
            created_at: now,
            updated_at: None,
        }
    }

    pub fn admin(&self) -> &PrincipalId {
        &self.admin
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn total_income(&self) -> f64 {
        self.total_income
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }

    /// Replace the descriptive fields; income is overwritten, not added.
    fn replace_details(&mut self, payload: FamilyPayload, now: Timestamp) {
        self.name = payload.name;
        self.members = payload.members;
        self.address = payload.address;
        self.total_income = payload.income;
        self.updated_at = Some(now);
    }

    fn adjust_income(&mut self, delta: f64, now: Timestamp) {
        self.total_income += delta;
        self.updated_at = Some(now);
    }

    /// Reject `caller` unless it is this family's admin.
    pub(crate) fn authorize(&self, caller: &PrincipalId) -> HouseholdResult<()> {
        ensure_admin(caller, &self.admin).map_err(|err| {
            tracing::warn!(family_id = %self.id, %caller, error = %err, "rejected non-admin caller");
            HouseholdError::unauthorized(format!(
                "Caller isn't the admin of the family with id {}.",
                self.id
            ))
        })
    }
}

impl Entity for Family {
    type Id = FamilyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// CRUD over families, with admin-only mutation.
pub struct FamilyRegistry<S> {
    store: S,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl<S> FamilyRegistry<S>
where
    S: KeyValueStore<FamilyId, Family>,
{
    pub fn new(store: S, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, clock, ids }
    }

    /// All families, in store iteration order.
    pub fn list_families(&self) -> HouseholdResult<Vec<Family>> {
        Ok(self.store.values()?)
    }

    pub fn get_family(&self, id: &FamilyId) -> HouseholdResult<Family> {
        self.find_family(id)?
            .ok_or_else(|| HouseholdError::not_found(format!("Family with id={id} not found.")))
    }

    /// Lookup without treating absence as an error.
    pub fn find_family(&self, id: &FamilyId) -> HouseholdResult<Option<Family>> {
        Ok(self.store.get(id)?)
    }

    /// Create a family owned by `caller`. Field contents are not validated.
    pub fn add_family(&self, caller: &PrincipalId, payload: FamilyPayload) -> HouseholdResult<Family> {
        let id = FamilyId::generate(self.ids.as_ref());
        let family = Family::create(id.clone(), caller.clone(), payload, self.clock.now());

        self.store.insert(id.clone(), family.clone())?;
        tracing::info!(family_id = %id, %caller, "family added");
        Ok(family)
    }

    /// Overwrite name, members, address and income (income is replaced).
    pub fn update_family(
        &self,
        caller: &PrincipalId,
        id: &FamilyId,
        payload: FamilyPayload,
    ) -> HouseholdResult<Family> {
        let mut family = self.owned_by(
            caller,
            id,
            format!("Couldn't update a family with id={id}. Family not found."),
        )?;

        family.replace_details(payload, self.clock.now());
        self.store.insert(id.clone(), family.clone())?;
        tracing::info!(family_id = %id, %caller, "family updated");
        Ok(family)
    }

    /// Add `delta` (which may be negative) to the family's total income.
    pub fn update_family_income(
        &self,
        caller: &PrincipalId,
        id: &FamilyId,
        delta: f64,
    ) -> HouseholdResult<Family> {
        let mut family = self.owned_by(
            caller,
            id,
            format!("Couldn't update a family with id={id}. Family not found."),
        )?;

        family.adjust_income(delta, self.clock.now());
        self.store.insert(id.clone(), family.clone())?;
        tracing::info!(family_id = %id, %caller, delta, total_income = family.total_income, "family income adjusted");
        Ok(family)
    }

    /// Remove the family and return it. Its expenses are left in place.
    pub fn delete_family(&self, caller: &PrincipalId, id: &FamilyId) -> HouseholdResult<Family> {
        let family = self.owned_by(
            caller,
            id,
            format!("Couldn't delete a family with id={id}. Family not found."),
        )?;

        self.store.remove(id)?;
        tracing::info!(family_id = %id, %caller, "family deleted");
        Ok(family)
    }

    /// NotFound is reported before Unauthorized.
    fn owned_by(
        &self,
        caller: &PrincipalId,
        id: &FamilyId,
        not_found: String,
    ) -> HouseholdResult<Family> {
        let family = self
            .find_family(id)?
            .ok_or_else(|| HouseholdError::not_found(not_found))?;
        family.authorize(caller)?;
        Ok(family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Fixture, principal};

    fn payload(name: &str, income: f64) -> FamilyPayload {
        FamilyPayload {
            name: name.to_string(),
            members: vec!["George".to_string(), "Ana".to_string()],
            address: "12 Elm Street".to_string(),
            income,
        }
    }

    #[test]
    fn add_family_records_caller_and_creation_time() {
        let fx = Fixture::new();
        let alice = principal("alice");

        let family = fx.registry.add_family(&alice, payload("Smith", 1000.0)).unwrap();

        assert_eq!(family.admin(), &alice);
        assert_eq!(family.name(), "Smith");
        assert_eq!(family.members(), ["George", "Ana"]);
        assert_eq!(family.address(), "12 Elm Street");
        assert_eq!(family.total_income(), 1000.0);
        assert_eq!(family.created_at(), Timestamp::from_nanos(Fixture::START));
        assert_eq!(family.updated_at(), None);
    }

    #[test]
    fn get_family_returns_what_add_returned() {
        let fx = Fixture::new();
        let added = fx.registry.add_family(&principal("alice"), payload("Smith", 10.0)).unwrap();
        let fetched = fx.registry.get_family(added.id()).unwrap();
        assert_eq!(fetched, added);
    }

    #[test]
    fn empty_fields_are_accepted() {
        let fx = Fixture::new();
        let family = fx
            .registry
            .add_family(
                &principal("alice"),
                FamilyPayload {
                    name: String::new(),
                    members: vec![],
                    address: String::new(),
                    income: 0.0,
                },
            )
            .unwrap();
        assert_eq!(fx.registry.list_families().unwrap(), vec![family]);
    }

    #[test]
    fn get_unknown_family_is_not_found() {
        let fx = Fixture::new();
        let err = fx.registry.get_family(&fx.unknown_family()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn update_family_replaces_fields_and_stamps_update() {
        let fx = Fixture::new();
        let alice = principal("alice");
        let family = fx.registry.add_family(&alice, payload("Smith", 1000.0)).unwrap();
        fx.clock.advance(50);

        let updated = fx
            .registry
            .update_family(
                &alice,
                family.id(),
                FamilyPayload {
                    name: "Smith-Jones".to_string(),
                    members: vec!["Ana".to_string()],
                    address: "1 Oak Road".to_string(),
                    income: 400.0,
                },
            )
            .unwrap();

        assert_eq!(updated.name(), "Smith-Jones");
        assert_eq!(updated.members(), ["Ana"]);
        assert_eq!(updated.address(), "1 Oak Road");
        assert_eq!(updated.total_income(), 400.0);
        assert_eq!(updated.created_at(), family.created_at());
        assert_eq!(updated.updated_at(), Some(Timestamp::from_nanos(Fixture::START + 50)));
        assert_eq!(updated.admin(), &alice);
        assert_eq!(fx.registry.get_family(family.id()).unwrap(), updated);
    }

    #[test]
    fn update_family_is_idempotent() {
        let fx = Fixture::new();
        let alice = principal("alice");
        let family = fx.registry.add_family(&alice, payload("Smith", 1000.0)).unwrap();

        let first = fx.registry.update_family(&alice, family.id(), payload("Smith", 300.0)).unwrap();
        let second = fx.registry.update_family(&alice, family.id(), payload("Smith", 300.0)).unwrap();

        assert_eq!(first.total_income(), 300.0);
        assert_eq!(second, first);
    }

    #[test]
    fn non_admin_cannot_update_and_nothing_changes() {
        let fx = Fixture::new();
        let family = fx.registry.add_family(&principal("alice"), payload("Smith", 1000.0)).unwrap();

        let err = fx
            .registry
            .update_family(&principal("bob"), family.id(), payload("Mallory", 1.0))
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(
            err.to_string(),
            format!("unauthorized: Caller isn't the admin of the family with id {}.", family.id())
        );
        assert_eq!(fx.registry.get_family(family.id()).unwrap(), family);
    }

    #[test]
    fn missing_family_is_reported_before_authorization() {
        let fx = Fixture::new();
        let id = fx.unknown_family();
        let bob = principal("bob");

        assert!(fx.registry.update_family(&bob, &id, payload("x", 1.0)).unwrap_err().is_not_found());
        assert!(fx.registry.update_family_income(&bob, &id, 1.0).unwrap_err().is_not_found());
        assert!(fx.registry.delete_family(&bob, &id).unwrap_err().is_not_found());
    }

    #[test]
    fn update_income_is_additive() {
        let fx = Fixture::new();
        let alice = principal("alice");
        let family = fx.registry.add_family(&alice, payload("Smith", 1000.0)).unwrap();

        fx.registry.update_family_income(&alice, family.id(), 250.0).unwrap();
        let updated = fx.registry.update_family_income(&alice, family.id(), -100.0).unwrap();

        assert_eq!(updated.total_income(), 1150.0);
        assert!(updated.updated_at().is_some());
    }

    #[test]
    fn non_admin_cannot_adjust_income_or_delete() {
        let fx = Fixture::new();
        let family = fx.registry.add_family(&principal("alice"), payload("Smith", 1000.0)).unwrap();
        let bob = principal("bob");

        assert!(fx.registry.update_family_income(&bob, family.id(), 5.0).unwrap_err().is_unauthorized());
        assert!(fx.registry.delete_family(&bob, family.id()).unwrap_err().is_unauthorized());
        assert_eq!(fx.registry.get_family(family.id()).unwrap(), family);
    }

    #[test]
    fn delete_returns_pre_deletion_record() {
        let fx = Fixture::new();
        let alice = principal("alice");
        let family = fx.registry.add_family(&alice, payload("Smith", 1000.0)).unwrap();

        let deleted = fx.registry.delete_family(&alice, family.id()).unwrap();

        assert_eq!(deleted, family);
        assert!(fx.registry.get_family(family.id()).unwrap_err().is_not_found());
        assert!(fx.registry.list_families().unwrap().is_empty());
    }

    #[test]
    fn family_serializes_with_camel_case_fields() {
        let fx = Fixture::new();
        let family = fx.registry.add_family(&principal("alice"), payload("Smith", 12.5)).unwrap();

        let json = serde_json::to_value(&family).unwrap();
        assert_eq!(json["admin"], "alice");
        assert_eq!(json["totalIncome"], 12.5);
        assert_eq!(json["createdAt"], Fixture::START);
        assert!(json["updatedAt"].is_null());

        let back: Family = serde_json::from_value(json).unwrap();
        assert_eq!(back, family);
    }
}
