//! Process-local repository backing the dashboard views.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::activity::{Activity, NewActivity};
use crate::domain::customer::{Customer, NewCustomer, UpdateCustomer};
use crate::domain::deal::{Deal, NewDeal, UpdateDeal};
use crate::domain::types::{ActivityId, CustomerEmail, CustomerId, DealId};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    ActivityListQuery, ActivityReader, ActivityWriter, CustomerListQuery, CustomerReader,
    CustomerWriter, DealListQuery, DealReader, DealWriter,
};

#[derive(Debug, Default)]
pub(crate) struct Store {
    pub(crate) customers: BTreeMap<CustomerId, Customer>,
    pub(crate) deals: BTreeMap<DealId, Deal>,
    pub(crate) activities: BTreeMap<ActivityId, Activity>,
}

fn next_id<K: Copy + Into<i32>, V>(map: &BTreeMap<K, V>) -> i32 {
    map.keys().next_back().map_or(1, |id| (*id).into() + 1)
}

impl Store {
    fn email_taken(&self, email: &CustomerEmail, except: Option<CustomerId>) -> bool {
        self.customers
            .values()
            .any(|c| &c.email == email && Some(c.id) != except)
    }
}

/// Cloneable handle to a shared in-memory store.
///
/// Clones observe each other's writes. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, Store>> {
        Ok(self.store.read()?)
    }

    pub(crate) fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, Store>> {
        Ok(self.store.write()?)
    }
}

impl CustomerReader for InMemoryRepository {
    fn get_customer_by_id(&self, id: CustomerId) -> RepositoryResult<Option<Customer>> {
        Ok(self.read()?.customers.get(&id).cloned())
    }

    fn list_customers(&self, query: &CustomerListQuery) -> RepositoryResult<Vec<Customer>> {
        Ok(self
            .read()?
            .customers
            .values()
            .filter(|customer| query.matches(*customer))
            .cloned()
            .collect())
    }
}

impl CustomerWriter for InMemoryRepository {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer> {
        let mut store = self.write()?;
        if store.email_taken(&new_customer.email, None) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "customer email {} already exists",
                new_customer.email
            )));
        }

        let id = CustomerId::new(next_id(&store.customers))
            .map_err(|err| RepositoryError::Unexpected(err.to_string()))?;
        let customer = Customer::from_new(id, new_customer.clone());
        store.customers.insert(id, customer.clone());
        Ok(customer)
    }

    fn update_customer(
        &self,
        id: CustomerId,
        updates: &UpdateCustomer,
    ) -> RepositoryResult<Customer> {
        let mut store = self.write()?;
        if store.email_taken(&updates.email, Some(id)) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "customer email {} already exists",
                updates.email
            )));
        }

        let customer = store
            .customers
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        customer.apply(updates);
        Ok(customer.clone())
    }
}

impl DealReader for InMemoryRepository {
    fn get_deal_by_id(&self, id: DealId) -> RepositoryResult<Option<Deal>> {
        Ok(self.read()?.deals.get(&id).cloned())
    }

    fn list_deals(&self, query: &DealListQuery) -> RepositoryResult<Vec<Deal>> {
        Ok(self
            .read()?
            .deals
            .values()
            .filter(|deal| query.matches(*deal))
            .cloned()
            .collect())
    }
}

impl DealWriter for InMemoryRepository {
    fn create_deal(&self, new_deal: &NewDeal) -> RepositoryResult<Deal> {
        let mut store = self.write()?;
        let id = DealId::new(next_id(&store.deals))
            .map_err(|err| RepositoryError::Unexpected(err.to_string()))?;
        let deal = Deal::from_new(id, new_deal.clone());
        store.deals.insert(id, deal.clone());
        Ok(deal)
    }

    fn update_deal(&self, id: DealId, updates: &UpdateDeal) -> RepositoryResult<Deal> {
        let mut store = self.write()?;
        let deal = store.deals.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        deal.apply(updates);
        Ok(deal.clone())
    }
}

impl ActivityReader for InMemoryRepository {
    fn get_activity_by_id(&self, id: ActivityId) -> RepositoryResult<Option<Activity>> {
        Ok(self.read()?.activities.get(&id).cloned())
    }

    fn list_activities(&self, query: &ActivityListQuery) -> RepositoryResult<Vec<Activity>> {
        let mut activities: Vec<Activity> = self
            .read()?
            .activities
            .values()
            .filter(|activity| activity.customer_id == query.customer_id)
            .filter(|activity| {
                query
                    .activity_type
                    .is_none_or(|kind| activity.activity_type == kind)
            })
            .cloned()
            .collect();

        activities.sort_by(|a, b| {
            b.timeline_at()
                .cmp(&a.timeline_at())
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(activities)
    }
}

impl ActivityWriter for InMemoryRepository {
    fn create_activity(&self, new_activity: &NewActivity) -> RepositoryResult<Activity> {
        let mut store = self.write()?;
        let id = ActivityId::new(next_id(&store.activities))
            .map_err(|err| RepositoryError::Unexpected(err.to_string()))?;
        let activity = Activity::from_new(id, new_activity.clone());
        store.activities.insert(id, activity.clone());
        Ok(activity)
    }
}
