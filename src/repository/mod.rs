use crate::domain::activity::{Activity, ActivityType, NewActivity};
use crate::domain::customer::{Customer, CustomerStatus, NewCustomer, UpdateCustomer};
use crate::domain::deal::{Deal, DealStage, NewDeal, UpdateDeal};
use crate::domain::types::{ActivityId, CustomerId, DealId};
use crate::repository::errors::RepositoryResult;
use crate::search::RecordQuery;

pub mod errors;
pub mod memory;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod seed;

pub use memory::InMemoryRepository;

/// Quick search term and status filter for the customers table.
pub type CustomerListQuery = RecordQuery<CustomerStatus>;

/// Quick search term and stage filter for the deals table.
pub type DealListQuery = RecordQuery<DealStage>;

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityListQuery {
    pub customer_id: String,
    pub activity_type: Option<ActivityType>,
}

impl ActivityListQuery {
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            activity_type: None,
        }
    }

    pub fn activity_type(mut self, activity_type: ActivityType) -> Self {
        self.activity_type = Some(activity_type);
        self
    }
}

pub trait CustomerReader {
    fn get_customer_by_id(&self, id: CustomerId) -> RepositoryResult<Option<Customer>>;
    fn list_customers(&self, query: &CustomerListQuery) -> RepositoryResult<Vec<Customer>>;
}

pub trait CustomerWriter {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
    fn update_customer(
        &self,
        id: CustomerId,
        updates: &UpdateCustomer,
    ) -> RepositoryResult<Customer>;
}

pub trait DealReader {
    fn get_deal_by_id(&self, id: DealId) -> RepositoryResult<Option<Deal>>;
    fn list_deals(&self, query: &DealListQuery) -> RepositoryResult<Vec<Deal>>;
}

pub trait DealWriter {
    fn create_deal(&self, new_deal: &NewDeal) -> RepositoryResult<Deal>;
    fn update_deal(&self, id: DealId, updates: &UpdateDeal) -> RepositoryResult<Deal>;
}

pub trait ActivityReader {
    fn get_activity_by_id(&self, id: ActivityId) -> RepositoryResult<Option<Activity>>;
    /// Activities of one customer, newest first.
    fn list_activities(&self, query: &ActivityListQuery) -> RepositoryResult<Vec<Activity>>;
}

pub trait ActivityWriter {
    fn create_activity(&self, new_activity: &NewActivity) -> RepositoryResult<Activity>;
}
