//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::activity::{Activity, NewActivity};
use crate::domain::customer::{Customer, NewCustomer, UpdateCustomer};
use crate::domain::deal::{Deal, NewDeal, UpdateDeal};
use crate::domain::types::{ActivityId, CustomerId, DealId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ActivityListQuery, ActivityReader, ActivityWriter, CustomerListQuery, CustomerReader,
    CustomerWriter, DealListQuery, DealReader, DealWriter,
};

mock! {
    pub Repository {}

    impl CustomerReader for Repository {
        fn get_customer_by_id(&self, id: CustomerId) -> RepositoryResult<Option<Customer>>;
        fn list_customers(&self, query: &CustomerListQuery) -> RepositoryResult<Vec<Customer>>;
    }

    impl CustomerWriter for Repository {
        fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
        fn update_customer(
            &self,
            id: CustomerId,
            updates: &UpdateCustomer,
        ) -> RepositoryResult<Customer>;
    }

    impl DealReader for Repository {
        fn get_deal_by_id(&self, id: DealId) -> RepositoryResult<Option<Deal>>;
        fn list_deals(&self, query: &DealListQuery) -> RepositoryResult<Vec<Deal>>;
    }

    impl DealWriter for Repository {
        fn create_deal(&self, new_deal: &NewDeal) -> RepositoryResult<Deal>;
        fn update_deal(&self, id: DealId, updates: &UpdateDeal) -> RepositoryResult<Deal>;
    }

    impl ActivityReader for Repository {
        fn get_activity_by_id(&self, id: ActivityId) -> RepositoryResult<Option<Activity>>;
        fn list_activities(&self, query: &ActivityListQuery) -> RepositoryResult<Vec<Activity>>;
    }

    impl ActivityWriter for Repository {
        fn create_activity(&self, new_activity: &NewActivity) -> RepositoryResult<Activity>;
    }
}
