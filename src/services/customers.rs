use std::path::PathBuf;

use serde_json::Value;

use crate::domain::customer::{Customer, CustomerStatus, NewCustomer};
use crate::domain::types::CustomerId;
pub use crate::dto::customers::{CustomersPageData, CustomersQuery};
use crate::exchange::{DownloadSink, ExportFormat, format_customer_data};
use crate::forms::customer::CustomerForm;
use crate::forms::validate_form;
use crate::repository::{CustomerListQuery, CustomerReader, CustomerWriter};
use crate::search::{MatchCase, SearchFilter, advanced_search};
use crate::services::{
    ServiceError, ServiceResult, deliver_records, normalize_search, parse_category, require_user,
};
use crate::session::AuthState;

fn list_query(query: &CustomersQuery) -> ServiceResult<CustomerListQuery> {
    let mut list_query = CustomerListQuery::new();
    if let Some(term) = normalize_search(query.search.clone()) {
        list_query = list_query.search(term);
    }
    if let Some(status) = parse_category::<CustomerStatus>(query.status.as_deref())? {
        list_query = list_query.category(status);
    }
    Ok(list_query)
}

/// Loads the customers table filtered by quick search and status.
pub fn load_customers<R>(
    session: &AuthState,
    repo: &R,
    query: CustomersQuery,
) -> ServiceResult<CustomersPageData>
where
    R: CustomerReader + ?Sized,
{
    require_user(session)?;

    let customers = repo.list_customers(&list_query(&query)?).map_err(|err| {
        log::error!("Failed to list customers: {err}");
        ServiceError::from(err)
    })?;

    Ok(CustomersPageData {
        total: customers.len(),
        customers,
        search_query: normalize_search(query.search),
        status: query.status,
    })
}

/// Customers satisfying every active advanced search clause.
pub fn search_customers<R>(
    session: &AuthState,
    repo: &R,
    filters: &[SearchFilter],
    case: MatchCase,
) -> ServiceResult<Vec<Customer>>
where
    R: CustomerReader + ?Sized,
{
    require_user(session)?;

    let customers = repo
        .list_customers(&CustomerListQuery::new())
        .map_err(|err| {
            log::error!("Failed to list customers: {err}");
            ServiceError::from(err)
        })?;

    Ok(advanced_search(&customers, filters, case)
        .into_iter()
        .cloned()
        .collect())
}

/// Validates the add-customer form and persists a new customer.
pub fn add_customer<R>(session: &AuthState, repo: &R, data: &Value) -> ServiceResult<Customer>
where
    R: CustomerWriter + ?Sized,
{
    require_user(session)?;

    let form = validate_form::<CustomerForm>(data).map_err(|err| {
        log::error!("Failed to validate customer form: {err}");
        ServiceError::from(err)
    })?;
    let new_customer = NewCustomer::try_from(form)?;

    repo.create_customer(&new_customer).map_err(|err| {
        log::error!("Failed to add a customer: {err}");
        ServiceError::from(err)
    })
}

/// Validates the edit form and replaces the customer's editable fields.
pub fn update_customer<R>(
    session: &AuthState,
    repo: &R,
    customer_id: i32,
    data: &Value,
) -> ServiceResult<Customer>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    require_user(session)?;

    let customer_id = CustomerId::new(customer_id)?;
    if repo.get_customer_by_id(customer_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }

    let form = validate_form::<CustomerForm>(data).map_err(|err| {
        log::error!("Failed to validate customer form: {err}");
        ServiceError::from(err)
    })?;
    let updates = NewCustomer::try_from(form)?;

    repo.update_customer(customer_id, &updates).map_err(|err| {
        log::error!("Failed to update customer {customer_id}: {err}");
        ServiceError::from(err)
    })
}

/// Exports the filtered customers with display column names.
///
/// Returns where the sink put the file, or `None` when nothing matched a CSV
/// export.
pub fn export_customers<R, S>(
    session: &AuthState,
    repo: &R,
    query: CustomersQuery,
    format: ExportFormat,
    sink: &S,
) -> ServiceResult<Option<PathBuf>>
where
    R: CustomerReader + ?Sized,
    S: DownloadSink + ?Sized,
{
    let page = load_customers(session, repo, query)?;
    let records = format_customer_data(&page.customers);
    deliver_records(&records, "customers", format, sink)
}
