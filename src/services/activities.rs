use chrono::NaiveDateTime;
use serde_json::Value;

use crate::domain::activity::{Activity, ActivityType};
use crate::domain::customer::Customer;
use crate::domain::types::CustomerId;
pub use crate::dto::activities::TimelinePageData;
use crate::forms::activity::ActivityForm;
use crate::forms::validate_form;
use crate::repository::{ActivityListQuery, ActivityReader, ActivityWriter, CustomerReader};
use crate::services::{ServiceError, ServiceResult, require_user};
use crate::session::AuthState;

fn find_customer<R>(repo: &R, customer_id: i32) -> ServiceResult<Customer>
where
    R: CustomerReader + ?Sized,
{
    let customer_id = CustomerId::new(customer_id)?;
    repo.get_customer_by_id(customer_id)
        .map_err(|err| {
            log::error!("Failed to load customer {customer_id}: {err}");
            ServiceError::from(err)
        })?
        .ok_or(ServiceError::NotFound)
}

/// Loads a customer and their activities, newest first.
pub fn load_timeline<R>(
    session: &AuthState,
    repo: &R,
    customer_id: i32,
    activity_type: Option<ActivityType>,
) -> ServiceResult<TimelinePageData>
where
    R: CustomerReader + ActivityReader + ?Sized,
{
    require_user(session)?;

    let customer = find_customer(repo, customer_id)?;

    let mut query = ActivityListQuery::new(customer.id.to_string());
    if let Some(activity_type) = activity_type {
        query = query.activity_type(activity_type);
    }

    let activities = repo.list_activities(&query).map_err(|err| {
        log::error!("Failed to list activities for customer {customer_id}: {err}");
        ServiceError::from(err)
    })?;

    Ok(TimelinePageData {
        customer,
        activities,
    })
}

/// Logs an activity for the customer.
///
/// The form's `customerId` is always replaced with `customer_id`.
pub fn add_activity<R>(
    session: &AuthState,
    repo: &R,
    customer_id: i32,
    data: &Value,
    now: NaiveDateTime,
) -> ServiceResult<Activity>
where
    R: CustomerReader + ActivityWriter + ?Sized,
{
    require_user(session)?;

    let customer = find_customer(repo, customer_id)?;

    let mut data = data.clone();
    if let Value::Object(fields) = &mut data {
        fields.insert("customerId".to_string(), Value::String(customer.id.to_string()));
    }

    let form = validate_form::<ActivityForm>(&data).map_err(|err| {
        log::error!("Failed to validate activity form: {err}");
        ServiceError::from(err)
    })?;
    let new_activity = form.into_new_activity(now)?;

    repo.create_activity(&new_activity).map_err(|err| {
        log::error!("Failed to add an activity: {err}");
        ServiceError::from(err)
    })
}
