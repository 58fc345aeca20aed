//! DTOs for a customer's activity timeline.

use serde::Serialize;

use crate::domain::activity::Activity;
use crate::domain::customer::Customer;

#[derive(Debug, Serialize)]
pub struct TimelinePageData {
    pub customer: Customer,
    /// Newest first.
    pub activities: Vec<Activity>,
}
