//! DTOs for the customers page.

use serde::Serialize;

use crate::domain::customer::Customer;

/// Query parameters accepted by the customers page service.
#[derive(Debug, Default, Clone)]
pub struct CustomersQuery {
    /// Optional quick search string entered by the user.
    pub search: Option<String>,
    /// Status filter; `None` or `"all"` shows every status.
    pub status: Option<String>,
}

/// Data required to render the customers table.
#[derive(Debug, Serialize)]
pub struct CustomersPageData {
    pub customers: Vec<Customer>,
    /// Search query echoed back to the page when present.
    pub search_query: Option<String>,
    pub status: Option<String>,
    pub total: usize,
}
