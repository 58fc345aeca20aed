//! DTOs describing the outcome of a bulk import.

use serde::Serialize;

use crate::domain::customer::Customer;

/// A row that was not imported and why.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImportFailure {
    /// 1-based position of the data row, the header not counted.
    pub row: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
    pub created: Vec<Customer>,
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn total_rows(&self) -> usize {
        self.created.len() + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
