//! DTOs for the deals pipeline page.

use serde::Serialize;

use crate::domain::deal::{Deal, PipelineSummary};

/// Query parameters accepted by the deals page service.
#[derive(Debug, Default, Clone)]
pub struct DealsQuery {
    pub search: Option<String>,
    /// Stage filter; `None` or `"all"` shows the whole pipeline.
    pub stage: Option<String>,
}

/// Deals table plus the headline cards computed over the shown deals.
#[derive(Debug, Serialize)]
pub struct DealsPageData {
    pub deals: Vec<Deal>,
    pub summary: PipelineSummary,
    pub search_query: Option<String>,
    pub stage: Option<String>,
}
