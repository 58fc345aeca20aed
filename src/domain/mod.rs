//! Domain aggregates exposed by the CRM service layer.

pub mod activity;
pub mod customer;
pub mod deal;
pub mod types;
pub mod user;
