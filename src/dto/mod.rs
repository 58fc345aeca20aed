//! DTO modules that bridge services with the pages and the CLI.

pub mod activities;
pub mod customers;
pub mod deals;
pub mod imports;
