//! Core of a CRM dashboard: customers, deals and activities with form
//! validation, quick and advanced search, CSV/JSON export and import, and a
//! persisted sign-in session.

pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod exchange;
pub mod forms;
pub mod models;
pub mod record;
pub mod repository;
pub mod search;
pub mod services;
pub mod session;
