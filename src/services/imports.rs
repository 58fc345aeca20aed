//! Bulk import of customers from uploaded CSV or JSON.

use serde_json::{Map, Value};

use crate::domain::customer::NewCustomer;
pub use crate::dto::imports::{ImportFailure, ImportReport};
use crate::exchange::{import_from_csv, import_from_json, import_from_quoted_csv};
use crate::forms::customer::CustomerForm;
use crate::forms::validate_form;
use crate::record::{Record, value_to_text};
use crate::repository::CustomerWriter;
use crate::services::{ServiceResult, require_user};
use crate::session::AuthState;

/// How the uploaded text is parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ImportFormat {
    /// Newline/comma split; commas inside quotes are not supported.
    #[default]
    Csv,
    /// RFC 4180 reader that keeps commas inside quoted cells.
    QuotedCsv,
    Json,
}

const CUSTOMER_COLUMNS: &[(&str, &str)] = &[
    ("name", "name"),
    ("email", "email"),
    ("phone", "phone"),
    ("company", "company"),
    ("status", "status"),
    ("notes", "notes"),
];

const DEFAULT_STATUS: &str = "active";

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Maps an imported row onto the customer form payload.
///
/// Headers match case-insensitively, so the display columns of a customers
/// export import back. Unknown columns are ignored, blank cells are left out
/// and a missing status falls back to active.
fn customer_payload(record: &Record) -> Value {
    let mut payload = Map::new();

    for (header, value) in record {
        let key = normalize_header(header);
        let Some((_, field)) = CUSTOMER_COLUMNS.iter().find(|(column, _)| *column == key) else {
            continue;
        };
        let value = match value {
            Value::String(text) if text.trim().is_empty() => continue,
            Value::Null => continue,
            Value::String(_) => value.clone(),
            other => Value::String(value_to_text(other).into_owned()),
        };
        payload.insert((*field).to_string(), value);
    }

    payload
        .entry("status")
        .or_insert_with(|| Value::String(DEFAULT_STATUS.to_string()));

    Value::Object(payload)
}

fn parse(text: &str, format: ImportFormat) -> ServiceResult<Vec<Record>> {
    let records = match format {
        ImportFormat::Csv => import_from_csv(text),
        ImportFormat::QuotedCsv => import_from_quoted_csv(text),
        ImportFormat::Json => import_from_json(text),
    }
    .map_err(|err| {
        log::error!("Failed to parse customers upload: {err}");
        err
    })?;
    Ok(records)
}

/// Validates every uploaded row and creates the valid customers.
///
/// A malformed upload fails as a whole; individual bad rows are reported in
/// the returned [`ImportReport`] without stopping the rest.
pub fn import_customers<R>(
    session: &AuthState,
    repo: &R,
    text: &str,
    format: ImportFormat,
) -> ServiceResult<ImportReport>
where
    R: CustomerWriter + ?Sized,
{
    require_user(session)?;

    let records = parse(text, format)?;
    let mut report = ImportReport::default();

    for (index, record) in records.iter().enumerate() {
        let row = index + 1;

        let form = match validate_form::<CustomerForm>(&customer_payload(record)) {
            Ok(form) => form,
            Err(errors) => {
                report.failures.push(ImportFailure {
                    row,
                    errors: errors.into_inner(),
                });
                continue;
            }
        };

        let created = NewCustomer::try_from(form)
            .map_err(|err| err.to_string())
            .and_then(|new_customer| {
                repo.create_customer(&new_customer)
                    .map_err(|err| err.to_string())
            });

        match created {
            Ok(customer) => report.created.push(customer),
            Err(err) => report.failures.push(ImportFailure {
                row,
                errors: vec![err],
            }),
        }
    }

    if !report.is_clean() {
        log::warn!(
            "Imported {} of {} customers, {} rows rejected",
            report.created.len(),
            report.total_rows(),
            report.failures.len()
        );
    }

    Ok(report)
}
