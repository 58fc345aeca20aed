//! Use cases behind the dashboard pages.
//!
//! Every service checks that a user is signed in, reads or writes through the
//! repository traits, and logs failures before returning them.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::user::User;
use crate::exchange::{
    DownloadSink, ExportError, ExportFormat, ImportError, export_to_csv, export_to_json,
};
use crate::forms::{FieldErrors, FormError};
use crate::record::Record;
use crate::repository::errors::RepositoryError;
use crate::session::{AuthError, AuthState, ensure_authenticated};

pub mod activities;
pub mod customers;
pub mod deals;
pub mod imports;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    /// Field-level messages to show next to the form.
    #[error("{0}")]
    Validation(FieldErrors),

    #[error("Form error: {0}")]
    Form(String),

    #[error("Type constraint error: {0}")]
    TypeConstraint(String),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Auth error: {0}")]
    Auth(AuthError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation(errors) => ServiceError::Validation(errors),
            other => ServiceError::Form(other.to_string()),
        }
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotAuthenticated | AuthError::InvalidCredentials => {
                ServiceError::Unauthorized
            }
            other => ServiceError::Auth(other),
        }
    }
}

/// Signed-in user of the session, or [`ServiceError::Unauthorized`].
pub(crate) fn require_user(session: &AuthState) -> ServiceResult<&User> {
    ensure_authenticated(session).map_err(|err| {
        log::error!("Rejected unauthenticated request: {err}");
        ServiceError::from(err)
    })
}

/// Trims the search term and drops it when blank.
pub(crate) fn normalize_search(search: Option<String>) -> Option<String> {
    search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parses a category filter where blank or `"all"` means no filter.
pub(crate) fn parse_category<C>(raw: Option<&str>) -> ServiceResult<Option<C>>
where
    C: FromStr,
    C::Err: Display,
{
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|err| {
            log::error!("Invalid category filter {value}: {err}");
            ServiceError::Form(format!("Unknown filter value: {value}"))
        }),
    }
}

/// Renders the records in `format` and hands the artifact to the sink.
///
/// Returns `None` when a CSV export had nothing to write.
pub(crate) fn deliver_records<S>(
    records: &[Record],
    name: &str,
    format: ExportFormat,
    sink: &S,
) -> ServiceResult<Option<PathBuf>>
where
    S: DownloadSink + ?Sized,
{
    let artifact = match format {
        ExportFormat::Csv => export_to_csv(records, name)?,
        ExportFormat::Json => Some(export_to_json(records, name)?),
    };

    let Some(artifact) = artifact else {
        return Ok(None);
    };

    let path = sink.deliver(&artifact).map_err(|err| {
        log::error!("Failed to deliver {}: {err}", artifact.filename);
        err
    })?;
    Ok(Some(path))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::session::{AuthState, MemorySessionStore, demo_users};

    /// Initialized session with John Doe signed in.
    pub fn signed_in() -> AuthState {
        let mut state = AuthState::new(Box::new(MemorySessionStore::with_user(
            demo_users().remove(0),
        )));
        state.initialize().expect("memory store never fails");
        state
    }

    /// Initialized session without a user.
    pub fn anonymous() -> AuthState {
        let mut state = AuthState::new(Box::new(MemorySessionStore::new()));
        state.initialize().expect("memory store never fails");
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_its_own_variant() {
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::Unexpected("boom".into())),
            ServiceError::Repository(_)
        ));
    }

    #[test]
    fn form_validation_keeps_field_messages() {
        let err = ServiceError::from(FormError::Validation(FieldErrors::new(vec![
            "name: Required".to_string(),
        ])));

        match err {
            ServiceError::Validation(errors) => assert!(errors.contains("name: Required")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn all_means_no_category() {
        use crate::domain::customer::CustomerStatus;

        assert_eq!(parse_category::<CustomerStatus>(Some("all")).unwrap(), None);
        assert_eq!(parse_category::<CustomerStatus>(None).unwrap(), None);
        assert_eq!(
            parse_category::<CustomerStatus>(Some("pending")).unwrap(),
            Some(CustomerStatus::Pending)
        );
        assert!(matches!(
            parse_category::<CustomerStatus>(Some("archived")),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn blank_search_is_dropped() {
        assert_eq!(normalize_search(Some("  ".into())), None);
        assert_eq!(normalize_search(Some(" acme ".into())).as_deref(), Some("acme"));
        assert_eq!(normalize_search(None), None);
    }
}
