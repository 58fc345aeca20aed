//! Form schemas validating raw dashboard input before it reaches the domain.
//!
//! Input arrives as an arbitrary JSON value. [`validate_form`] checks it in two
//! passes: a shape pass driven by the schema's [`FieldSpec`] table (presence,
//! JSON type, enum membership) and a rule pass delegated to the `validator`
//! derive on the form struct (lengths, ranges, email). Both passes report
//! `"field: message"` strings ordered by field declaration.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use validator::Validate;

use crate::domain::types::TypeConstraintError;

pub mod activity;
pub mod customer;
pub mod deal;
pub mod search;

/// Message used when validation fails for a reason no field rule describes.
pub const UNKNOWN_VALIDATION_ERROR: &str = "Unknown validation error";

/// Ordered list of `"field: message"` validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.join("; "))]
pub struct FieldErrors(Vec<String>);

impl FieldErrors {
    pub fn new(errors: Vec<String>) -> Self {
        Self(errors)
    }

    fn unknown() -> Self {
        Self(vec![UNKNOWN_VALIDATION_ERROR.to_string()])
    }

    pub fn errors(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    pub fn contains(&self, error: &str) -> bool {
        self.0.iter().any(|e| e == error)
    }
}

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] FieldErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid company")]
    InvalidCompany,

    #[error("invalid title")]
    InvalidTitle,

    #[error("invalid deal value")]
    InvalidValue,

    #[error("invalid probability")]
    InvalidProbability,

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("invalid customer reference")]
    InvalidCustomer,

    #[error(transparent)]
    TypeConstraint(#[from] TypeConstraintError),
}

/// JSON type a schema field expects.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    String,
    Number,
    Integer,
    /// String restricted to the listed values.
    Enum(&'static [&'static str]),
}

/// One declared field of a schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Key in the submitted JSON object and in reported errors.
    pub name: &'static str,
    /// Rust field name, as reported by the `validator` derive.
    pub ident: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, ident: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            ident,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, ident: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            ident,
            kind,
            required: false,
        }
    }
}

/// A form struct validated by [`validate_form`].
pub trait FormSchema: DeserializeOwned + Validate {
    /// Declared fields in reporting order.
    const FIELDS: &'static [FieldSpec];

    /// Rules the `validator` derive cannot express, as `(ident, message)` pairs.
    fn extra_rules(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn enum_options(options: &[&str]) -> String {
    options
        .iter()
        .map(|option| format!("'{option}'"))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Checks a single field's JSON shape, returning the failure message.
fn check_shape(field: &FieldSpec, value: &Value) -> Option<String> {
    match (field.kind, value) {
        (FieldKind::String, Value::String(_)) => None,
        (FieldKind::Number, Value::Number(_)) => None,
        (FieldKind::Integer, Value::Number(number)) => {
            if number.as_f64().is_some_and(|value| value.fract() == 0.0) {
                None
            } else {
                Some("Expected integer, received float".to_string())
            }
        }
        (FieldKind::Enum(options), Value::String(s)) => {
            if options.contains(&s.as_str()) {
                None
            } else {
                Some(format!(
                    "Invalid enum value. Expected {}, received '{s}'",
                    enum_options(options)
                ))
            }
        }
        (FieldKind::String, other) => {
            Some(format!("Expected string, received {}", json_kind(other)))
        }
        (FieldKind::Number | FieldKind::Integer, other) => {
            Some(format!("Expected number, received {}", json_kind(other)))
        }
        (FieldKind::Enum(options), other) => Some(format!(
            "Expected {}, received {}",
            enum_options(options),
            json_kind(other)
        )),
    }
}

/// Validates `data` against the schema `T`.
///
/// Never panics: a value that passes the shape pass but still fails to
/// deserialize yields the single entry [`UNKNOWN_VALIDATION_ERROR`].
pub fn validate_form<T: FormSchema>(data: &Value) -> Result<T, FieldErrors> {
    let Some(object) = data.as_object() else {
        return Err(FieldErrors::new(vec![format!(
            ": Expected object, received {}",
            json_kind(data)
        )]));
    };

    let mut errors: Vec<(usize, String)> = Vec::new();
    let mut failed = vec![false; T::FIELDS.len()];
    let mut accepted = Map::new();

    for (index, field) in T::FIELDS.iter().enumerate() {
        match object.get(field.name) {
            None if field.required => {
                errors.push((index, format!("{}: Required", field.name)));
                failed[index] = true;
            }
            None => {}
            Some(value) => match check_shape(field, value) {
                Some(message) => {
                    errors.push((index, format!("{}: {message}", field.name)));
                    failed[index] = true;
                }
                None => {
                    accepted.insert(field.name.to_string(), value.clone());
                }
            },
        }
    }

    let form: T = match serde_json::from_value(Value::Object(accepted)) {
        Ok(form) => form,
        Err(err) => {
            log::debug!("Form passed shape checks but failed to deserialize: {err}");
            return Err(FieldErrors::unknown());
        }
    };

    let position = |key: &str| {
        T::FIELDS
            .iter()
            .position(|field| field.ident == key || field.name == key)
    };

    if let Err(rule_errors) = form.validate() {
        for (field, field_errors) in rule_errors.field_errors() {
            let key: &str = field.as_ref();
            let Some(index) = position(key) else {
                return Err(FieldErrors::unknown());
            };
            if failed[index] {
                continue;
            }
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                errors.push((index, format!("{}: {message}", T::FIELDS[index].name)));
            }
        }
    }

    for (ident, message) in form.extra_rules() {
        let Some(index) = position(ident) else {
            return Err(FieldErrors::unknown());
        };
        if !failed[index] {
            errors.push((index, format!("{}: {message}", T::FIELDS[index].name)));
        }
    }

    if errors.is_empty() {
        return Ok(form);
    }

    errors.sort_by_key(|(index, _)| *index);
    Err(FieldErrors::new(
        errors.into_iter().map(|(_, message)| message).collect(),
    ))
}

/// Trims an optional free-text value, dropping it when blank, and strips markup.
pub(crate) fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| ammonia::clean(text.trim()))
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
