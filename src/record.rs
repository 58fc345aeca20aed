//! Flat key/value records exchanged with the export and import utilities.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::{Map, Value};

/// One row of exported or imported data. Keys keep insertion order.
pub type Record = Map<String, Value>;

/// Renders a JSON value the way it appears in a table cell.
///
/// Strings are used verbatim, `null` becomes the empty string, arrays join
/// their rendered items with commas and objects fall back to compact JSON.
pub fn value_to_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Array(items) => Cow::Owned(
            items
                .iter()
                .map(value_to_text)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Cow::Owned(value.to_string()),
    }
}

/// Serializes typed values into records, dropping anything that is not a JSON object.
pub fn to_records<T: Serialize>(items: &[T]) -> Vec<Record> {
    items
        .iter()
        .filter_map(|item| match serde_json::to_value(item) {
            Ok(Value::Object(map)) => Some(map),
            Ok(_) => None,
            Err(err) => {
                log::error!("Failed to serialize record: {err}");
                None
            }
        })
        .collect()
}
