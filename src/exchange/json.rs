use serde::Serialize;
use serde_json::Value;

use crate::exchange::{ExportArtifact, ExportError, ExportFormat, ImportError};
use crate::record::Record;

/// Builds `<filename>.json` holding the items as a pretty-printed array.
pub fn export_to_json<T: Serialize>(
    items: &[T],
    filename: &str,
) -> Result<ExportArtifact, ExportError> {
    let content = serde_json::to_string_pretty(items)?;
    Ok(ExportArtifact::new(filename, ExportFormat::Json, content))
}

/// Parses JSON text that must hold an array of objects.
pub fn import_from_json(text: &str) -> Result<Vec<Record>, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|err| ImportError::json(err.to_string()))?;

    let Value::Array(items) = value else {
        return Err(ImportError::json("JSON file must contain an array"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(ImportError::json(format!(
                "array item {index} is not an object: {other}"
            ))),
        })
        .collect()
}
