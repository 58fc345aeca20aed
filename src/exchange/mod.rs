//! Export of record collections into downloadable artifacts and import of
//! uploaded CSV/JSON text back into records.

use std::path::Path;
use std::string::FromUtf8Error;

use serde::Serialize;
use thiserror::Error;

pub mod csv;
pub mod format;
pub mod json;
pub mod sink;

pub use self::csv::{export_to_csv, import_from_csv, import_from_quoted_csv};
pub use self::format::{format_customer_data, format_deal_data};
pub use self::json::{export_to_json, import_from_json};
pub use self::sink::{DirectorySink, DownloadSink, MemorySink};

/// Errors raised while turning uploaded text into records.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The text was malformed or structurally insufficient.
    #[error("Failed to parse {format}: {reason}")]
    Parse {
        format: &'static str,
        reason: String,
    },
    /// The uploaded file could not be read.
    #[error("Failed to read file")]
    Read(#[source] std::io::Error),
}

impl ImportError {
    pub(crate) fn csv(reason: impl Into<String>) -> Self {
        Self::Parse {
            format: "CSV",
            reason: reason.into(),
        }
    }

    pub(crate) fn json(reason: impl Into<String>) -> Self {
        Self::Parse {
            format: "JSON",
            reason: reason.into(),
        }
    }
}

/// Errors raised while producing or delivering an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] FromUtf8Error),
}

/// Download formats offered by the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    pub const fn mime(self) -> &'static str {
        match self {
            Self::Csv => "text/csv;charset=utf-8;",
            Self::Json => "application/json",
        }
    }
}

/// A finished export waiting to be handed to a [`DownloadSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    /// File name including the extension, e.g. `customers.csv`.
    pub filename: String,
    pub format: ExportFormat,
    pub content: String,
}

impl ExportArtifact {
    pub fn new(name: &str, format: ExportFormat, content: String) -> Self {
        Self {
            filename: format!("{name}.{}", format.extension()),
            format,
            content,
        }
    }

    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }
}

/// Reads an uploaded file into memory.
pub fn read_upload(path: &Path) -> Result<String, ImportError> {
    std::fs::read_to_string(path).map_err(|err| {
        log::error!("Failed to read upload {}: {err}", path.display());
        ImportError::Read(err)
    })
}
