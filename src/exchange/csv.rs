//! CSV export and import.
//!
//! Export always quotes data cells and leaves the header row bare. The default
//! import is a plain comma split: a cell containing a comma shifts every
//! following cell of its row. [`import_from_quoted_csv`] is the opt-in reader
//! that honours quoting.

use ::csv::{QuoteStyle, ReaderBuilder, Terminator, Trim, WriterBuilder};
use serde_json::Value;

use crate::exchange::{ExportArtifact, ExportError, ExportFormat, ImportError};
use crate::record::{Record, value_to_text};

const TOO_SHORT: &str = "CSV file must have at least a header row and one data row";

/// Renders records as CSV text, `None` when there is nothing to export.
///
/// Column order comes from the first record's keys. Keys missing from a
/// later record produce empty cells; extra keys are not exported.
pub fn to_csv_string(records: &[Record]) -> Result<Option<String>, ExportError> {
    let Some(first) = records.first() else {
        return Ok(None);
    };
    let headers: Vec<&String> = first.keys().collect();

    // No columns: an empty header line followed by one empty line per record.
    if headers.is_empty() {
        return Ok(Some(format!("\n{}", vec![""; records.len()].join("\n"))));
    }

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for record in records {
        let row: Vec<String> = headers
            .iter()
            .map(|header| {
                record
                    .get(header.as_str())
                    .map(|value| value_to_text(value).into_owned())
                    .unwrap_or_default()
            })
            .collect();
        writer.write_record(&row)?;
    }

    let body = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    let body = String::from_utf8(body)?;

    let header_row = headers
        .iter()
        .map(|header| header.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let mut content = String::with_capacity(header_row.len() + body.len() + 1);
    content.push_str(&header_row);
    content.push('\n');
    content.push_str(body.trim_end_matches('\n'));
    Ok(Some(content))
}

/// Builds `<filename>.csv` from the records.
///
/// An empty collection yields no artifact and logs a warning.
pub fn export_to_csv(
    records: &[Record],
    filename: &str,
) -> Result<Option<ExportArtifact>, ExportError> {
    match to_csv_string(records)? {
        Some(content) => Ok(Some(ExportArtifact::new(
            filename,
            ExportFormat::Csv,
            content,
        ))),
        None => {
            log::warn!("No data to export");
            Ok(None)
        }
    }
}

fn clean_cell(cell: &str) -> String {
    cell.replace('"', "").trim().to_string()
}

/// Parses CSV text by splitting rows on newlines and cells on commas.
///
/// Blank lines are dropped, quotes and surrounding whitespace are stripped
/// from every cell, and short rows are padded with empty strings.
pub fn import_from_csv(text: &str) -> Result<Vec<Record>, ImportError> {
    let lines: Vec<&str> = text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect();

    let [header_line, data_lines @ ..] = lines.as_slice() else {
        return Err(ImportError::csv(TOO_SHORT));
    };
    if data_lines.is_empty() {
        return Err(ImportError::csv(TOO_SHORT));
    }

    let headers: Vec<String> = header_line.split(',').map(clean_cell).collect();

    let records = data_lines
        .iter()
        .map(|line| {
            let values: Vec<String> = line.split(',').map(clean_cell).collect();
            let mut record = Record::new();
            for (index, header) in headers.iter().enumerate() {
                let value = values.get(index).cloned().unwrap_or_default();
                record.insert(header.clone(), Value::String(value));
            }
            record
        })
        .collect();

    Ok(records)
}

/// Parses RFC 4180 CSV, keeping commas and quotes inside quoted cells.
pub fn import_from_quoted_csv(text: &str) -> Result<Vec<Record>, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|err| ImportError::csv(err.to_string()))?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|err| ImportError::csv(err.to_string()))?;
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let mut record = Record::new();
        for (index, header) in headers.iter().enumerate() {
            let value = row.get(index).unwrap_or_default();
            record.insert(header.to_string(), Value::String(value.to_string()));
        }
        records.push(record);
    }

    if headers.is_empty() || records.is_empty() {
        return Err(ImportError::csv(TOO_SHORT));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn empty_export_produces_nothing() {
        assert_eq!(export_to_csv(&[], "customers").unwrap(), None);
    }

    #[test]
    fn records_without_keys_render_empty_lines() {
        assert_eq!(to_csv_string(&[Record::new()]).unwrap().as_deref(), Some("\n"));
        assert_eq!(
            to_csv_string(&[Record::new(), record(json!({"name": "Ann"}))])
                .unwrap()
                .as_deref(),
            Some("\n\n")
        );
    }

    #[test]
    fn quotes_every_data_cell() {
        let rows = vec![
            record(json!({"Name": "Ann Lee", "Value": 50000, "Note": "say \"hi\""})),
            record(json!({"Name": "Bob", "Value": 10, "Note": null})),
        ];

        let artifact = export_to_csv(&rows, "people").unwrap().unwrap();

        assert_eq!(artifact.filename, "people.csv");
        assert_eq!(
            artifact.content,
            "Name,Value,Note\n\"Ann Lee\",\"50000\",\"say \"\"hi\"\"\"\n\"Bob\",\"10\",\"\""
        );
    }

    #[test]
    fn header_order_follows_first_record() {
        let rows = vec![
            record(json!({"b": "1", "a": "2"})),
            record(json!({"a": "3", "c": "4"})),
        ];

        let csv = to_csv_string(&rows).unwrap().unwrap();

        assert_eq!(csv, "b,a\n\"1\",\"2\"\n\"\",\"3\"");
    }

    #[test]
    fn imports_rows_against_headers() {
        let text = "\"Name\",\"Email\",\"Phone\"\n\"Ann Lee\",\"a@x.com\"\n\n  \nBob , b@x.com , 555\n";

        let rows = import_from_csv(text).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Name"], "Ann Lee");
        assert_eq!(rows[0]["Phone"], "");
        assert_eq!(rows[1]["Email"], "b@x.com");
        assert_eq!(rows[1]["Phone"], "555");
    }

    #[test]
    fn header_only_input_is_rejected() {
        let err = import_from_csv("Name,Email\n\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to parse CSV: CSV file must have at least a header row and one data row"
        );
        assert!(import_from_csv("").is_err());
    }

    #[test]
    fn handles_carriage_returns() {
        let rows = import_from_csv("Name,Company\r\nAnn,X\r\n").unwrap();
        assert_eq!(rows[0]["Company"], "X");
    }

    #[test]
    fn comma_inside_value_shifts_cells() {
        let rows = vec![record(json!({"Company": "Acme, Inc", "Status": "active"}))];
        let csv = to_csv_string(&rows).unwrap().unwrap();

        let imported = import_from_csv(&csv).unwrap();

        assert_eq!(imported[0]["Company"], "Acme");
        assert_eq!(imported[0]["Status"], "Inc");
    }

    #[test]
    fn quoted_reader_keeps_embedded_commas() {
        let rows = vec![record(json!({"Company": "Acme, Inc", "Status": "active"}))];
        let csv = to_csv_string(&rows).unwrap().unwrap();

        let imported = import_from_quoted_csv(&csv).unwrap();

        assert_eq!(imported, rows);
    }

    #[test]
    fn quoted_reader_rejects_header_only_input() {
        assert!(matches!(
            import_from_quoted_csv("Name,Email\n"),
            Err(ImportError::Parse { format: "CSV", .. })
        ));
    }
}
