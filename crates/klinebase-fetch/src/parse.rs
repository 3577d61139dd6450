//! Tolerant CSV parsing of archive rows into a [`RawTable`].

use csv::{ReaderBuilder, StringRecord, Trim};
use klinebase_types::KlinebaseError;
use klinebase_types::RawTable;
use klinebase_types::raw::{RAW_COLUMNS, TARGET_COLUMNS};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during kline parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Required columns are absent from the parsed table.
    #[error("Missing columns in CSV: {}", missing.join(", "))]
    SchemaViolation {
        /// Names of the absent columns.
        missing: Vec<String>,
    },
}

impl From<ParseError> for KlinebaseError {
    fn from(e: ParseError) -> Self {
        Self::Format(e.to_string())
    }
}

/// Parses archive CSV text into the fixed 12-column raw schema.
///
/// Parsing never fails because of a single bad line:
/// - a line with more fields than the schema, or one the CSV reader cannot
///   decode, is skipped;
/// - a short line is padded with nulls;
/// - empty fields become nulls;
/// - a leading header line is skipped.
///
/// # Errors
///
/// Returns [`ParseError::SchemaViolation`] if a target column is missing
/// from the resulting table.
pub fn parse_klines(text: &str) -> Result<RawTable, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    let mut skipped = 0usize;

    for (line, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                debug!(line, error = %e, "Skipping unreadable CSV line");
                skipped += 1;
                continue;
            }
        };

        if record.len() > RAW_COLUMNS.len() {
            debug!(line, fields = record.len(), "Skipping CSV line with too many fields");
            skipped += 1;
            continue;
        }

        if line == 0 && is_header(&record) {
            continue;
        }

        rows.push(
            record
                .iter()
                .map(|field| (!field.is_empty()).then(|| field.to_string()))
                .collect(),
        );
    }

    if skipped > 0 {
        debug!(rows = rows.len(), skipped, "Parsed klines with skipped lines");
    }

    let table = RawTable::from_rows(&RAW_COLUMNS, rows);
    check_columns(&table)?;
    Ok(table)
}

/// Verifies that every target column is present in `table`.
///
/// # Errors
///
/// Returns [`ParseError::SchemaViolation`] naming the absent columns.
pub fn check_columns(table: &RawTable) -> Result<(), ParseError> {
    let missing = table.missing_columns(&TARGET_COLUMNS);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ParseError::SchemaViolation { missing })
    }
}

/// Newer archives start with a column-name row such as `open_time,open,...`.
fn is_header(record: &StringRecord) -> bool {
    record.get(0).is_some_and(|first| {
        !first.is_empty() && first.parse::<f64>().is_err() && first.contains("time")
    })
}
