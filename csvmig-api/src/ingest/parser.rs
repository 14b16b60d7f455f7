//! CSV record parsing
//!
//! Converts raw CSV rows into untyped record mappings keyed by the target
//! table's column names. The three known tables carry no header row; their
//! column layout is fixed by the selected [`RecordFormat`]. Unknown sources
//! fall back to generic header mode.
//!
//! Rows with too few columns are skipped rather than failing the file; the
//! skip count is surfaced in [`ParsedBatch`] so callers can detect data loss.
//! A malformed numeric cell fails the whole parse.

use csvmig_common::{Error, Record, Result, TargetTable};
use serde_json::Value;
use std::path::Path;

/// Substring rules for inferring a format from a source file name.
///
/// First match wins, scanned in order.
const NAME_RULES: &[(&str, RecordFormat)] = &[
    ("department", RecordFormat::Departments),
    ("job", RecordFormat::Jobs),
    ("employee", RecordFormat::HiredEmployees),
    ("hired", RecordFormat::HiredEmployees),
];

/// Column layout applied to a CSV source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// Headerless rows: (id, name)
    Departments,
    /// Headerless rows: (id, title)
    Jobs,
    /// Headerless rows: (id, name, hired_at, department_id, job_id)
    HiredEmployees,
    /// First row is a header; remaining rows map header name to cell value
    Generic,
}

impl RecordFormat {
    /// Select the format for a CSV source.
    ///
    /// When the caller already knows the target table (every upload endpoint
    /// does, from the request path), the table decides. Name inference is the
    /// fallback for sources with no declared table: the file name is matched
    /// against [`NAME_RULES`], generic header mode otherwise.
    pub fn select(table: Option<TargetTable>, source_name: &str) -> RecordFormat {
        if let Some(table) = table {
            return RecordFormat::for_table(table);
        }

        let name = source_name.to_lowercase();
        for (needle, format) in NAME_RULES {
            if name.contains(needle) {
                return *format;
            }
        }
        RecordFormat::Generic
    }

    /// Fixed format for a known table
    pub fn for_table(table: TargetTable) -> RecordFormat {
        match table {
            TargetTable::Departments => RecordFormat::Departments,
            TargetTable::Jobs => RecordFormat::Jobs,
            TargetTable::HiredEmployees => RecordFormat::HiredEmployees,
        }
    }

    /// Minimum number of columns a data row must carry; shorter rows are
    /// skipped. Generic mode instead requires an exact header-width match.
    fn min_columns(&self) -> usize {
        match self {
            RecordFormat::Departments | RecordFormat::Jobs => 2,
            RecordFormat::HiredEmployees => 5,
            RecordFormat::Generic => 0,
        }
    }
}

/// Result of parsing one CSV source
#[derive(Debug)]
pub struct ParsedBatch {
    /// Records in input row order
    pub records: Vec<Record>,
    /// Rows dropped for having the wrong column count
    pub rows_skipped: usize,
}

/// Parse a CSV file into record mappings using the given format
pub fn parse_csv_file(path: &Path, format: RecordFormat) -> Result<ParsedBatch> {
    if !path.exists() {
        return Err(Error::NotFound(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::Parse(format!("cannot open CSV source: {}", e)))?;

    let mut records = Vec::new();
    let mut rows_skipped = 0usize;
    let mut header: Option<Vec<String>> = None;

    for row in reader.records() {
        let row = row.map_err(|e| Error::Parse(format!("cannot read CSV row: {}", e)))?;

        if format == RecordFormat::Generic {
            match &header {
                None => {
                    header = Some(row.iter().map(str::to_string).collect());
                }
                Some(columns) => match generic_record(columns, &row) {
                    Some(record) => records.push(record),
                    None => rows_skipped += 1,
                },
            }
            continue;
        }

        if row.len() < format.min_columns() {
            rows_skipped += 1;
            continue;
        }

        records.push(fixed_record(format, &row)?);
    }

    Ok(ParsedBatch {
        records,
        rows_skipped,
    })
}

/// Build a record for one of the three fixed layouts
fn fixed_record(format: RecordFormat, row: &csv::StringRecord) -> Result<Record> {
    let mut record = Record::new();

    match format {
        RecordFormat::Departments => {
            record.insert("id".to_string(), required_int(&row[0], "id")?);
            record.insert("name".to_string(), Value::String(row[1].to_string()));
        }
        RecordFormat::Jobs => {
            record.insert("id".to_string(), required_int(&row[0], "id")?);
            record.insert("title".to_string(), Value::String(row[1].to_string()));
        }
        RecordFormat::HiredEmployees => {
            record.insert("id".to_string(), required_int(&row[0], "id")?);
            record.insert("name".to_string(), Value::String(row[1].to_string()));
            record.insert("hired_at".to_string(), Value::String(row[2].to_string()));
            record.insert(
                "department_id".to_string(),
                optional_int(&row[3], "department_id")?,
            );
            record.insert("job_id".to_string(), optional_int(&row[4], "job_id")?);
        }
        RecordFormat::Generic => unreachable!("generic rows are built from the header"),
    }

    Ok(record)
}

/// Build a generic-mode record; None when the row width does not match the
/// header width
fn generic_record(columns: &[String], row: &csv::StringRecord) -> Option<Record> {
    if row.len() != columns.len() {
        return None;
    }

    let mut record = Record::new();
    for (column, cell) in columns.iter().zip(row.iter()) {
        record.insert(column.clone(), Value::String(cell.to_string()));
    }
    Some(record)
}

/// Parse a required integer cell; malformed input fails the whole parse
fn required_int(cell: &str, column: &str) -> Result<Value> {
    cell.trim()
        .parse::<i64>()
        .map(Value::from)
        .map_err(|_| {
            Error::Parse(format!(
                "invalid integer value '{}' in column '{}'",
                cell, column
            ))
        })
}

/// Parse an optional integer cell: empty/whitespace maps to null, malformed
/// non-empty input fails the whole parse
fn optional_int(cell: &str, column: &str) -> Result<Value> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    required_int(trimmed, column)
}
