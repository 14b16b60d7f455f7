//! Batch ingestion pipeline: record parsing and batch validation

pub mod parser;

pub use parser::{parse_csv_file, ParsedBatch, RecordFormat};

use csvmig_common::Record;

/// Smallest batch accepted for insertion
pub const MIN_BATCH_SIZE: usize = 1;

/// Largest batch accepted for insertion
pub const MAX_BATCH_SIZE: usize = 1000;

/// Validate that a batch holds between 1 and 1000 records inclusive.
///
/// Pure check; the caller turns a false result into a user-facing error that
/// names the constraint.
pub fn is_valid_batch(records: &[Record]) -> bool {
    (MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&records.len())
}
