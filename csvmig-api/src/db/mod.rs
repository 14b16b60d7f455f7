//! Storage manager over the SQLite pool
//!
//! All writes go through [`Store`]: one transaction per call, committed on
//! success, rolled back on any error. The pool hands each call a connection
//! for the duration of its transaction and reclaims it when the call
//! returns, success or failure.

pub mod analytics;

pub use analytics::{DepartmentHires, QuarterlyHires};

use csvmig_common::{Error, Record, Result, TargetTable};
use serde_json::Value;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Arguments, SqlitePool};
use tracing::info;

/// Storage manager handed to the service façade as an explicit dependency
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Create a store over an initialized connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for read-only query paths and tests
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a batch of records into a table as one atomic statement.
    ///
    /// The column set comes from the first record's keys; every record must
    /// carry exactly that key set. All rows are written in a single
    /// transaction: any row error (a primary-key conflict included) rolls
    /// the whole batch back and nothing is inserted.
    ///
    /// Returns the number of rows the storage layer reports as written.
    pub async fn insert_batch(&self, table: TargetTable, records: &[Record]) -> Result<u64> {
        let first = records.first().ok_or_else(|| {
            Error::InvalidInput("cannot insert an empty batch".to_string())
        })?;

        let columns: Vec<&str> = first.keys().map(String::as_str).collect();
        for column in &columns {
            ensure_valid_identifier(column)?;
        }

        // Field names are resolved against the table schema by SQLite itself;
        // the shape check only guarantees every record binds the same columns.
        for (index, record) in records.iter().enumerate().skip(1) {
            let same_shape = record.len() == columns.len()
                && columns.iter().all(|c| record.contains_key(*c));
            if !same_shape {
                return Err(Error::InvalidInput(format!(
                    "record {} does not match the column set of the first record",
                    index
                )));
            }
        }

        let row_placeholder = format!("({})", vec!["?"; columns.len()].join(", "));
        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            table.as_str(),
            columns.join(", "),
            vec![row_placeholder; records.len()].join(", ")
        );

        let mut arguments = SqliteArguments::default();
        for record in records {
            for column in &columns {
                bind_value(&mut arguments, &record[*column])?;
            }
        }

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query_with(&sql, arguments).execute(&mut *tx).await?;
        tx.commit().await?;

        let inserted = result.rows_affected();
        info!(
            "Inserted {} record(s) into {}",
            inserted,
            table.as_str()
        );
        Ok(inserted)
    }

    /// Execute a single SQL statement inside its own transaction.
    ///
    /// Commits on success; any failure rolls back and re-raises. Returns the
    /// affected-row count.
    pub async fn execute(&self, query: &str) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(query).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }

    /// Delete all rows from a table and reset its auto-increment counter.
    ///
    /// The `sqlite_sequence` bookkeeping table only exists once some table
    /// has used AUTOINCREMENT; the reset is skipped when it is absent.
    pub async fn truncate(&self, table: TargetTable) -> Result<u64> {
        let deleted = self
            .execute(&format!("DELETE FROM {}", table.as_str()))
            .await?;

        let has_sequence: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'sqlite_sequence'",
        )
        .fetch_one(&self.pool)
        .await?;

        if has_sequence > 0 {
            self.execute(&format!(
                "DELETE FROM sqlite_sequence WHERE name = '{}'",
                table.as_str()
            ))
            .await?;
        }

        info!("Truncated table {} ({} row(s) removed)", table.as_str(), deleted);
        Ok(deleted)
    }
}

/// Reject column identifiers that could escape the generated statement.
///
/// Unknown-but-well-formed columns still reach SQLite and fail there.
fn ensure_valid_identifier(name: &str) -> Result<()> {
    let well_formed = !name.is_empty()
        && name.len() < 100
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if well_formed {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "invalid column name: {:?}",
            name
        )))
    }
}

/// Bind one JSON value as a SQLite argument
fn bind_value(arguments: &mut SqliteArguments<'_>, value: &Value) -> Result<()> {
    let outcome = match value {
        Value::Null => arguments.add(None::<String>),
        Value::Bool(b) => arguments.add(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                arguments.add(i)
            } else if let Some(f) = n.as_f64() {
                arguments.add(f)
            } else {
                return Err(Error::InvalidInput(format!(
                    "unsupported numeric value: {}",
                    n
                )));
            }
        }
        Value::String(s) => arguments.add(s.clone()),
        Value::Array(_) | Value::Object(_) => {
            return Err(Error::InvalidInput(
                "nested values are not supported in records".to_string(),
            ));
        }
    };

    outcome.map_err(|e| Error::Internal(format!("failed to bind value: {}", e)))
}
