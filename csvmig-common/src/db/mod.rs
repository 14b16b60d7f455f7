//! Database layer: schema initialization, row models, table vocabulary

pub mod init;
pub mod models;

pub use init::init_database;
pub use models::{Department, HiredEmployee, Job};

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// An untyped record mapping, as parsed from CSV or received as JSON.
///
/// The ingestion pipeline deliberately works on mappings rather than typed
/// rows: field names are resolved against the table schema only at insert
/// time, by the storage layer.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// The three tables the migration service can write to.
///
/// Every ingest endpoint takes the target table from the request path and
/// parses it through this enum, so an unknown table name is rejected before
/// any SQL is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetTable {
    Departments,
    Jobs,
    HiredEmployees,
}

impl TargetTable {
    /// All valid tables, in the order they are created by the initializer
    pub const ALL: [TargetTable; 3] = [
        TargetTable::Departments,
        TargetTable::Jobs,
        TargetTable::HiredEmployees,
    ];

    /// SQL identifier of the table
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetTable::Departments => "departments",
            TargetTable::Jobs => "jobs",
            TargetTable::HiredEmployees => "hired_employees",
        }
    }
}

impl fmt::Display for TargetTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetTable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "departments" => Ok(TargetTable::Departments),
            "jobs" => Ok(TargetTable::Jobs),
            "hired_employees" => Ok(TargetTable::HiredEmployees),
            other => Err(Error::InvalidInput(format!(
                "Invalid table name: {}. Must be one of: departments, jobs, hired_employees",
                other
            ))),
        }
    }
}
