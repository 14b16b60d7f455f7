//! Typed row models for the three migration tables
//!
//! The ingestion path itself moves untyped record mappings; these models are
//! the read-side view of what lands in the store.

use serde::{Deserialize, Serialize};

/// Row of the `departments` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

/// Row of the `jobs` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: i64,
    pub title: String,
}

/// Row of the `hired_employees` table
///
/// `hired_at` is stored as the timestamp text supplied by the source; the
/// analytical queries read its year and month with SQLite's strftime.
/// `department_id` / `job_id` are soft references and may be NULL or dangling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HiredEmployee {
    pub id: i64,
    pub name: String,
    pub hired_at: String,
    pub department_id: Option<i64>,
    pub job_id: Option<i64>,
}
