//! Database initialization
//!
//! Creates the SQLite store and its three tables on first run. Safe to call
//! again on an existing store: table creation is `IF NOT EXISTS` and no
//! existing data is touched.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Initialize the database connection pool and create tables if needed
///
/// Foreign keys are declared in the schema but enforcement stays off:
/// `department_id` / `job_id` are soft references, resolved only by
/// query-time joins. A hire may point at a department or job that was never
/// loaded.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // create_if_missing creates the database file when absent; foreign_keys
    // stays off so department_id / job_id remain soft references (sqlx would
    // otherwise enable enforcement by default on every connection).
    let connect_options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(false);
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(connect_options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL allows concurrent readers alongside one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    // Bounded wait on the SQLite write lock before surfacing a busy error
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_departments_table(&pool).await?;
    create_jobs_table(&pool).await?;
    create_hired_employees_table(&pool).await?;

    Ok(pool)
}

async fn create_departments_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS departments (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_jobs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS jobs (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_hired_employees_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS hired_employees (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            hired_at TIMESTAMP NOT NULL,
            department_id INTEGER,
            job_id INTEGER,
            FOREIGN KEY (department_id) REFERENCES departments(id),
            FOREIGN KEY (job_id) REFERENCES jobs(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
