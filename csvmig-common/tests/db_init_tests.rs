//! Tests for database initialization
//!
//! Covers automatic store creation on first run, idempotent re-initialization
//! against an existing store, and the soft foreign-key posture (enforcement
//! off).

use csvmig_common::db::init_database;
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("migration.db");

    assert!(!db_path.exists());

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());

    // Verify database file was created
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_creates_parent_directory() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("deeper").join("migration.db");

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Init should create missing parent directories");
    assert!(db_path.exists());
}

#[tokio::test]
async fn test_all_tables_created() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("migration.db");

    let pool = init_database(&db_path).await.unwrap();

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(tables.contains(&"departments".to_string()));
    assert!(tables.contains(&"jobs".to_string()));
    assert!(tables.contains(&"hired_employees".to_string()));
}

#[tokio::test]
async fn test_idempotent_initialization_preserves_data() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("migration.db");

    // Initialize and seed one row
    let pool1 = init_database(&db_path).await.unwrap();
    sqlx::query("INSERT INTO departments (id, name) VALUES (1, 'Engineering')")
        .execute(&pool1)
        .await
        .unwrap();
    pool1.close().await;

    // Initialize again against the existing store
    let pool2 = init_database(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM departments")
        .fetch_one(&pool2)
        .await
        .unwrap();

    assert_eq!(count, 1, "Re-initialization must not alter existing data");

    let name: String = sqlx::query_scalar("SELECT name FROM departments WHERE id = 1")
        .fetch_one(&pool2)
        .await
        .unwrap();
    assert_eq!(name, "Engineering");
}

#[tokio::test]
async fn test_foreign_keys_not_enforced() {
    // department_id / job_id are soft references: an insert pointing at a
    // department that does not exist must succeed.
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("migration.db");

    let pool = init_database(&db_path).await.unwrap();

    let result = sqlx::query(
        "INSERT INTO hired_employees (id, name, hired_at, department_id, job_id)
         VALUES (1, 'Dangling Ref', '2021-05-01T09:00:00Z', 999, 999)",
    )
    .execute(&pool)
    .await;

    assert!(
        result.is_ok(),
        "Soft foreign keys must not be enforced at insert time: {:?}",
        result.err()
    );
}

#[tokio::test]
async fn test_primary_key_is_unique() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("migration.db");

    let pool = init_database(&db_path).await.unwrap();

    sqlx::query("INSERT INTO jobs (id, title) VALUES (1, 'Analyst')")
        .execute(&pool)
        .await
        .unwrap();

    let result = sqlx::query("INSERT INTO jobs (id, title) VALUES (1, 'Duplicate')")
        .execute(&pool)
        .await;

    assert!(result.is_err(), "Duplicate primary key must be rejected");
}
