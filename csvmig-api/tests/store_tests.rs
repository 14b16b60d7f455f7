//! Tests for the storage manager: atomic batch insert, execute, truncate

use csvmig_api::Store;
use csvmig_common::db::{init_database, HiredEmployee};
use csvmig_common::{Error, Record, TargetTable};
use serde_json::json;
use tempfile::TempDir;

async fn setup_store() -> (TempDir, Store) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("migration.db");
    let pool = init_database(&db_path)
        .await
        .expect("Should initialize test database");
    (temp_dir, Store::new(pool))
}

fn record(value: serde_json::Value) -> Record {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("test records must be JSON objects"),
    }
}

#[tokio::test]
async fn test_insert_batch_returns_affected_count() {
    let (_dir, store) = setup_store().await;

    let records = vec![
        record(json!({"id": 1, "name": "Engineering"})),
        record(json!({"id": 2, "name": "Sales"})),
    ];

    let inserted = store
        .insert_batch(TargetTable::Departments, &records)
        .await
        .unwrap();

    assert_eq!(inserted, 2);
}

#[tokio::test]
async fn test_insert_batch_round_trips_soft_fk_nulls() {
    let (_dir, store) = setup_store().await;

    let records = vec![record(json!({
        "id": 7,
        "name": "Ty Hofer",
        "hired_at": "2021-05-30T05:43:46Z",
        "department_id": null,
        "job_id": 8,
    }))];

    store
        .insert_batch(TargetTable::HiredEmployees, &records)
        .await
        .unwrap();

    let row: HiredEmployee = sqlx::query_as(
        "SELECT id, name, hired_at, department_id, job_id FROM hired_employees WHERE id = 7",
    )
    .fetch_one(store.pool())
    .await
    .unwrap();

    assert_eq!(row.name, "Ty Hofer");
    assert_eq!(row.hired_at, "2021-05-30T05:43:46Z");
    assert_eq!(row.department_id, None);
    assert_eq!(row.job_id, Some(8));
}

#[tokio::test]
async fn test_insert_batch_rejects_empty_input() {
    let (_dir, store) = setup_store().await;

    let err = store
        .insert_batch(TargetTable::Departments, &[])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn test_insert_batch_rejects_shape_mismatch() {
    let (_dir, store) = setup_store().await;

    let records = vec![
        record(json!({"id": 1, "name": "Engineering"})),
        record(json!({"id": 2, "label": "Sales"})),
    ];

    let err = store
        .insert_batch(TargetTable::Departments, &records)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)));

    // Nothing was written
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM departments")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_insert_batch_rejects_unknown_column_via_storage() {
    // Well-formed but unknown field names are left for SQLite to reject
    let (_dir, store) = setup_store().await;

    let records = vec![record(json!({"id": 1, "nickname": "Eng"}))];

    let err = store
        .insert_batch(TargetTable::Departments, &records)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Database(_)));
}

#[tokio::test]
async fn test_insert_batch_pk_conflict_is_atomic() {
    let (_dir, store) = setup_store().await;

    store
        .insert_batch(
            TargetTable::Jobs,
            &[record(json!({"id": 1, "title": "Analyst"}))],
        )
        .await
        .unwrap();

    let err = store
        .insert_batch(
            TargetTable::Jobs,
            &[
                record(json!({"id": 2, "title": "Engineer"})),
                record(json!({"id": 1, "title": "Duplicate"})),
            ],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Database(_)));

    // The whole batch rolled back: id 2 is absent, id 1 untouched
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);

    let title: String = sqlx::query_scalar("SELECT title FROM jobs WHERE id = 1")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(title, "Analyst");
}

#[tokio::test]
async fn test_execute_reports_affected_rows() {
    let (_dir, store) = setup_store().await;

    store
        .insert_batch(
            TargetTable::Departments,
            &[
                record(json!({"id": 1, "name": "Engineering"})),
                record(json!({"id": 2, "name": "Sales"})),
            ],
        )
        .await
        .unwrap();

    let affected = store
        .execute("DELETE FROM departments WHERE id = 1")
        .await
        .unwrap();

    assert_eq!(affected, 1);
}

#[tokio::test]
async fn test_execute_surfaces_storage_errors() {
    let (_dir, store) = setup_store().await;

    let err = store.execute("DELETE FROM no_such_table").await.unwrap_err();
    assert!(matches!(err, Error::Database(_)));
}

#[tokio::test]
async fn test_truncate_removes_all_rows() {
    let (_dir, store) = setup_store().await;

    let records: Vec<Record> = (1..=5)
        .map(|i| record(json!({"id": i, "name": format!("Department {}", i)})))
        .collect();
    store
        .insert_batch(TargetTable::Departments, &records)
        .await
        .unwrap();

    let deleted = store.truncate(TargetTable::Departments).await.unwrap();
    assert_eq!(deleted, 5);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM departments")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_truncate_then_reinsert_behaves_like_fresh_table() {
    let (_dir, store) = setup_store().await;

    store
        .insert_batch(
            TargetTable::Jobs,
            &[record(json!({"id": 1, "title": "Analyst"}))],
        )
        .await
        .unwrap();

    store.truncate(TargetTable::Jobs).await.unwrap();

    // Re-using the old primary key succeeds after a truncate
    store
        .insert_batch(
            TargetTable::Jobs,
            &[record(json!({"id": 1, "title": "Rebuilt"}))],
        )
        .await
        .unwrap();

    let title: String = sqlx::query_scalar("SELECT title FROM jobs WHERE id = 1")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(title, "Rebuilt");
}

#[tokio::test]
async fn test_analytics_recomputed_per_call() {
    let (_dir, store) = setup_store().await;

    store
        .insert_batch(
            TargetTable::Departments,
            &[record(json!({"id": 1, "name": "Engineering"}))],
        )
        .await
        .unwrap();
    store
        .insert_batch(
            TargetTable::Jobs,
            &[record(json!({"id": 1, "title": "Analyst"}))],
        )
        .await
        .unwrap();

    assert!(store.employees_by_quarter().await.unwrap().is_empty());

    store
        .insert_batch(
            TargetTable::HiredEmployees,
            &[record(json!({
                "id": 1,
                "name": "Harold Vogt",
                "hired_at": "2021-11-07T02:48:42Z",
                "department_id": 1,
                "job_id": 1,
            }))],
        )
        .await
        .unwrap();

    // No caching: the new hire shows up on the next call
    let rows = store.employees_by_quarter().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].department, "Engineering");
    assert_eq!(rows[0].q4, 1);
}
