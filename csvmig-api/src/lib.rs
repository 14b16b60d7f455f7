//! csvmig-api library - CSV migration HTTP service
//!
//! Accepts tabular records (departments, jobs, hired employees) over HTTP,
//! batch-inserts them into a single-file SQLite store, and answers two fixed
//! analytical queries.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod db;
pub mod ingest;

pub use db::Store;

/// Application state shared across HTTP handlers
///
/// The store is injected at construction; handlers never reach for process
/// globals, so tests can run each router against its own database.
#[derive(Clone)]
pub struct AppState {
    /// Storage manager over the SQLite pool
    pub store: Store,
}

impl AppState {
    /// Create new application state around a connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            store: Store::new(pool),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        // Liveness and health
        .route("/", get(api::root_status))
        .route("/health", get(api::health_check))
        // Ingestion
        .route("/upload/:table", post(api::upload_csv))
        .route("/upload-from-path/:table", post(api::upload_csv_from_path))
        .route("/batch/:table", post(api::insert_batch))
        .route("/truncate/:table", post(api::truncate_table))
        // Analytical queries
        .route("/sql/employees-by-quarter", get(api::employees_by_quarter))
        .route("/sql/departments-above-mean", get(api::departments_above_mean))
        .with_state(state)
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
}
