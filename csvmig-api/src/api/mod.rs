//! HTTP API: handlers and error mapping

mod analytics;
mod error;
mod health;
mod ingest;

pub use analytics::{departments_above_mean, employees_by_quarter};
pub use error::ApiError;
pub use health::{health_check, root_status};
pub use ingest::{insert_batch, truncate_table, upload_csv, upload_csv_from_path};
