//! Ingestion endpoints: CSV upload, JSON batch insert, table truncate

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use csvmig_common::{Record, TargetTable};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::info;

use crate::api::ApiError;
use crate::ingest::{is_valid_batch, parse_csv_file, RecordFormat};
use crate::AppState;

/// Response for CSV upload endpoints; carries the count of rows dropped by
/// the parser so callers can detect silent data loss
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub records_inserted: u64,
    pub rows_skipped: usize,
}

/// Response for the JSON batch endpoint
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub message: String,
    pub records_inserted: u64,
}

/// Response for the truncate endpoint
#[derive(Debug, Serialize)]
pub struct TruncateResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadFromPathRequest {
    pub file_path: String,
}

/// POST /upload/:table
///
/// Loads a CSV file sent as a multipart body into the named table. The
/// payload is spooled to a temp file that is removed when the handler
/// returns, success or failure.
pub async fn upload_csv(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let table = parse_table(&table_name)?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("malformed multipart body: {}", e)))?
        .ok_or_else(|| {
            ApiError::Validation("multipart upload must include a file field".to_string())
        })?;

    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::Validation(format!("failed to read upload body: {}", e)))?;

    let mut temp_file =
        NamedTempFile::new().map_err(|e| ApiError::Storage(e.to_string()))?;
    temp_file
        .write_all(&bytes)
        .and_then(|_| temp_file.flush())
        .map_err(|e| ApiError::Storage(e.to_string()))?;

    // The request path already names the target table, so the format is
    // selected from it rather than from the upload's file name.
    let format = RecordFormat::select(Some(table), "");
    let batch = parse_csv_file(temp_file.path(), format)?;

    let inserted = validate_and_insert(&state, table, &batch.records).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: format!("CSV file loaded successfully into table {}", table),
            records_inserted: inserted,
            rows_skipped: batch.rows_skipped,
        }),
    ))
}

/// POST /upload-from-path/:table
///
/// Loads a CSV file already present on the service file system. 404 when the
/// path does not exist.
pub async fn upload_csv_from_path(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
    Json(request): Json<UploadFromPathRequest>,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let table = parse_table(&table_name)?;

    let format = RecordFormat::select(Some(table), &request.file_path);
    let batch = parse_csv_file(std::path::Path::new(&request.file_path), format)?;

    let inserted = validate_and_insert(&state, table, &batch.records).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: format!("CSV file loaded successfully into table {}", table),
            records_inserted: inserted,
            rows_skipped: batch.rows_skipped,
        }),
    ))
}

/// POST /batch/:table
///
/// Inserts a JSON array of record mappings. The body passes through to the
/// inserter as-is; field names are resolved against the table schema by the
/// storage layer.
pub async fn insert_batch(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
    Json(records): Json<Vec<Record>>,
) -> Result<(StatusCode, Json<BatchResponse>), ApiError> {
    let table = parse_table(&table_name)?;

    let inserted = validate_and_insert(&state, table, &records).await?;

    Ok((
        StatusCode::CREATED,
        Json(BatchResponse {
            message: format!("Batch inserted successfully into table {}", table),
            records_inserted: inserted,
        }),
    ))
}

/// POST /truncate/:table
///
/// Deletes all rows from the table and resets its auto-increment sequence.
pub async fn truncate_table(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
) -> Result<Json<TruncateResponse>, ApiError> {
    let table = parse_table(&table_name)?;

    let deleted = state.store.truncate(table).await?;
    info!("Truncate of {} removed {} row(s)", table, deleted);

    Ok(Json(TruncateResponse {
        message: format!("Table {} truncated successfully", table),
    }))
}

/// Resolve the request-path table segment, rejecting unknown tables
fn parse_table(name: &str) -> Result<TargetTable, ApiError> {
    name.parse::<TargetTable>()
        .map_err(|_| ApiError::InvalidTable(name.to_string()))
}

/// Shared tail of every insert path: batch-size validation, then one atomic
/// insert
async fn validate_and_insert(
    state: &AppState,
    table: TargetTable,
    records: &[Record],
) -> Result<u64, ApiError> {
    if !is_valid_batch(records) {
        return Err(ApiError::InvalidBatchSize(records.len()));
    }

    Ok(state.store.insert_batch(table, records).await?)
}
