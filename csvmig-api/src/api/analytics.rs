//! Analytical query endpoints

use axum::{extract::State, Json};

use crate::api::ApiError;
use crate::db::{DepartmentHires, QuarterlyHires};
use crate::AppState;

/// GET /sql/employees-by-quarter
///
/// Hires per quarter of 2021 for every (department, job) pair, sorted by
/// department name then job title.
pub async fn employees_by_quarter(
    State(state): State<AppState>,
) -> Result<Json<Vec<QuarterlyHires>>, ApiError> {
    Ok(Json(state.store.employees_by_quarter().await?))
}

/// GET /sql/departments-above-mean
///
/// Departments whose 2021 hire count exceeds the cross-department mean,
/// sorted by hire count descending.
pub async fn departments_above_mean(
    State(state): State<AppState>,
) -> Result<Json<Vec<DepartmentHires>>, ApiError> {
    Ok(Json(state.store.departments_above_mean().await?))
}
