//! Analytical queries over the migrated tables
//!
//! Both queries are read-only and recomputed per call. They join through the
//! soft foreign keys, so hires pointing at a missing department or job are
//! excluded by the inner join.

use csvmig_common::Result;
use serde::Serialize;

use super::Store;

/// Hires per calendar quarter for one (department, job) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct QuarterlyHires {
    pub department: String,
    pub job: String,
    #[serde(rename = "Q1")]
    pub q1: i64,
    #[serde(rename = "Q2")]
    pub q2: i64,
    #[serde(rename = "Q3")]
    pub q3: i64,
    #[serde(rename = "Q4")]
    pub q4: i64,
}

/// A department whose 2021 hire count exceeds the cross-department mean
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct DepartmentHires {
    pub id: i64,
    pub department: String,
    pub hired: i64,
}

impl Store {
    /// Hires per quarter of 2021 for every (department, job) pair with at
    /// least one hire that year, sorted by department name then job title.
    ///
    /// Quarters are bucketed on the hire timestamp's month; quarters with no
    /// hires report 0 rather than being absent.
    pub async fn employees_by_quarter(&self) -> Result<Vec<QuarterlyHires>> {
        let rows = sqlx::query_as::<_, QuarterlyHires>(
            r#"
            SELECT
                d.name AS department,
                j.title AS job,
                SUM(CASE WHEN strftime('%m', he.hired_at) BETWEEN '01' AND '03' THEN 1 ELSE 0 END) AS q1,
                SUM(CASE WHEN strftime('%m', he.hired_at) BETWEEN '04' AND '06' THEN 1 ELSE 0 END) AS q2,
                SUM(CASE WHEN strftime('%m', he.hired_at) BETWEEN '07' AND '09' THEN 1 ELSE 0 END) AS q3,
                SUM(CASE WHEN strftime('%m', he.hired_at) BETWEEN '10' AND '12' THEN 1 ELSE 0 END) AS q4
            FROM hired_employees he
            JOIN departments d ON he.department_id = d.id
            JOIN jobs j ON he.job_id = j.id
            WHERE strftime('%Y', he.hired_at) = '2021'
            GROUP BY d.name, j.title
            ORDER BY d.name, j.title
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }

    /// Departments whose 2021 hire count strictly exceeds the mean count
    /// across all departments with at least one 2021 hire, sorted by hire
    /// count descending.
    pub async fn departments_above_mean(&self) -> Result<Vec<DepartmentHires>> {
        let rows = sqlx::query_as::<_, DepartmentHires>(
            r#"
            WITH department_hires AS (
                SELECT
                    d.id,
                    d.name AS department,
                    COUNT(*) AS hired
                FROM hired_employees he
                JOIN departments d ON he.department_id = d.id
                WHERE strftime('%Y', he.hired_at) = '2021'
                GROUP BY d.id, d.name
            )
            SELECT dh.id, dh.department, dh.hired
            FROM department_hires dh
            WHERE dh.hired > (SELECT AVG(hired) FROM department_hires)
            ORDER BY dh.hired DESC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows)
    }
}
