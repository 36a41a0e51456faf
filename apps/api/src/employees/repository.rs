//! Queries behind the employee CRUD endpoints. Writes reuse the same insert and
//! update statements as the import commit.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::employee::{EmployeeRecord, EmployeeRow, EmployeeStatus};
use crate::store::postgres::{insert_employee, update_employee};

#[derive(Debug, Default, Deserialize)]
pub struct EmployeeFilter {
    /// Case-insensitive substring over name, document number, email and position.
    pub q: Option<String>,
    pub department_id: Option<Uuid>,
    pub status: Option<EmployeeStatus>,
}

impl EmployeeFilter {
    fn search_pattern(&self) -> Option<String> {
        let q = self.q.as_deref()?.trim();
        if q.is_empty() {
            return None;
        }
        let escaped = q
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        Some(format!("%{escaped}%"))
    }
}

pub async fn list_active(
    pool: &PgPool,
    filter: &EmployeeFilter,
) -> Result<Vec<EmployeeRow>, sqlx::Error> {
    sqlx::query_as::<_, EmployeeRow>(
        r#"
        SELECT * FROM employees
        WHERE is_active
          AND ($1::text IS NULL
               OR full_name ILIKE $1 OR document_number ILIKE $1
               OR email ILIKE $1 OR position ILIKE $1)
          AND ($2::uuid IS NULL OR department_id = $2)
          AND ($3::text IS NULL OR status = $3)
        ORDER BY created_at DESC
        "#,
    )
    .bind(filter.search_pattern())
    .bind(filter.department_id)
    .bind(filter.status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await
}

pub async fn get_active(pool: &PgPool, id: Uuid) -> Result<Option<EmployeeRow>, sqlx::Error> {
    sqlx::query_as::<_, EmployeeRow>("SELECT * FROM employees WHERE id = $1 AND is_active")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Another employee, active or not, already holding the document number or
/// the email (case-insensitive).
pub async fn find_key_holder(
    pool: &PgPool,
    document_number: &str,
    email: &str,
    exclude: Option<Uuid>,
) -> Result<Option<EmployeeRow>, sqlx::Error> {
    sqlx::query_as::<_, EmployeeRow>(
        r#"
        SELECT * FROM employees
        WHERE (document_number = $1 OR LOWER(email) = LOWER($2))
          AND ($3::uuid IS NULL OR id <> $3)
        LIMIT 1
        "#,
    )
    .bind(document_number)
    .bind(email)
    .bind(exclude)
    .fetch_optional(pool)
    .await
}

pub async fn department_is_active(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let found: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM departments WHERE id = $1 AND is_active")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(found.is_some())
}

pub async fn create(pool: &PgPool, record: &EmployeeRecord) -> Result<EmployeeRow, sqlx::Error> {
    let id = Uuid::new_v4();
    insert_employee(pool, id, record, Utc::now()).await?;
    fetch(pool, id).await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    record: &EmployeeRecord,
    now: DateTime<Utc>,
) -> Result<EmployeeRow, sqlx::Error> {
    update_employee(pool, id, record, now).await?;
    fetch(pool, id).await
}

/// Returns false when no active employee has this id.
pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE employees SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

async fn fetch(pool: &PgPool, id: Uuid) -> Result<EmployeeRow, sqlx::Error> {
    sqlx::query_as::<_, EmployeeRow>("SELECT * FROM employees WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
}
