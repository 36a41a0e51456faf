use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgExecutor, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::department::DepartmentRow;
use crate::models::employee::{EmployeeRecord, EmployeeRow, EmployeeStatus, RosterEntry};
use crate::store::{ChangeKind, EmployeeStore, StoreError, UnitOfWork};

#[derive(Clone)]
pub struct PgEmployeeStore {
    pool: PgPool,
}

impl PgEmployeeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct RosterRow {
    id: Uuid,
    full_name: String,
    position: String,
    department_name: String,
    status: String,
    salary: Decimal,
    hire_date: NaiveDate,
}

impl From<RosterRow> for RosterEntry {
    fn from(row: RosterRow) -> Self {
        RosterEntry {
            id: row.id,
            full_name: row.full_name,
            position: row.position,
            department_name: row.department_name,
            status: EmployeeStatus::from_db(&row.status),
            salary: row.salary,
            hire_date: row.hire_date,
        }
    }
}

#[async_trait]
impl EmployeeStore for PgEmployeeStore {
    async fn active_departments(&self) -> Result<Vec<DepartmentRow>, StoreError> {
        Ok(sqlx::query_as::<_, DepartmentRow>(
            "SELECT * FROM departments WHERE is_active ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_existing(
        &self,
        document_numbers: &[String],
        emails: &[String],
    ) -> Result<Vec<EmployeeRow>, StoreError> {
        if document_numbers.is_empty() && emails.is_empty() {
            return Ok(Vec::new());
        }

        Ok(sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT * FROM employees
            WHERE document_number = ANY($1) OR LOWER(email) = ANY($2)
            ORDER BY created_at
            "#,
        )
        .bind(document_numbers)
        .bind(emails)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn commit(&self, unit: UnitOfWork) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for change in &unit.changes {
            match change.kind {
                ChangeKind::Insert => {
                    insert_employee(&mut *tx, change.id, &change.record, unit.staged_at).await?
                }
                ChangeKind::Update => {
                    update_employee(&mut *tx, change.id, &change.record, unit.staged_at).await?
                }
            }
        }

        tx.commit().await?;
        info!("Committed {} staged employee changes", unit.changes.len());
        Ok(())
    }

    async fn active_roster(&self) -> Result<Vec<RosterEntry>, StoreError> {
        let rows = sqlx::query_as::<_, RosterRow>(
            r#"
            SELECT e.id, e.full_name, e.position, d.name AS department_name,
                   e.status, e.salary, e.hire_date
            FROM employees e
            JOIN departments d ON d.id = e.department_id
            WHERE e.is_active
            ORDER BY e.created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RosterEntry::from).collect())
    }
}

/// Inserts a new, active employee.
pub async fn insert_employee<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    record: &EmployeeRecord,
    created_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO employees
            (id, document_number, document_type, full_name, email, phone, address,
             birth_date, gender, position, salary, hire_date, status, education_level,
             professional_profile, department_id, is_active, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, TRUE, $17)
        "#,
    )
    .bind(id)
    .bind(&record.document_number)
    .bind(&record.document_type)
    .bind(&record.full_name)
    .bind(&record.email)
    .bind(&record.phone)
    .bind(&record.address)
    .bind(record.birth_date)
    .bind(&record.gender)
    .bind(&record.position)
    .bind(record.salary)
    .bind(record.hire_date)
    .bind(record.status.as_str())
    .bind(record.education_level.as_str())
    .bind(&record.professional_profile)
    .bind(record.department_id)
    .bind(created_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Overwrites every writable field and reactivates the record.
pub async fn update_employee<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    record: &EmployeeRecord,
    updated_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE employees SET
            document_number = $2, document_type = $3, full_name = $4, email = $5,
            phone = $6, address = $7, birth_date = $8, gender = $9, position = $10,
            salary = $11, hire_date = $12, status = $13, education_level = $14,
            professional_profile = $15, department_id = $16,
            is_active = TRUE, updated_at = $17
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&record.document_number)
    .bind(&record.document_type)
    .bind(&record.full_name)
    .bind(&record.email)
    .bind(&record.phone)
    .bind(&record.address)
    .bind(record.birth_date)
    .bind(&record.gender)
    .bind(&record.position)
    .bind(record.salary)
    .bind(record.hire_date)
    .bind(record.status.as_str())
    .bind(record.education_level.as_str())
    .bind(&record.professional_profile)
    .bind(record.department_id)
    .bind(updated_at)
    .execute(executor)
    .await?;
    Ok(())
}
