use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::employees::repository::{self, EmployeeFilter};
use crate::errors::AppError;
use crate::models::employee::{EducationLevel, EmployeeRecord, EmployeeRow, EmployeeStatus};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub document_number: String,
    pub document_type: Option<String>,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub position: String,
    pub salary: Option<Decimal>,
    pub hire_date: Option<NaiveDate>,
    pub status: Option<EmployeeStatus>,
    pub education_level: Option<EducationLevel>,
    pub professional_profile: Option<String>,
    pub department_id: Uuid,
}

/// Partial update: absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub document_number: Option<String>,
    pub document_type: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub position: Option<String>,
    pub salary: Option<Decimal>,
    pub hire_date: Option<NaiveDate>,
    pub status: Option<EmployeeStatus>,
    pub education_level: Option<EducationLevel>,
    pub professional_profile: Option<String>,
    pub department_id: Option<Uuid>,
}

fn required(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn checked(record: EmployeeRecord) -> Result<EmployeeRecord, AppError> {
    record.validate().map_err(AppError::Validation)?;
    Ok(record)
}

/// Builds the record for a new employee, applying the creation defaults.
pub fn new_record(req: CreateEmployeeRequest, today: NaiveDate) -> Result<EmployeeRecord, AppError> {
    checked(EmployeeRecord {
        document_number: required("document_number", &req.document_number)?,
        document_type: optional(req.document_type).unwrap_or_else(|| "CC".to_string()),
        full_name: required("full_name", &req.full_name)?,
        email: required("email", &req.email)?,
        phone: optional(req.phone),
        address: optional(req.address),
        birth_date: req.birth_date,
        gender: optional(req.gender),
        position: required("position", &req.position)?,
        salary: req.salary.unwrap_or(Decimal::ZERO),
        hire_date: req.hire_date.unwrap_or(today),
        status: req.status.unwrap_or(EmployeeStatus::Active),
        education_level: req.education_level.unwrap_or(EducationLevel::HighSchool),
        professional_profile: optional(req.professional_profile),
        department_id: req.department_id,
    })
}

/// Overlays the fields present in `req` on the stored record.
pub fn merge_update(
    mut record: EmployeeRecord,
    req: UpdateEmployeeRequest,
) -> Result<EmployeeRecord, AppError> {
    if let Some(v) = req.document_number {
        record.document_number = required("document_number", &v)?;
    }
    if let Some(v) = req.document_type {
        record.document_type = required("document_type", &v)?;
    }
    if let Some(v) = req.full_name {
        record.full_name = required("full_name", &v)?;
    }
    if let Some(v) = req.email {
        record.email = required("email", &v)?;
    }
    if let Some(v) = req.position {
        record.position = required("position", &v)?;
    }
    if req.phone.is_some() {
        record.phone = optional(req.phone);
    }
    if req.address.is_some() {
        record.address = optional(req.address);
    }
    if req.gender.is_some() {
        record.gender = optional(req.gender);
    }
    if req.professional_profile.is_some() {
        record.professional_profile = optional(req.professional_profile);
    }
    record.birth_date = req.birth_date.or(record.birth_date);
    record.salary = req.salary.unwrap_or(record.salary);
    record.hire_date = req.hire_date.unwrap_or(record.hire_date);
    record.status = req.status.unwrap_or(record.status);
    record.education_level = req.education_level.unwrap_or(record.education_level);
    record.department_id = req.department_id.unwrap_or(record.department_id);
    checked(record)
}

async fn ensure_department(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    if !repository::department_is_active(pool, id).await? {
        return Err(AppError::Validation(format!("Department {id} not found")));
    }
    Ok(())
}

async fn ensure_unique_keys(
    pool: &PgPool,
    record: &EmployeeRecord,
    exclude: Option<Uuid>,
) -> Result<(), AppError> {
    if let Some(holder) =
        repository::find_key_holder(pool, &record.document_number, &record.email, exclude).await?
    {
        let key = if holder.document_number == record.document_number {
            format!("document number '{}'", record.document_number)
        } else {
            format!("email '{}'", record.email)
        };
        return Err(AppError::Conflict(format!(
            "Another employee already uses {key}"
        )));
    }
    Ok(())
}

/// GET /api/v1/employees
pub async fn handle_list(
    State(state): State<AppState>,
    Query(filter): Query<EmployeeFilter>,
) -> Result<Json<Vec<EmployeeRow>>, AppError> {
    Ok(Json(repository::list_active(&state.db, &filter).await?))
}

/// GET /api/v1/employees/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmployeeRow>, AppError> {
    let employee = repository::get_active(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {id} not found")))?;
    Ok(Json(employee))
}

/// POST /api/v1/employees
pub async fn handle_create(
    State(state): State<AppState>,
    Json(req): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<EmployeeRow>), AppError> {
    let record = new_record(req, Utc::now().date_naive())?;
    ensure_department(&state.db, record.department_id).await?;
    ensure_unique_keys(&state.db, &record, None).await?;

    let employee = repository::create(&state.db, &record).await?;
    tracing::info!("Created employee {} ({})", employee.id, employee.document_number);
    Ok((StatusCode::CREATED, Json(employee)))
}

/// PUT /api/v1/employees/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEmployeeRequest>,
) -> Result<Json<EmployeeRow>, AppError> {
    let existing = repository::get_active(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {id} not found")))?;

    let department_changed = req
        .department_id
        .is_some_and(|d| d != existing.department_id);
    let record = merge_update(existing.to_record(), req)?;
    if department_changed {
        ensure_department(&state.db, record.department_id).await?;
    }
    ensure_unique_keys(&state.db, &record, Some(id)).await?;

    let employee = repository::update(&state.db, id, &record, Utc::now()).await?;
    Ok(Json(employee))
}

/// DELETE /api/v1/employees/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !repository::soft_delete(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Employee {id} not found")));
    }
    tracing::info!("Soft-deleted employee {id}");
    Ok(StatusCode::NO_CONTENT)
}
