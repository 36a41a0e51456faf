use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::department::DepartmentRow;
use crate::state::AppState;

const NAME_LIMIT: usize = 100;
const DESCRIPTION_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
pub struct DepartmentRequest {
    pub name: String,
    pub description: Option<String>,
}

impl DepartmentRequest {
    /// Trimmed name and description, with the column limits enforced.
    fn normalized(self) -> Result<(String, Option<String>), AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        if name.chars().count() > NAME_LIMIT {
            return Err(AppError::Validation(format!(
                "name exceeds {NAME_LIMIT} characters"
            )));
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if description
            .as_ref()
            .is_some_and(|d| d.chars().count() > DESCRIPTION_LIMIT)
        {
            return Err(AppError::Validation(format!(
                "description exceeds {DESCRIPTION_LIMIT} characters"
            )));
        }
        Ok((name, description))
    }
}

/// GET /api/v1/departments
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<DepartmentRow>>, AppError> {
    let departments = sqlx::query_as::<_, DepartmentRow>(
        "SELECT * FROM departments WHERE is_active ORDER BY name",
    )
    .fetch_all(&state.db)
    .await?;
    Ok(Json(departments))
}

/// POST /api/v1/departments
pub async fn handle_create(
    State(state): State<AppState>,
    Json(req): Json<DepartmentRequest>,
) -> Result<(StatusCode, Json<DepartmentRow>), AppError> {
    let (name, description) = req.normalized()?;

    let department = sqlx::query_as::<_, DepartmentRow>(
        r#"
        INSERT INTO departments (id, name, description, is_active, created_at)
        VALUES ($1, $2, $3, TRUE, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&name)
    .bind(&description)
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Created department {} ({})", department.id, department.name);
    Ok((StatusCode::CREATED, Json(department)))
}

/// PUT /api/v1/departments/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<DepartmentRequest>,
) -> Result<Json<DepartmentRow>, AppError> {
    let (name, description) = req.normalized()?;

    let department = sqlx::query_as::<_, DepartmentRow>(
        r#"
        UPDATE departments SET name = $2, description = $3, updated_at = NOW()
        WHERE id = $1 AND is_active
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&name)
    .bind(&description)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Department {id} not found")))?;

    Ok(Json(department))
}

/// DELETE /api/v1/departments/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut tx = state.db.begin().await?;

    let (employees,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM employees WHERE department_id = $1 AND is_active",
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    if employees > 0 {
        return Err(AppError::Conflict(format!(
            "Department {id} still has {employees} active employees"
        )));
    }

    let result = sqlx::query(
        "UPDATE departments SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active",
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Department {id} not found")));
    }

    tx.commit().await?;
    tracing::info!("Soft-deleted department {id}");
    Ok(StatusCode::NO_CONTENT)
}
