use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::import::export::{build_export, load_export_rows, ExportRow};
use crate::import::{import_employees, ImportResult};
use crate::state::AppState;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// POST /api/v1/employees/import
/// Multipart upload; the workbook is expected in the `file` field.
pub async fn handle_import(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImportResult>), AppError> {
    let limit = state.config.max_upload_bytes;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("upload.xlsx").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| multipart_error(e, limit))?;
            upload = Some((file_name, bytes.to_vec()));
            break;
        }
    }

    let (file_name, bytes) = upload.ok_or_else(|| {
        AppError::Validation("No 'file' field found. Field name must be 'file'".to_string())
    })?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Empty file provided".to_string()));
    }

    info!("Importing {file_name} ({} bytes)", bytes.len());
    let result = import_employees(state.store.as_ref(), &bytes, &file_name).await;
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    Ok((status, Json(result)))
}

/// Builds the workbook on the blocking pool.
async fn render_export(rows: Vec<ExportRow>) -> Result<Vec<u8>, AppError> {
    let bytes = tokio::task::spawn_blocking(move || build_export(&rows))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in export: {e}")))??;
    Ok(bytes)
}

fn multipart_error(err: MultipartError, limit: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("File is too large. The upload limit is {limit} bytes"))
    } else {
        AppError::Validation(format!("Invalid multipart request: {err}"))
    }
}

/// GET /api/v1/employees/export
pub async fn handle_export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = load_export_rows(&state.db).await?;
    let bytes = render_export(rows).await?;
    let disposition = format!(
        "attachment; filename=\"empleados_{}.xlsx\"",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    );

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
