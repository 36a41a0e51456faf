//! Drives a whole spreadsheet through parsing and reconciliation and decides
//! whether the staged changes are committed.

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::import::headers::HeaderMap;
use crate::import::reconcile::{Outcome, Reconciler};
use crate::import::row_parser::{parse_row, ParsedRow};
use crate::import::workbook::{read_workbook, select_employee_sheet};
use crate::import::ImportError;
use crate::store::EmployeeStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportResult {
    pub success: bool,
    pub imported: usize,
    pub updated: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ImportResult {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
            ..Self::default()
        }
    }
}

/// Imports an employee workbook. Never fails: every problem ends up in
/// `ImportResult::errors`.
pub async fn import_employees(
    store: &dyn EmployeeStore,
    bytes: &[u8],
    file_name: &str,
) -> ImportResult {
    let result = match run_import(store, bytes).await {
        Ok(result) => result,
        Err(err) => {
            error!("Import of {file_name} failed: {err}");
            ImportResult::failed(format!("General error: {err}"))
        }
    };

    info!(
        "Import of {file_name}: success={}, imported={}, updated={}, errors={}, warnings={}",
        result.success,
        result.imported,
        result.updated,
        result.errors.len(),
        result.warnings.len()
    );
    result
}

async fn run_import(store: &dyn EmployeeStore, bytes: &[u8]) -> Result<ImportResult, ImportError> {
    // Unzipping and parsing XLSX is CPU-bound; keep it off the async workers.
    let owned = bytes.to_vec();
    let sheets = tokio::task::spawn_blocking(move || read_workbook(&owned)).await??;
    let Some(sheet) = select_employee_sheet(sheets) else {
        return Ok(ImportResult::failed("No worksheet found in the Excel file."));
    };

    if sheet.rows.len() < 2 {
        return Ok(ImportResult::failed("The Excel file is empty or has no data."));
    }

    let headers = HeaderMap::from_row(&sheet.rows[0]);
    if let Some(group) = headers.missing_group() {
        return Ok(ImportResult::failed(format!(
            "Missing required column. Expected one of: {}",
            group.join(", ")
        )));
    }

    let departments = store.active_departments().await?;
    let now = Utc::now();
    let today = now.date_naive();

    // Parse and reconcile run as two passes; notes carry their sheet row so
    // messages can be reported top to bottom.
    let mut errors: Vec<(usize, String)> = Vec::new();
    let mut warnings: Vec<(usize, String)> = Vec::new();
    let mut parsed: Vec<(usize, ParsedRow)> = Vec::new();
    for (index, cells) in sheet.rows.iter().enumerate().skip(1) {
        let row_number = index + 1;
        match parse_row(&headers, cells, today) {
            Ok(row) => parsed.push((row_number, row)),
            Err(issue) if issue.is_warning() => warnings.push((row_number, issue.to_string())),
            Err(issue) => errors.push((row_number, issue.to_string())),
        }
    }

    let documents: Vec<String> = parsed
        .iter()
        .map(|(_, row)| row.document_number.clone())
        .collect();
    let emails: Vec<String> = parsed
        .iter()
        .map(|(_, row)| row.email.to_lowercase())
        .collect();
    let existing = store.find_existing(&documents, &emails).await?;

    let mut result = ImportResult::default();
    let mut reconciler = Reconciler::new(&departments, existing, now);
    for (row_number, row) in parsed {
        match reconciler.apply(row) {
            Ok(Outcome::Imported) => result.imported += 1,
            Ok(Outcome::Updated(name)) => {
                result.updated += 1;
                warnings.push((row_number, format!("Employee '{name}' updated.")));
            }
            Err(issue) => errors.push((row_number, issue.to_string())),
        }
    }
    result.errors = in_sheet_order(errors);
    result.warnings = in_sheet_order(warnings);

    if !result.errors.is_empty() {
        warn!(
            "Skipping commit: {} row errors in the import",
            result.errors.len()
        );
        return Ok(result);
    }

    let unit = reconciler.into_unit_of_work();
    if !unit.is_empty() {
        store.commit(unit).await?;
    }
    result.success = true;
    Ok(result)
}

fn in_sheet_order(mut notes: Vec<(usize, String)>) -> Vec<String> {
    notes.sort_by_key(|(row, _)| *row);
    notes
        .into_iter()
        .map(|(row, message)| format!("Row {row}: {message}"))
        .collect()
}
