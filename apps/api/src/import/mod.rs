//! Employee spreadsheet import and export.
//!
//! An upload flows through `workbook` (decode and pick the sheet), `headers`
//! (map header spellings to columns), `row_parser` (coerce each row) and
//! `reconcile` (decide insert or update), driven by `orchestrator`, which
//! commits everything or nothing.

pub mod export;
pub mod handlers;
pub mod headers;
pub mod orchestrator;
pub mod reconcile;
pub mod row_parser;
pub mod workbook;

use thiserror::Error;

use crate::store::StoreError;

pub use orchestrator::{import_employees, ImportResult};

/// Failures that abort an import as a whole.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{0}")]
    Workbook(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Workbook decoding task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
