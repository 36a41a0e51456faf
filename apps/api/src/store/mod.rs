//! Data-access seam used by the import pipeline and the chatbot.
//!
//! `AppState` holds an `Arc<dyn EmployeeStore>`; the production backend is
//! `PgEmployeeStore`, tests run against `memory::MemoryStore`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::department::DepartmentRow;
use crate::models::employee::{EmployeeRecord, EmployeeRow, RosterEntry};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgEmployeeStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Whether a staged change creates a record or rewrites an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StagedChange {
    pub id: Uuid,
    pub kind: ChangeKind,
    pub record: EmployeeRecord,
}

/// Every mutation produced by one import, applied together or not at all.
#[derive(Debug, Clone)]
pub struct UnitOfWork {
    pub staged_at: DateTime<Utc>,
    pub changes: Vec<StagedChange>,
}

impl UnitOfWork {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Departments that can receive employees.
    async fn active_departments(&self) -> Result<Vec<DepartmentRow>, StoreError>;

    /// Employees (soft-deleted included) whose document number is in
    /// `document_numbers` or whose lower-cased email is in `emails`.
    async fn find_existing(
        &self,
        document_numbers: &[String],
        emails: &[String],
    ) -> Result<Vec<EmployeeRow>, StoreError>;

    /// Applies the unit of work atomically.
    async fn commit(&self, unit: UnitOfWork) -> Result<(), StoreError>;

    /// One consistent snapshot of the active employees.
    async fn active_roster(&self) -> Result<Vec<RosterEntry>, StoreError>;
}
