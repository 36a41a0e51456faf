//! Insert-vs-update decisions for parsed rows.
//!
//! Nothing here touches storage: the orchestrator loads departments and
//! candidate employees up front, and every decision is staged into a
//! `UnitOfWork` that is committed (or dropped) as a whole.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::import::row_parser::{ParsedRow, RowIssue};
use crate::models::department::DepartmentRow;
use crate::models::employee::{EmployeeRecord, EmployeeRow};
use crate::store::{ChangeKind, StagedChange, UnitOfWork};

/// Case-insensitive department name lookup.
#[derive(Debug, Default)]
pub struct DepartmentIndex {
    by_name: HashMap<String, Uuid>,
}

impl DepartmentIndex {
    pub fn new(departments: &[DepartmentRow]) -> Self {
        let mut by_name = HashMap::new();
        for department in departments.iter().filter(|d| d.is_active) {
            by_name
                .entry(department.name.trim().to_lowercase())
                .or_insert(department.id);
        }
        Self { by_name }
    }

    pub fn resolve(&self, name: &str) -> Option<Uuid> {
        self.by_name.get(&name.trim().to_lowercase()).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Imported,
    /// Carries the employee's full name for the update notice.
    Updated(String),
}

/// A record a row could be matched against.
#[derive(Debug, Clone, Copy)]
struct Target<'a> {
    id: Uuid,
    document_number: &'a str,
}

pub struct Reconciler {
    departments: DepartmentIndex,
    existing: Vec<EmployeeRow>,
    staged: Vec<StagedChange>,
    now: DateTime<Utc>,
}

impl Reconciler {
    /// `existing` holds every stored employee, active or not, that shares a
    /// document number or email with the batch.
    pub fn new(departments: &[DepartmentRow], existing: Vec<EmployeeRow>, now: DateTime<Utc>) -> Self {
        Self {
            departments: DepartmentIndex::new(departments),
            existing,
            staged: Vec::new(),
            now,
        }
    }

    pub fn apply(&mut self, row: ParsedRow) -> Result<Outcome, RowIssue> {
        let department_id = self
            .departments
            .resolve(&row.department_name)
            .ok_or_else(|| RowIssue::UnknownDepartment(row.department_name.clone()))?;

        let mut record = row.into_record(department_id);
        record.validate().map_err(RowIssue::Invalid)?;

        let document = record.document_number.clone();
        let email = record.email.to_lowercase();

        // Within the batch only the document number identifies a person.
        let by_document = self
            .staged_target(|c| c.record.document_number == document)
            .or_else(|| self.stored_target(|e| e.document_number == document));

        if let Some(holder) = self
            .staged
            .iter()
            .find(|c| c.record.email.to_lowercase() == email)
        {
            if by_document.map(|t| t.id) != Some(holder.id) {
                return Err(RowIssue::EmailTakenInBatch {
                    email: record.email,
                    document: holder.record.document_number.clone(),
                });
            }
        }

        let by_email = self.stored_target(|e| e.email.to_lowercase() == email);

        if let (Some(d), Some(e)) = (by_document, by_email) {
            if d.id != e.id {
                return Err(RowIssue::ConflictingKeys {
                    document: record.document_number,
                    email: record.email,
                });
            }
        }

        let Some(target) = by_document.or(by_email) else {
            self.staged.push(StagedChange {
                id: Uuid::new_v4(),
                kind: ChangeKind::Insert,
                record,
            });
            return Ok(Outcome::Imported);
        };

        let (id, kept_document) = (target.id, target.document_number.to_string());
        record.document_number = kept_document;
        let full_name = record.full_name.clone();
        self.stage_update(id, record);
        Ok(Outcome::Updated(full_name))
    }

    pub fn into_unit_of_work(self) -> UnitOfWork {
        UnitOfWork {
            staged_at: self.now,
            changes: self.staged,
        }
    }

    fn staged_target(&self, matches: impl Fn(&StagedChange) -> bool) -> Option<Target<'_>> {
        self.staged.iter().find(|c| matches(c)).map(|c| Target {
            id: c.id,
            document_number: &c.record.document_number,
        })
    }

    /// Stored rows already staged are shadowed by their staged change.
    fn stored_target(&self, matches: impl Fn(&EmployeeRow) -> bool) -> Option<Target<'_>> {
        self.existing
            .iter()
            .filter(|e| !self.staged.iter().any(|c| c.id == e.id))
            .find(|e| matches(e))
            .map(|e| Target {
                id: e.id,
                document_number: &e.document_number,
            })
    }

    fn stage_update(&mut self, id: Uuid, record: EmployeeRecord) {
        match self.staged.iter_mut().find(|c| c.id == id) {
            Some(change) => change.record = record,
            None => self.staged.push(StagedChange {
                id,
                kind: ChangeKind::Update,
                record,
            }),
        }
    }
}
