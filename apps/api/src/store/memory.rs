//! In-memory `EmployeeStore` used by tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::department::DepartmentRow;
use crate::models::employee::{EmployeeRecord, EmployeeRow, EmployeeStatus, RosterEntry};
use crate::store::{ChangeKind, EmployeeStore, StoreError, UnitOfWork};

#[derive(Default)]
pub struct MemoryStore {
    departments: Mutex<Vec<DepartmentRow>>,
    employees: Mutex<Vec<EmployeeRow>>,
    fail_commit: AtomicBool,
    commits: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_department(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.departments.lock().unwrap().push(DepartmentRow {
            id,
            name: name.to_string(),
            description: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        });
        id
    }

    pub fn add_employee(&self, row: EmployeeRow) {
        self.employees.lock().unwrap().push(row);
    }

    pub fn employees(&self) -> Vec<EmployeeRow> {
        self.employees.lock().unwrap().clone()
    }

    pub fn employee_by_document(&self, document_number: &str) -> Option<EmployeeRow> {
        self.employees()
            .into_iter()
            .find(|e| e.document_number == document_number)
    }

    pub fn fail_commits(&self) {
        self.fail_commit.store(true, Ordering::SeqCst);
    }

    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

/// Builds an active employee row with sensible defaults.
pub fn employee_row(
    document_number: &str,
    full_name: &str,
    position: &str,
    department_id: Uuid,
) -> EmployeeRow {
    EmployeeRow {
        id: Uuid::new_v4(),
        document_number: document_number.to_string(),
        document_type: "CC".to_string(),
        full_name: full_name.to_string(),
        email: format!("{}@example.com", document_number.to_lowercase()),
        phone: None,
        address: None,
        birth_date: None,
        gender: None,
        position: position.to_string(),
        salary: Decimal::new(2_000_000, 0),
        hire_date: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
        status: EmployeeStatus::Active.as_str().to_string(),
        education_level: "high_school".to_string(),
        professional_profile: None,
        department_id,
        is_active: true,
        created_at: Utc::now(),
        updated_at: None,
    }
}

fn apply_record(row: &mut EmployeeRow, record: &EmployeeRecord) {
    row.document_number = record.document_number.clone();
    row.document_type = record.document_type.clone();
    row.full_name = record.full_name.clone();
    row.email = record.email.clone();
    row.phone = record.phone.clone();
    row.address = record.address.clone();
    row.birth_date = record.birth_date;
    row.gender = record.gender.clone();
    row.position = record.position.clone();
    row.salary = record.salary;
    row.hire_date = record.hire_date;
    row.status = record.status.as_str().to_string();
    row.education_level = record.education_level.as_str().to_string();
    row.professional_profile = record.professional_profile.clone();
    row.department_id = record.department_id;
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn active_departments(&self) -> Result<Vec<DepartmentRow>, StoreError> {
        Ok(self
            .departments
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.is_active)
            .cloned()
            .collect())
    }

    async fn find_existing(
        &self,
        document_numbers: &[String],
        emails: &[String],
    ) -> Result<Vec<EmployeeRow>, StoreError> {
        Ok(self
            .employees
            .lock()
            .unwrap()
            .iter()
            .filter(|e| {
                document_numbers.contains(&e.document_number)
                    || emails.contains(&e.email.to_lowercase())
            })
            .cloned()
            .collect())
    }

    async fn commit(&self, unit: UnitOfWork) -> Result<(), StoreError> {
        if self.fail_commit.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut employees = self.employees.lock().unwrap();
        for change in unit.changes {
            match change.kind {
                ChangeKind::Insert => {
                    let mut row = employee_row(
                        &change.record.document_number,
                        &change.record.full_name,
                        &change.record.position,
                        change.record.department_id,
                    );
                    row.id = change.id;
                    row.created_at = unit.staged_at;
                    apply_record(&mut row, &change.record);
                    employees.push(row);
                }
                ChangeKind::Update => {
                    if let Some(row) = employees.iter_mut().find(|e| e.id == change.id) {
                        apply_record(row, &change.record);
                        row.is_active = true;
                        row.updated_at = Some(unit.staged_at);
                    }
                }
            }
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn active_roster(&self) -> Result<Vec<RosterEntry>, StoreError> {
        let departments = self.departments.lock().unwrap().clone();
        Ok(self
            .employees
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.is_active)
            .map(|e| RosterEntry {
                id: e.id,
                full_name: e.full_name.clone(),
                position: e.position.clone(),
                department_name: departments
                    .iter()
                    .find(|d| d.id == e.department_id)
                    .map(|d| d.name.clone())
                    .unwrap_or_default(),
                status: e.status(),
                salary: e.salary,
                hire_date: e.hire_date,
            })
            .collect())
    }
}
