use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Employment status. Stored as its snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    Inactive,
    OnVacation,
    OnLeave,
}

impl EmployeeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
            EmployeeStatus::OnVacation => "on_vacation",
            EmployeeStatus::OnLeave => "on_leave",
        }
    }

    /// Spanish vocabulary token, written by the spreadsheet exporter.
    pub fn spanish_token(self) -> &'static str {
        match self {
            EmployeeStatus::Active => "activo",
            EmployeeStatus::Inactive => "inactivo",
            EmployeeStatus::OnVacation => "vacaciones",
            EmployeeStatus::OnLeave => "licencia",
        }
    }

    /// Maps a free-text token (English or Spanish) through the status vocabulary.
    pub fn from_vocabulary(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "activo" | "active" => Some(EmployeeStatus::Active),
            "inactivo" | "inactive" => Some(EmployeeStatus::Inactive),
            "vacaciones" | "vacation" | "vacations" => Some(EmployeeStatus::OnVacation),
            "licencia" | "leave" => Some(EmployeeStatus::OnLeave),
            _ => None,
        }
    }

    /// Import rule: anything outside the vocabulary silently becomes `Active`.
    pub fn from_import(token: Option<&str>) -> Self {
        token
            .and_then(Self::from_vocabulary)
            .unwrap_or(EmployeeStatus::Active)
    }

    pub fn from_db(value: &str) -> Self {
        match value {
            "inactive" => EmployeeStatus::Inactive,
            "on_vacation" => EmployeeStatus::OnVacation,
            "on_leave" => EmployeeStatus::OnLeave,
            _ => EmployeeStatus::Active,
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EmployeeStatus::Active => "Active",
            EmployeeStatus::Inactive => "Inactive",
            EmployeeStatus::OnVacation => "On vacation",
            EmployeeStatus::OnLeave => "On leave",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    Technical,
    Technologist,
    Undergraduate,
    Postgraduate,
    Master,
    Doctorate,
}

impl EducationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "high_school",
            EducationLevel::Technical => "technical",
            EducationLevel::Technologist => "technologist",
            EducationLevel::Undergraduate => "undergraduate",
            EducationLevel::Postgraduate => "postgraduate",
            EducationLevel::Master => "master",
            EducationLevel::Doctorate => "doctorate",
        }
    }

    pub fn spanish_token(self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "bachillerato",
            EducationLevel::Technical => "tecnico",
            EducationLevel::Technologist => "tecnologo",
            EducationLevel::Undergraduate => "universitario",
            EducationLevel::Postgraduate => "posgrado",
            EducationLevel::Master => "maestria",
            EducationLevel::Doctorate => "doctorado",
        }
    }

    pub fn from_vocabulary(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "bachillerato" | "highschool" | "secundaria" => Some(EducationLevel::HighSchool),
            "tecnico" | "technical" => Some(EducationLevel::Technical),
            "tecnologo" | "technologist" => Some(EducationLevel::Technologist),
            "universitario" | "university" | "undergraduate" => {
                Some(EducationLevel::Undergraduate)
            }
            "posgrado" | "postgraduate" => Some(EducationLevel::Postgraduate),
            "maestria" | "master" | "masters" => Some(EducationLevel::Master),
            "doctorado" | "doctorate" | "phd" => Some(EducationLevel::Doctorate),
            _ => None,
        }
    }

    /// Import rule: anything outside the vocabulary silently becomes `HighSchool`.
    pub fn from_import(token: Option<&str>) -> Self {
        token
            .and_then(Self::from_vocabulary)
            .unwrap_or(EducationLevel::HighSchool)
    }

    pub fn from_db(value: &str) -> Self {
        match value {
            "technical" => EducationLevel::Technical,
            "technologist" => EducationLevel::Technologist,
            "undergraduate" => EducationLevel::Undergraduate,
            "postgraduate" => EducationLevel::Postgraduate,
            "master" => EducationLevel::Master,
            "doctorate" => EducationLevel::Doctorate,
            _ => EducationLevel::HighSchool,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeeRow {
    pub id: Uuid,
    pub document_number: String,
    pub document_type: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub position: String,
    pub salary: Decimal,
    pub hire_date: NaiveDate,
    pub status: String,
    pub education_level: String,
    pub professional_profile: Option<String>,
    pub department_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl EmployeeRow {
    pub fn status(&self) -> EmployeeStatus {
        EmployeeStatus::from_db(&self.status)
    }

    pub fn education_level(&self) -> EducationLevel {
        EducationLevel::from_db(&self.education_level)
    }

    /// The writable fields of this row, as a record that can be edited and written back.
    pub fn to_record(&self) -> EmployeeRecord {
        EmployeeRecord {
            document_number: self.document_number.clone(),
            document_type: self.document_type.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            birth_date: self.birth_date,
            gender: self.gender.clone(),
            position: self.position.clone(),
            salary: self.salary,
            hire_date: self.hire_date,
            status: self.status(),
            education_level: self.education_level(),
            professional_profile: self.professional_profile.clone(),
            department_id: self.department_id,
        }
    }
}

/// Every field an import row or an admin edit may write.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRecord {
    pub document_number: String,
    pub document_type: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub position: String,
    pub salary: Decimal,
    pub hire_date: NaiveDate,
    pub status: EmployeeStatus,
    pub education_level: EducationLevel,
    pub professional_profile: Option<String>,
    pub department_id: Uuid,
}

const FIELD_LIMITS: &[(&str, usize)] = &[
    ("document number", 20),
    ("document type", 10),
    ("full name", 200),
    ("email", 100),
    ("phone", 20),
    ("address", 300),
    ("gender", 20),
    ("position", 100),
    ("professional profile", 1000),
];

impl EmployeeRecord {
    /// Checks the column limits and the non-negative salary rule.
    pub fn validate(&self) -> Result<(), String> {
        let values = [
            Some(self.document_number.as_str()),
            Some(self.document_type.as_str()),
            Some(self.full_name.as_str()),
            Some(self.email.as_str()),
            self.phone.as_deref(),
            self.address.as_deref(),
            self.gender.as_deref(),
            Some(self.position.as_str()),
            self.professional_profile.as_deref(),
        ];

        for ((field, limit), value) in FIELD_LIMITS.iter().zip(values) {
            if let Some(value) = value {
                if value.chars().count() > *limit {
                    return Err(format!("{field} exceeds {limit} characters"));
                }
            }
        }

        if self.salary.is_sign_negative() && !self.salary.is_zero() {
            return Err("salary cannot be negative".to_string());
        }

        Ok(())
    }
}

/// One active employee as seen by the aggregate queries and the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct RosterEntry {
    pub id: Uuid,
    pub full_name: String,
    pub position: String,
    pub department_name: String,
    pub status: EmployeeStatus,
    pub salary: Decimal,
    pub hire_date: NaiveDate,
}
