//! Per-row extraction and coercion for employee spreadsheets.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::import::headers::{Field, HeaderMap};
use crate::models::employee::{EducationLevel, EmployeeRecord, EmployeeStatus};

/// Domain used for synthesised addresses when a row has no usable email.
pub const PLACEHOLDER_EMAIL_DOMAIN: &str = "talentoplusadmin.com";

pub const DEFAULT_DOCUMENT_TYPE: &str = "CC";

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%d/%m/%y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M:%S"];

/// Why a row did not produce an employee. Only `MissingDocument` is a warning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowIssue {
    #[error("Empty document number, skipping.")]
    MissingDocument,

    #[error("Full name required for document '{0}'.")]
    MissingName(String),

    #[error("Position required for employee '{0}'.")]
    MissingPosition(String),

    #[error("Department required for employee '{0}'.")]
    MissingDepartment(String),

    #[error("Department '{0}' not found.")]
    UnknownDepartment(String),

    #[error("Error processing employee - document '{document}' and email '{email}' belong to different employees")]
    ConflictingKeys { document: String, email: String },

    #[error("Error processing employee - email '{email}' is already used by document '{document}' in this file")]
    EmailTakenInBatch { email: String, document: String },

    #[error("Error processing employee - {0}")]
    Invalid(String),
}

impl RowIssue {
    pub fn is_warning(&self) -> bool {
        matches!(self, RowIssue::MissingDocument)
    }
}

/// A data row after extraction and coercion, before department resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
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
    pub department_name: String,
}

impl ParsedRow {
    pub fn into_record(self, department_id: Uuid) -> EmployeeRecord {
        EmployeeRecord {
            document_number: self.document_number,
            document_type: self.document_type,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            birth_date: self.birth_date,
            gender: self.gender,
            position: self.position,
            salary: self.salary,
            hire_date: self.hire_date,
            status: self.status,
            education_level: self.education_level,
            professional_profile: self.professional_profile,
            department_id,
        }
    }
}

/// Parses one data row. `today` is the hire date used when the cell is absent
/// or unreadable.
pub fn parse_row(
    headers: &HeaderMap,
    row: &[String],
    today: NaiveDate,
) -> Result<ParsedRow, RowIssue> {
    let text = |field: Field| headers.lookup(row, field).map(str::to_string);

    let document_number = text(Field::DocumentNumber).ok_or(RowIssue::MissingDocument)?;

    let full_name = text(Field::FullName)
        .or_else(|| {
            let given = text(Field::GivenName)?;
            Some(match text(Field::Surname) {
                Some(surname) => format!("{given} {surname}"),
                None => given,
            })
        })
        .ok_or_else(|| RowIssue::MissingName(document_number.clone()))?;

    let email = match text(Field::Email) {
        Some(email) if email.contains('@') => email,
        _ => placeholder_email(&full_name),
    };

    let position =
        text(Field::Position).ok_or_else(|| RowIssue::MissingPosition(full_name.clone()))?;
    let department_name =
        text(Field::Department).ok_or_else(|| RowIssue::MissingDepartment(full_name.clone()))?;

    let salary = text(Field::Salary)
        .and_then(|s| parse_salary(&s))
        .unwrap_or(Decimal::ZERO);
    if salary.is_sign_negative() && !salary.is_zero() {
        return Err(RowIssue::Invalid("salary cannot be negative".to_string()));
    }

    Ok(ParsedRow {
        document_number,
        document_type: text(Field::DocumentType)
            .unwrap_or_else(|| DEFAULT_DOCUMENT_TYPE.to_string()),
        full_name,
        email,
        phone: text(Field::Phone),
        address: text(Field::Address),
        birth_date: text(Field::BirthDate).and_then(|s| parse_date(&s)),
        gender: text(Field::Gender),
        position,
        salary,
        hire_date: text(Field::HireDate)
            .and_then(|s| parse_date(&s))
            .unwrap_or(today),
        status: EmployeeStatus::from_import(headers.lookup(row, Field::Status)),
        education_level: EducationLevel::from_import(headers.lookup(row, Field::EducationLevel)),
        professional_profile: text(Field::Profile),
        department_name,
    })
}

/// `"María José Núñez"` → `"maria.jose.nunez@talentoplusadmin.com"`.
pub fn placeholder_email(full_name: &str) -> String {
    let slug: String = full_name
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' => '.',
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect();
    format!("{slug}@{PLACEHOLDER_EMAIL_DOMAIN}")
}

/// Strips the currency symbol and thousands separators before parsing.
pub fn parse_salary(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ','))
        .collect();
    let cleaned = cleaned.trim();
    Decimal::from_str(cleaned)
        .or_else(|_| Decimal::from_scientific(cleaned))
        .ok()
}

/// Accepts ISO dates, day-first dates, RFC 3339 timestamps and date-times.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt.date());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn sheet_row(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn headers(values: &[&str]) -> HeaderMap {
        HeaderMap::from_row(&sheet_row(values))
    }

    #[test]
    fn test_full_row_is_coerced() {
        let h = headers(&[
            "Documento",
            "Nombre Completo",
            "Email",
            "Cargo",
            "Departamento",
            "Salario",
            "Fecha Ingreso",
            "Fecha Nacimiento",
            "Estado",
            "Nivel Educativo",
            "Telefono",
        ]);
        let row = sheet_row(&[
            " 1020 ",
            "Ana Pérez",
            "ana@corp.co",
            "Developer",
            "Tecnología",
            "$3,500,000.50",
            "2024-02-10",
            "15/08/1990",
            "Vacaciones",
            "maestria",
            "3001234567",
        ]);

        let parsed = parse_row(&h, &row, today()).unwrap();
        assert_eq!(parsed.document_number, "1020");
        assert_eq!(parsed.document_type, "CC");
        assert_eq!(parsed.email, "ana@corp.co");
        assert_eq!(parsed.salary, Decimal::from_str("3500000.50").unwrap());
        assert_eq!(parsed.hire_date, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        assert_eq!(parsed.birth_date, NaiveDate::from_ymd_opt(1990, 8, 15));
        assert_eq!(parsed.status, EmployeeStatus::OnVacation);
        assert_eq!(parsed.education_level, EducationLevel::Master);
        assert_eq!(parsed.phone.as_deref(), Some("3001234567"));
        assert_eq!(parsed.address, None);
        assert_eq!(parsed.department_name, "Tecnología");
    }

    #[test]
    fn test_missing_document_is_a_warning() {
        let h = headers(&["Documento", "Nombre", "Cargo", "Departamento"]);
        let err = parse_row(&h, &sheet_row(&["", "Ana", "Dev", "TI"]), today()).unwrap_err();
        assert_eq!(err, RowIssue::MissingDocument);
        assert!(err.is_warning());
    }

    #[test]
    fn test_name_is_synthesised_from_split_columns() {
        let h = headers(&["Cedula", "Nombres", "Apellidos", "Puesto", "Area"]);
        let parsed =
            parse_row(&h, &sheet_row(&["9", "Luis", "Gómez", "Analista", "Ventas"]), today())
                .unwrap();
        assert_eq!(parsed.full_name, "Luis Gómez");
    }

    #[test]
    fn test_given_name_alone_is_enough() {
        let h = headers(&["Cedula", "First Name", "Last Name", "Puesto", "Area"]);
        let parsed =
            parse_row(&h, &sheet_row(&["9", "Luis", "", "Analista", "Ventas"]), today()).unwrap();
        assert_eq!(parsed.full_name, "Luis");
    }

    #[test]
    fn test_missing_name_cites_document() {
        let h = headers(&["Documento", "Nombre", "Apellidos", "Cargo", "Departamento"]);
        let err =
            parse_row(&h, &sheet_row(&["77", "", "Gómez", "Dev", "Ventas"]), today()).unwrap_err();
        assert_eq!(err, RowIssue::MissingName("77".to_string()));
        assert!(!err.is_warning());
        assert_eq!(err.to_string(), "Full name required for document '77'.");
    }

    #[test]
    fn test_missing_position_and_department_cite_name() {
        let h = headers(&["Documento", "Nombre", "Cargo", "Departamento"]);
        let err = parse_row(&h, &sheet_row(&["1", "Ana", "", "Ventas"]), today()).unwrap_err();
        assert_eq!(err, RowIssue::MissingPosition("Ana".to_string()));

        let err = parse_row(&h, &sheet_row(&["1", "Ana", "Dev", ""]), today()).unwrap_err();
        assert_eq!(err, RowIssue::MissingDepartment("Ana".to_string()));
    }

    #[test]
    fn test_invalid_email_gets_placeholder() {
        let h = headers(&["Documento", "Nombre", "Correo", "Cargo", "Departamento"]);
        let parsed = parse_row(
            &h,
            &sheet_row(&["5", "José Ñúñez Díaz", "not-an-email", "Dev", "TI"]),
            today(),
        )
        .unwrap();
        assert_eq!(parsed.email, "jose.nunez.diaz@talentoplusadmin.com");
    }

    #[test]
    fn test_defaults_for_absent_optional_fields() {
        let h = headers(&["Documento", "Nombre", "Cargo", "Departamento", "Salario", "Estado"]);
        let parsed = parse_row(
            &h,
            &sheet_row(&["5", "Ana", "Dev", "TI", "a lot", "jubilado"]),
            today(),
        )
        .unwrap();
        assert_eq!(parsed.salary, Decimal::ZERO);
        assert_eq!(parsed.hire_date, today());
        assert_eq!(parsed.birth_date, None);
        assert_eq!(parsed.status, EmployeeStatus::Active);
        assert_eq!(parsed.education_level, EducationLevel::HighSchool);
    }

    #[test]
    fn test_unparsable_hire_date_defaults_to_today() {
        let h = headers(&["Documento", "Nombre", "Cargo", "Departamento", "Fecha Ingreso"]);
        let parsed =
            parse_row(&h, &sheet_row(&["5", "Ana", "Dev", "TI", "someday"]), today()).unwrap();
        assert_eq!(parsed.hire_date, today());
    }

    #[test]
    fn test_negative_salary_is_rejected() {
        let h = headers(&["Documento", "Nombre", "Cargo", "Departamento", "Sueldo"]);
        let err = parse_row(&h, &sheet_row(&["5", "Ana", "Dev", "TI", "-100"]), today())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error processing employee - salary cannot be negative"
        );
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 4);
        assert_eq!(parse_date("2021-03-04"), expected);
        assert_eq!(parse_date("04/03/2021"), expected);
        assert_eq!(parse_date("2021-03-04 08:30:00"), expected);
        assert_eq!(parse_date("2021-03-04T08:30:00Z"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_parse_salary_variants() {
        assert_eq!(parse_salary("$1,200,000"), Some(Decimal::new(1_200_000, 0)));
        assert_eq!(parse_salary(" 2500000.75 "), Decimal::from_str("2500000.75").ok());
        assert_eq!(parse_salary("1.5e6"), Some(Decimal::new(1_500_000, 0)));
        assert_eq!(parse_salary("n/a"), None);
    }
}
