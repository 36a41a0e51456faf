//! XLSX export of the active employees in a layout the importer accepts.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Color, Format, Workbook, XlsxError};
use sqlx::{FromRow, PgPool};

use crate::models::employee::{EducationLevel, EmployeeStatus};

pub const EXPORT_SHEET_NAME: &str = "Empleados";

pub const EXPORT_HEADERS: [&str; 12] = [
    "Documento",
    "Tipo Documento",
    "Nombre Completo",
    "Email",
    "Telefono",
    "Direccion",
    "Departamento",
    "Cargo",
    "Salario",
    "Fecha Ingreso",
    "Estado",
    "Nivel Educativo",
];

#[derive(Debug, Clone, FromRow)]
pub struct ExportRow {
    pub document_number: String,
    pub document_type: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub department_name: String,
    pub position: String,
    pub salary: Decimal,
    pub hire_date: NaiveDate,
    pub status: String,
    pub education_level: String,
}

pub async fn load_export_rows(pool: &PgPool) -> Result<Vec<ExportRow>, sqlx::Error> {
    sqlx::query_as::<_, ExportRow>(
        r#"
        SELECT e.document_number, e.document_type, e.full_name, e.email, e.phone,
               e.address, d.name AS department_name, e.position, e.salary,
               e.hire_date, e.status, e.education_level
        FROM employees e
        JOIN departments d ON d.id = e.department_id
        WHERE e.is_active
        ORDER BY e.full_name
        "#,
    )
    .fetch_all(pool)
    .await
}

pub fn build_export(rows: &[ExportRow]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4F81BD))
        .set_font_color(Color::White);
    let money = Format::new().set_num_format("$#,##0.00");

    let sheet = workbook.add_worksheet();
    sheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let r = index as u32 + 1;
        sheet.write_string(r, 0, &row.document_number)?;
        sheet.write_string(r, 1, &row.document_type)?;
        sheet.write_string(r, 2, &row.full_name)?;
        sheet.write_string(r, 3, &row.email)?;
        sheet.write_string(r, 4, row.phone.as_deref().unwrap_or_default())?;
        sheet.write_string(r, 5, row.address.as_deref().unwrap_or_default())?;
        sheet.write_string(r, 6, &row.department_name)?;
        sheet.write_string(r, 7, &row.position)?;
        sheet.write_number_with_format(r, 8, row.salary.to_f64().unwrap_or(0.0), &money)?;
        sheet.write_string(r, 9, row.hire_date.format("%Y-%m-%d").to_string())?;
        sheet.write_string(r, 10, EmployeeStatus::from_db(&row.status).spanish_token())?;
        sheet.write_string(
            r,
            11,
            EducationLevel::from_db(&row.education_level).spanish_token(),
        )?;
    }

    sheet.autofit();
    workbook.save_to_buffer()
}
