//! Workbook decoding: XLSX bytes → worksheets of trimmed cell text.

use std::io::Cursor;

use calamine::{open_workbook_from_rs, DataType, Reader, Xlsx};
use chrono::{Duration, NaiveDate};

use crate::import::ImportError;

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    /// Row 0 is sheet row 1, even when the used range starts further down.
    pub rows: Vec<Vec<String>>,
}

/// Reads every worksheet in workbook order.
pub fn read_workbook(bytes: &[u8]) -> Result<Vec<Sheet>, ImportError> {
    let mut workbook = open_workbook_from_rs::<Xlsx<_>, _>(Cursor::new(bytes))
        .map_err(|err| ImportError::Workbook(format!("Unable to open the spreadsheet: {err}")))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names().to_vec() {
        let range = match workbook.worksheet_range(&name) {
            Some(Ok(range)) => range,
            Some(Err(err)) => {
                return Err(ImportError::Workbook(format!(
                    "Unable to read the worksheet named '{name}': {err}"
                )))
            }
            None => continue,
        };

        let (row_offset, col_offset) = range
            .start()
            .map(|(row, col)| (row as usize, col as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<String>> = vec![Vec::new(); row_offset];
        for cells in range.rows() {
            let mut values = vec![String::new(); col_offset];
            values.extend(cells.iter().map(cell_text));
            rows.push(values);
        }

        sheets.push(Sheet { name, rows });
    }
    Ok(sheets)
}

/// The sheet named like an employee list, otherwise the first one.
pub fn select_employee_sheet(sheets: Vec<Sheet>) -> Option<Sheet> {
    let position = sheets.iter().position(|sheet| {
        let name = sheet.name.to_lowercase();
        name.contains("empleado") || name.contains("employee")
    });
    let index = position.unwrap_or(0);
    sheets.into_iter().nth(index)
}

pub fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        DataType::DateTime(serial) => excel_serial_date(*serial)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| serial.to_string()),
        other => other.to_string().trim().to_string(),
    }
}

/// Converts an Excel 1900-system serial day number to a calendar date.
fn excel_serial_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}
