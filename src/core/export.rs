//! Full multi-sheet spreadsheet export.
//!
//! Sheets are built as plain [`SheetData`] first, then written with
//! `rust_xlsxwriter`. Asset sheets are left-joined to employees so every row
//! carries the assignee's name.

use crate::{
    core::records::{Employee, Hardware, License, Record, Table, WebAccess, format_date},
    errors::Result,
};
use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook};
use std::{borrow::Cow, collections::HashMap};
use tracing::{debug, warn};

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Integer, written as a number
    Int(i64),
    /// Text
    Text(String),
    /// Blank cell
    Empty,
}

impl From<Option<i64>> for CellValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Empty, Self::Int)
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Empty, Self::Text)
    }
}

impl From<Option<&str>> for CellValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Empty, |s| Self::Text(s.to_string()))
    }
}

/// A named sheet with a header row and data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    /// Sheet tab name
    pub name: &'static str,
    /// Header row
    pub headers: &'static [&'static str],
    /// Data rows, each as wide as `headers`
    pub rows: Vec<Vec<CellValue>>,
}

/// Header row of the `Employees` sheet.
pub const EMPLOYEE_HEADERS: &[&str] = &["ID", "Name", "Department", "Position"];
/// Header row of the `Hardware` sheet.
pub const HARDWARE_HEADERS: &[&str] = &[
    "ID",
    "Type",
    "Brand",
    "Serial Number",
    "Location",
    "Assigned Employee ID",
    "Assigned Employee Name",
];
/// Header row of the `Licenses` sheet.
pub const LICENSE_HEADERS: &[&str] = &[
    "ID",
    "Software Name",
    "License Key",
    "Purchase Date",
    "Expiration Date",
    "Assigned Employee ID",
    "Assigned Employee Name",
];
/// Header row of the `Web Accesses` sheet; passwords are never exported.
pub const WEB_ACCESS_HEADERS: &[&str] = &[
    "ID",
    "Service Name",
    "URL",
    "Access Username",
    "Assigned Employee ID",
    "Assigned Employee Name",
];

/// Download name of an export generated at `generated_at`.
#[must_use]
pub fn export_filename(generated_at: NaiveDateTime) -> String {
    format!(
        "ActivosTIC_Full_Report_{}.xlsx",
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

/// Employee id to name lookup. The first row wins for duplicate ids.
struct EmployeeIndex<'a>(HashMap<i64, &'a str>);

impl<'a> EmployeeIndex<'a> {
    fn new(employees: Option<&'a Table<Employee>>) -> Self {
        let mut names = HashMap::new();
        for employee in employees.map(Table::rows).unwrap_or_default() {
            names.entry(employee.id).or_insert(employee.name.as_str());
        }
        Self(names)
    }

    fn name(&self, employee_id: Option<i64>) -> CellValue {
        employee_id
            .and_then(|id| self.0.get(&id).copied())
            .into()
    }
}

/// Builds the four export sheets. Absent tables produce header-only sheets.
#[must_use]
pub fn build_sheets(
    employees: Option<&Table<Employee>>,
    hardware: Option<&Table<Hardware>>,
    licenses: Option<&Table<License>>,
    web_accesses: Option<&Table<WebAccess>>,
) -> Vec<SheetData> {
    let index = EmployeeIndex::new(employees);

    let employee_rows = rows_of(employees, |e| {
        vec![
            CellValue::Int(e.id),
            CellValue::Text(e.name.clone()),
            e.department.as_deref().into(),
            e.position.as_deref().into(),
        ]
    });

    let hardware_rows = rows_of(hardware, |h| {
        vec![
            CellValue::Int(h.id),
            h.hardware_type.as_deref().into(),
            h.brand.as_deref().into(),
            h.serial_number.as_deref().into(),
            h.location.as_deref().into(),
            h.employee_id.into(),
            index.name(h.employee_id),
        ]
    });

    let license_rows = rows_of(licenses, |l| {
        vec![
            CellValue::Int(l.id),
            l.software_name.as_deref().into(),
            l.license_key.as_deref().into(),
            format_date(l.purchase_date).into(),
            format_date(l.expiration_date).into(),
            l.employee_id.into(),
            index.name(l.employee_id),
        ]
    });

    let web_access_rows = rows_of(web_accesses, |w| {
        vec![
            CellValue::Int(w.id),
            w.service_name.as_deref().into(),
            w.url.as_deref().into(),
            w.access_username.as_deref().into(),
            w.employee_id.into(),
            index.name(w.employee_id),
        ]
    });

    vec![
        SheetData {
            name: "Employees",
            headers: EMPLOYEE_HEADERS,
            rows: employee_rows,
        },
        SheetData {
            name: "Hardware",
            headers: HARDWARE_HEADERS,
            rows: hardware_rows,
        },
        SheetData {
            name: "Licenses",
            headers: LICENSE_HEADERS,
            rows: license_rows,
        },
        SheetData {
            name: "Web Accesses",
            headers: WEB_ACCESS_HEADERS,
            rows: web_access_rows,
        },
    ]
}

fn rows_of<R, F>(table: Option<&Table<R>>, to_row: F) -> Vec<Vec<CellValue>>
where
    R: Record,
    F: Fn(&R) -> Vec<CellValue>,
{
    table
        .map(|t| t.rows().iter().map(to_row).collect())
        .unwrap_or_default()
}

/// Most characters a single `.xlsx` cell can hold.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Truncates text that would not fit in one cell.
fn fit_cell_text<'a>(sheet: &str, row: u32, text: &'a str) -> Cow<'a, str> {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => {
            warn!(
                sheet,
                row,
                chars = text.chars().count(),
                "Cell text exceeds the spreadsheet limit; truncating"
            );
            Cow::Owned(text[..cut].to_string())
        }
        None => Cow::Borrowed(text),
    }
}

/// Writes `sheets` into an in-memory `.xlsx` workbook.
pub fn write_workbook(sheets: &[SheetData]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for sheet in sheets {
        debug!(sheet = sheet.name, rows = sheet.rows.len(), "Writing sheet");
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name)?;

        for (col, header) in (0u16..).zip(sheet.headers) {
            worksheet.write_string_with_format(0, col, *header, &header_format)?;
        }

        for (row, cells) in (1u32..).zip(&sheet.rows) {
            for (col, cell) in (0u16..).zip(cells) {
                match cell {
                    #[allow(clippy::cast_precision_loss)]
                    CellValue::Int(n) => {
                        worksheet.write_number(row, col, *n as f64)?;
                    }
                    CellValue::Text(s) => {
                        worksheet.write_string(row, col, fit_cell_text(sheet.name, row, s))?;
                    }
                    CellValue::Empty => {}
                }
            }
        }

        worksheet.autofit();
    }

    Ok(workbook.save_to_buffer()?)
}
