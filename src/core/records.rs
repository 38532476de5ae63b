//! Typed records and in-memory tables.
//!
//! Each entity has an explicit record type whose optional values are `Option`s.
//! A [`Table`] keeps the rows in source order together with the set of columns the
//! source actually provided, so callers can tell a null value apart from a column
//! that was never there.

use crate::entities;
use chrono::NaiveDate;
use sea_orm::EntityTrait;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use std::collections::BTreeSet;

/// Label substituted for missing categorical values.
pub const NOT_AVAILABLE: &str = "N/A";

/// The four tables exposed by the system of record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableName {
    /// `employees`
    Employees,
    /// `hardware`
    Hardware,
    /// `licenses`
    Licenses,
    /// `web_accesses`
    WebAccesses,
}

impl TableName {
    /// Source name of the table; also the CSV file stem.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::Hardware => "hardware",
            Self::Licenses => "licenses",
            Self::WebAccesses => "web_accesses",
        }
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a table's source provided a given column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnPresence {
    /// The column exists (individual values may still be null).
    Present,
    /// The source never provided this column.
    Missing,
}

/// A row type that can be loaded into a [`Table`].
pub trait Record: DeserializeOwned + Send + Sync + 'static {
    /// Table this record belongs to.
    const TABLE: TableName;
    /// Every column the record reads.
    const COLUMNS: &'static [&'static str];
    /// Columns without which rows cannot be decoded at all.
    const REQUIRED: &'static [&'static str];

    /// Primary key.
    fn id(&self) -> i64;

    /// Value of a categorical column, `None` when the value is null or the
    /// column is not categorical for this record.
    fn category(&self, column: &str) -> Option<&str>;
}

/// A record that can also be read through its `SeaORM` entity.
pub trait StoredRecord: Record {
    /// Backing entity.
    type Entity: EntityTrait;

    /// Column used to keep database reads in a stable order.
    fn order_column() -> <Self::Entity as EntityTrait>::Column;

    /// Converts a database model into the record.
    fn from_model(model: <Self::Entity as EntityTrait>::Model) -> Self;
}

/// A record that may be assigned to an employee.
pub trait Assigned {
    /// Foreign key into the employees table; `None` when unassigned.
    fn employee_id(&self) -> Option<i64>;
}

/// Read-only, ordered collection of records of one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<R> {
    rows: Vec<R>,
    columns: BTreeSet<String>,
}

impl<R: Record> Table<R> {
    /// Creates a table from rows and the column names the source provided.
    pub fn new<I, S>(rows: Vec<R>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a table where every column of `R` is present.
    pub fn complete(rows: Vec<R>) -> Self {
        Self::new(rows, R::COLUMNS.iter().copied())
    }

    /// Rows in source order.
    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Reports whether the source provided `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> ColumnPresence {
        if self.columns.contains(name) {
            ColumnPresence::Present
        } else {
            ColumnPresence::Missing
        }
    }

    /// Expected columns of `R` the source did not provide.
    #[must_use]
    pub fn missing_columns(&self) -> Vec<&'static str> {
        R::COLUMNS
            .iter()
            .copied()
            .filter(|column| !self.columns.contains(*column))
            .collect()
    }

    /// Finds the first row with the given primary key.
    #[must_use]
    pub fn find(&self, id: i64) -> Option<&R> {
        self.rows.iter().find(|row| row.id() == id)
    }
}

impl<R: Record + Assigned> Table<R> {
    /// Rows assigned to `employee_id`, in source order.
    pub fn assigned_to(&self, employee_id: i64) -> impl Iterator<Item = &R> {
        self.rows
            .iter()
            .filter(move |row| row.employee_id() == Some(employee_id))
    }
}

/// Parses a `YYYY-MM-DD` date, also accepting a trailing time component.
/// Anything else yields `None`.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok().or_else(|| {
        trimmed
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    })
}

/// Formats an optional date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

/// An employee.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Employee {
    /// Primary key
    pub id: i64,
    /// Full name
    #[serde(default)]
    pub name: String,
    /// Department, if recorded
    #[serde(default)]
    pub department: Option<String>,
    /// Job title, if recorded
    #[serde(default)]
    pub position: Option<String>,
}

impl Record for Employee {
    const TABLE: TableName = TableName::Employees;
    const COLUMNS: &'static [&'static str] = &["id", "name", "department", "position"];
    const REQUIRED: &'static [&'static str] = &["id"];

    fn id(&self) -> i64 {
        self.id
    }

    fn category(&self, column: &str) -> Option<&str> {
        match column {
            "department" => self.department.as_deref(),
            "position" => self.position.as_deref(),
            _ => None,
        }
    }
}

impl StoredRecord for Employee {
    type Entity = entities::Employee;

    fn order_column() -> entities::EmployeeColumn {
        entities::EmployeeColumn::Id
    }

    fn from_model(model: entities::EmployeeModel) -> Self {
        Self {
            id: model.id,
            name: model.name.unwrap_or_default(),
            department: model.department,
            position: model.position,
        }
    }
}

/// A hardware item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Hardware {
    /// Primary key
    pub id: i64,
    /// Equipment category
    #[serde(rename = "type", default)]
    pub hardware_type: Option<String>,
    /// Manufacturer
    #[serde(default)]
    pub brand: Option<String>,
    /// Serial number
    #[serde(default)]
    pub serial_number: Option<String>,
    /// Physical location
    #[serde(default)]
    pub location: Option<String>,
    /// Assigned employee
    #[serde(default)]
    pub employee_id: Option<i64>,
}

impl Record for Hardware {
    const TABLE: TableName = TableName::Hardware;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "type",
        "brand",
        "serial_number",
        "location",
        "employee_id",
    ];
    const REQUIRED: &'static [&'static str] = &["id"];

    fn id(&self) -> i64 {
        self.id
    }

    fn category(&self, column: &str) -> Option<&str> {
        match column {
            "type" => self.hardware_type.as_deref(),
            "brand" => self.brand.as_deref(),
            "location" => self.location.as_deref(),
            _ => None,
        }
    }
}

impl Assigned for Hardware {
    fn employee_id(&self) -> Option<i64> {
        self.employee_id
    }
}

impl StoredRecord for Hardware {
    type Entity = entities::Hardware;

    fn order_column() -> entities::HardwareColumn {
        entities::HardwareColumn::Id
    }

    fn from_model(model: entities::HardwareModel) -> Self {
        Self {
            id: model.id,
            hardware_type: model.hardware_type,
            brand: model.brand,
            serial_number: model.serial_number,
            location: model.location,
            employee_id: model.employee_id,
        }
    }
}

/// A software license.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct License {
    /// Primary key
    pub id: i64,
    /// Licensed product
    #[serde(default)]
    pub software_name: Option<String>,
    /// License key
    #[serde(default)]
    pub license_key: Option<String>,
    /// Purchase date; unparsable values are dropped
    #[serde(default, deserialize_with = "lenient_date")]
    pub purchase_date: Option<NaiveDate>,
    /// Expiration date; unparsable values are dropped
    #[serde(default, deserialize_with = "lenient_date")]
    pub expiration_date: Option<NaiveDate>,
    /// Assigned employee
    #[serde(default)]
    pub employee_id: Option<i64>,
}

impl Record for License {
    const TABLE: TableName = TableName::Licenses;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "software_name",
        "license_key",
        "purchase_date",
        "expiration_date",
        "employee_id",
    ];
    const REQUIRED: &'static [&'static str] = &["id"];

    fn id(&self) -> i64 {
        self.id
    }

    fn category(&self, column: &str) -> Option<&str> {
        match column {
            "software_name" => self.software_name.as_deref(),
            _ => None,
        }
    }
}

impl Assigned for License {
    fn employee_id(&self) -> Option<i64> {
        self.employee_id
    }
}

impl StoredRecord for License {
    type Entity = entities::License;

    fn order_column() -> entities::LicenseColumn {
        entities::LicenseColumn::Id
    }

    fn from_model(model: entities::LicenseModel) -> Self {
        Self {
            id: model.id,
            software_name: model.software_name,
            license_key: model.license_key,
            purchase_date: model.purchase_date.as_deref().and_then(parse_date),
            expiration_date: model.expiration_date.as_deref().and_then(parse_date),
            employee_id: model.employee_id,
        }
    }
}

/// Credentials for an external web service.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct WebAccess {
    /// Primary key
    pub id: i64,
    /// Service display name
    #[serde(default)]
    pub service_name: Option<String>,
    /// Login URL
    #[serde(default)]
    pub url: Option<String>,
    /// Account user name
    #[serde(default)]
    pub access_username: Option<String>,
    /// Account password; never rendered into reports
    #[serde(default)]
    pub access_password: Option<String>,
    /// Assigned employee
    #[serde(default)]
    pub employee_id: Option<i64>,
}

impl std::fmt::Debug for WebAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebAccess")
            .field("id", &self.id)
            .field("service_name", &self.service_name)
            .field("url", &self.url)
            .field("access_username", &self.access_username)
            .field("access_password", &"<redacted>")
            .field("employee_id", &self.employee_id)
            .finish()
    }
}

impl Record for WebAccess {
    const TABLE: TableName = TableName::WebAccesses;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "service_name",
        "url",
        "access_username",
        "access_password",
        "employee_id",
    ];
    const REQUIRED: &'static [&'static str] = &["id"];

    fn id(&self) -> i64 {
        self.id
    }

    fn category(&self, column: &str) -> Option<&str> {
        match column {
            "service_name" => self.service_name.as_deref(),
            _ => None,
        }
    }
}

impl Assigned for WebAccess {
    fn employee_id(&self) -> Option<i64> {
        self.employee_id
    }
}

impl StoredRecord for WebAccess {
    type Entity = entities::WebAccess;

    fn order_column() -> entities::WebAccessColumn {
        entities::WebAccessColumn::Id
    }

    fn from_model(model: entities::WebAccessModel) -> Self {
        Self {
            id: model.id,
            service_name: model.service_name,
            url: model.url,
            access_username: model.access_username,
            access_password: model.access_password,
            employee_id: model.employee_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::hardware;

    #[test]
    fn test_parse_date_accepts_plain_and_datetime() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 31);
        assert_eq!(parse_date("2025-03-31"), expected);
        assert_eq!(parse_date(" 2025-03-31 "), expected);
        assert_eq!(parse_date("2025-03-31T08:15:00"), expected);
        assert_eq!(parse_date("2025-03-31 08:15:00"), expected);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("31/03/2025"), None);
        assert_eq!(parse_date("soon"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2025-13-01"), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(
            format_date(NaiveDate::from_ymd_opt(2024, 1, 5)),
            Some("2024-01-05".to_string())
        );
        assert_eq!(format_date(None), None);
    }

    #[test]
    fn test_complete_table_has_every_column() {
        let table = Table::complete(vec![hardware(1, Some("Laptop"), None)]);
        assert!(table.missing_columns().is_empty());
        assert_eq!(table.column("type"), ColumnPresence::Present);
        assert_eq!(table.column("colour"), ColumnPresence::Missing);
    }

    #[test]
    fn test_partial_table_reports_missing_columns() {
        let table: Table<Hardware> = Table::new(Vec::new(), ["id", "brand"]);
        assert_eq!(table.column("type"), ColumnPresence::Missing);
        assert_eq!(
            table.missing_columns(),
            vec!["type", "serial_number", "location", "employee_id"]
        );
    }

    #[test]
    fn test_find_and_assigned_to() {
        let table = Table::complete(vec![
            hardware(1, Some("Laptop"), Some(10)),
            hardware(2, Some("Monitor"), Some(11)),
            hardware(3, Some("Mouse"), Some(10)),
            hardware(4, Some("Dock"), None),
        ]);

        assert_eq!(table.find(2).map(|h| h.id), Some(2));
        assert!(table.find(99).is_none());

        let ids: Vec<i64> = table.assigned_to(10).map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(table.assigned_to(42).count(), 0);
    }

    #[test]
    fn test_web_access_debug_hides_password() {
        let access = WebAccess {
            id: 1,
            service_name: Some("Jira".to_string()),
            url: Some("https://jira.example.com".to_string()),
            access_username: Some("ana".to_string()),
            access_password: Some("hunter2".to_string()),
            employee_id: Some(1),
        };
        let debug = format!("{access:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
