//! Shared test utilities for the analytics service.
//!
//! Helpers for CSV source directories, in-memory `SQLite` sources seeded through
//! `SeaORM`, and record constructors with sensible defaults.

use crate::{
    core::records::{Employee, Hardware},
    entities,
    errors::Result,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::path::Path;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber; safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an empty directory to hold CSV tables. Removed on drop.
pub fn csv_dir() -> Result<TempDir> {
    Ok(tempfile::tempdir()?)
}

/// Writes `<table>.csv` into `dir`, replacing any previous contents.
pub fn write_csv(dir: &Path, table: &str, contents: &str) -> Result<()> {
    std::fs::write(dir.join(format!("{table}.csv")), contents)?;
    Ok(())
}

/// Builds an employee record with no position.
pub fn employee(id: i64, name: &str, department: Option<&str>) -> Employee {
    Employee {
        id,
        name: name.to_string(),
        department: department.map(str::to_string),
        position: None,
    }
}

/// Builds a hardware record with only a type and assignee.
pub fn hardware(id: i64, hardware_type: Option<&str>, employee_id: Option<i64>) -> Hardware {
    Hardware {
        id,
        hardware_type: hardware_type.map(str::to_string),
        brand: None,
        serial_number: None,
        location: None,
        employee_id,
    }
}

/// Creates an in-memory `SQLite` database with all source tables.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Inserts an employee row.
pub async fn insert_employee(
    db: &DatabaseConnection,
    id: i64,
    name: &str,
    department: Option<&str>,
    position: Option<&str>,
) -> Result<entities::EmployeeModel> {
    let employee = entities::employee::ActiveModel {
        id: Set(id),
        name: Set(Some(name.to_string())),
        department: Set(department.map(str::to_string)),
        position: Set(position.map(str::to_string)),
    };
    Ok(employee.insert(db).await?)
}

/// Inserts a hardware row with no brand or location.
pub async fn insert_hardware(
    db: &DatabaseConnection,
    id: i64,
    hardware_type: &str,
    serial_number: &str,
    employee_id: Option<i64>,
) -> Result<entities::HardwareModel> {
    let item = entities::hardware::ActiveModel {
        id: Set(id),
        hardware_type: Set(Some(hardware_type.to_string())),
        brand: Set(None),
        serial_number: Set(Some(serial_number.to_string())),
        location: Set(None),
        employee_id: Set(employee_id),
    };
    Ok(item.insert(db).await?)
}

/// Inserts a license row without dates.
pub async fn insert_license(
    db: &DatabaseConnection,
    id: i64,
    software_name: &str,
    license_key: &str,
    employee_id: Option<i64>,
) -> Result<entities::LicenseModel> {
    let license = entities::license::ActiveModel {
        id: Set(id),
        software_name: Set(Some(software_name.to_string())),
        license_key: Set(Some(license_key.to_string())),
        purchase_date: Set(None),
        expiration_date: Set(None),
        employee_id: Set(employee_id),
    };
    Ok(license.insert(db).await?)
}
