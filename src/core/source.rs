//! Tabular sources the record tables are loaded from.
//!
//! A failing source never surfaces as an error to callers: [`DataSource::load`]
//! logs the reason and returns `None`, which downstream code treats as "no data".

use crate::{
    config::{SourceConfig, database},
    core::{
        blocking,
        records::{StoredRecord, Table},
    },
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where record tables come from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// One `<table>.csv` file per table inside a directory.
    CsvDirectory(PathBuf),
    /// A database owned by the system of record.
    Database(DatabaseConnection),
    /// A source that could not be opened; every table is absent.
    Unavailable(String),
}

impl DataSource {
    /// Opens the configured source.
    ///
    /// A database that cannot be reached does not stop the service; the source
    /// becomes [`DataSource::Unavailable`] and every table loads as absent.
    pub async fn open(config: &SourceConfig) -> Self {
        match config {
            SourceConfig::Csv { data_dir } => {
                info!("Reading tables from CSV directory {}", data_dir.display());
                Self::CsvDirectory(data_dir.clone())
            }
            SourceConfig::Database { url } => match database::connect(url).await {
                Ok(db) => Self::Database(db),
                Err(e) => {
                    warn!(error = %e, "Database source unavailable; all tables will be absent");
                    Self::Unavailable(e.to_string())
                }
            },
        }
    }

    /// Loads the table for `R`, or `None` when the source is missing or malformed.
    pub async fn load<R: StoredRecord>(&self) -> Option<Table<R>> {
        let table_name = R::TABLE.as_str();
        let loaded = match self {
            Self::CsvDirectory(dir) => {
                let dir = dir.clone();
                blocking("csv load", move || load_csv::<R>(&dir)).await
            }
            Self::Database(db) => load_database::<R>(db).await,
            Self::Unavailable(reason) => Err(Error::SourceUnavailable {
                table: table_name,
                message: reason.clone(),
            }),
        };

        match loaded {
            Ok(table) => {
                for column in table.missing_columns() {
                    warn!(
                        table = table_name,
                        column, "Source is missing a column; values will be treated as N/A"
                    );
                }
                info!(table = table_name, rows = table.len(), "Loaded table");
                Some(table)
            }
            Err(e) => {
                warn!(
                    table = table_name,
                    error = %e,
                    "Table source unavailable; treating as absent"
                );
                None
            }
        }
    }
}

/// Path of the CSV file backing `R` inside `dir`.
#[must_use]
pub fn csv_path<R: StoredRecord>(dir: &Path) -> PathBuf {
    dir.join(format!("{}.csv", R::TABLE.as_str()))
}

fn load_csv<R: StoredRecord>(dir: &Path) -> Result<Table<R>> {
    let path = csv_path::<R>(dir);
    debug!("Reading table from {:?}", path);

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();

    if let Some(required) = R::REQUIRED
        .iter()
        .find(|column| !headers.iter().any(|header| header == *column))
    {
        return Err(Error::SourceUnavailable {
            table: R::TABLE.as_str(),
            message: format!("required column '{required}' missing from {}", path.display()),
        });
    }

    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<R>, csv::Error>>()?;

    Ok(Table::new(rows, headers))
}

async fn load_database<R: StoredRecord>(db: &DatabaseConnection) -> Result<Table<R>> {
    let models = R::Entity::find()
        .order_by_asc(R::order_column())
        .all(db)
        .await?;

    Ok(Table::complete(
        models.into_iter().map(R::from_model).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::records::{ColumnPresence, Employee, Hardware, License, WebAccess};
    use crate::test_utils::{
        csv_dir, init_test_tracing, insert_employee, insert_hardware, setup_test_db, write_csv,
    };
    use chrono::NaiveDate;
    use sea_orm::ConnectionTrait;

    #[tokio::test]
    async fn test_csv_missing_file_is_absent() -> Result<()> {
        init_test_tracing();
        let dir = csv_dir()?;
        let source = DataSource::CsvDirectory(dir.path().to_path_buf());

        assert!(source.load::<Employee>().await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_csv_loads_rows_in_order() -> Result<()> {
        let dir = csv_dir()?;
        write_csv(
            dir.path(),
            "employees",
            "id,name,department,position\n\
             2,Bea,IT,Analyst\n\
             1,Ana,,\n",
        )?;
        let source = DataSource::CsvDirectory(dir.path().to_path_buf());

        let table = source
            .load::<Employee>()
            .await
            .ok_or_else(|| Error::render("employees should load"))?;
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].name, "Bea");
        assert_eq!(table.rows()[1].id, 1);
        assert_eq!(table.rows()[1].department, None);
        assert_eq!(table.rows()[1].position, None);
        assert!(table.missing_columns().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_csv_missing_optional_column_is_tolerated() -> Result<()> {
        init_test_tracing();
        let dir = csv_dir()?;
        write_csv(
            dir.path(),
            "hardware",
            "id,brand,serial_number\n1,Dell,SN-1\n2,HP,SN-2\n",
        )?;
        let source = DataSource::CsvDirectory(dir.path().to_path_buf());

        let table = source
            .load::<Hardware>()
            .await
            .ok_or_else(|| Error::render("hardware should load"))?;
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("type"), ColumnPresence::Missing);
        assert_eq!(table.rows()[0].hardware_type, None);
        assert_eq!(table.rows()[1].brand.as_deref(), Some("HP"));
        Ok(())
    }

    #[tokio::test]
    async fn test_csv_without_id_column_is_absent() -> Result<()> {
        let dir = csv_dir()?;
        write_csv(dir.path(), "hardware", "type,brand\nLaptop,Dell\n")?;
        let source = DataSource::CsvDirectory(dir.path().to_path_buf());

        assert!(source.load::<Hardware>().await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_csv_undecodable_row_is_absent() -> Result<()> {
        let dir = csv_dir()?;
        write_csv(
            dir.path(),
            "hardware",
            "id,type,employee_id\n1,Laptop,3\nnot-a-number,Monitor,\n",
        )?;
        let source = DataSource::CsvDirectory(dir.path().to_path_buf());

        assert!(source.load::<Hardware>().await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_csv_bad_dates_become_none() -> Result<()> {
        let dir = csv_dir()?;
        write_csv(
            dir.path(),
            "licenses",
            "id,software_name,license_key,purchase_date,expiration_date,employee_id\n\
             1,Office,K-1,2024-01-15,someday,\n\
             2,Slack,K-2,,2026-06-30T00:00:00,4\n",
        )?;
        let source = DataSource::CsvDirectory(dir.path().to_path_buf());

        let table = source
            .load::<License>()
            .await
            .ok_or_else(|| Error::render("licenses should load"))?;
        let rows = table.rows();
        assert_eq!(rows[0].purchase_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(rows[0].expiration_date, None);
        assert_eq!(rows[1].purchase_date, None);
        assert_eq!(rows[1].expiration_date, NaiveDate::from_ymd_opt(2026, 6, 30));
        assert_eq!(rows[1].employee_id, Some(4));
        Ok(())
    }

    #[tokio::test]
    async fn test_database_source_reads_all_columns() -> Result<()> {
        let db = setup_test_db().await?;
        insert_employee(&db, 1, "Ana", Some("IT"), None).await?;
        insert_hardware(&db, 2, "Monitor", "SN-2", Some(1)).await?;
        insert_hardware(&db, 1, "Laptop", "SN-1", None).await?;
        let source = DataSource::Database(db);

        let hardware = source
            .load::<Hardware>()
            .await
            .ok_or_else(|| Error::render("hardware should load"))?;
        assert!(hardware.missing_columns().is_empty());
        let ids: Vec<i64> = hardware.rows().iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(hardware.rows()[1].employee_id, Some(1));

        let employees = source
            .load::<Employee>()
            .await
            .ok_or_else(|| Error::render("employees should load"))?;
        assert_eq!(employees.rows()[0].department.as_deref(), Some("IT"));
        Ok(())
    }

    #[tokio::test]
    async fn test_database_null_values_are_kept() -> Result<()> {
        let db = setup_test_db().await?;
        db.execute_unprepared("INSERT INTO employees (id, name) VALUES (1, NULL)")
            .await?;
        db.execute_unprepared(
            "INSERT INTO hardware (id, type, serial_number) \
             VALUES (1, 'Laptop', 'SN-1'), (2, NULL, NULL)",
        )
        .await?;
        db.execute_unprepared(
            "INSERT INTO web_accesses (id, service_name, url) VALUES (1, 'Jira', NULL)",
        )
        .await?;
        let source = DataSource::Database(db);

        let employees = source
            .load::<Employee>()
            .await
            .ok_or_else(|| Error::render("employees should load"))?;
        assert_eq!(employees.rows()[0].name, "");

        let hardware = source
            .load::<Hardware>()
            .await
            .ok_or_else(|| Error::render("hardware should load"))?;
        assert_eq!(hardware.len(), 2);
        assert_eq!(hardware.rows()[1].hardware_type, None);
        assert_eq!(hardware.rows()[1].serial_number, None);

        let accesses = source
            .load::<WebAccess>()
            .await
            .ok_or_else(|| Error::render("web accesses should load"))?;
        assert_eq!(accesses.rows()[0].service_name.as_deref(), Some("Jira"));
        assert_eq!(accesses.rows()[0].url, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_database_bad_dates_become_none() -> Result<()> {
        let db = setup_test_db().await?;
        db.execute_unprepared(
            "INSERT INTO licenses (id, software_name, license_key, purchase_date, expiration_date) \
             VALUES (1, 'Office', 'K-1', '2024-01-01', NULL), \
             (2, 'Slack', 'K-2', 'someday', '2026-06-30 00:00:00')",
        )
        .await?;
        let source = DataSource::Database(db);

        let table = source
            .load::<License>()
            .await
            .ok_or_else(|| Error::render("licenses should load"))?;
        let rows = table.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].purchase_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(rows[0].expiration_date, None);
        assert_eq!(rows[1].purchase_date, None);
        assert_eq!(rows[1].expiration_date, NaiveDate::from_ymd_opt(2026, 6, 30));
        Ok(())
    }

    #[tokio::test]
    async fn test_database_without_tables_is_absent() -> Result<()> {
        init_test_tracing();
        let db = sea_orm::Database::connect("sqlite::memory:").await?;
        let source = DataSource::Database(db);

        assert!(source.load::<WebAccess>().await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_open_csv_config() {
        let config = SourceConfig::Csv {
            data_dir: PathBuf::from("/srv/assets"),
        };
        match DataSource::open(&config).await {
            DataSource::CsvDirectory(dir) => assert_eq!(dir, PathBuf::from("/srv/assets")),
            other => panic!("expected a CSV source, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_database_loads_nothing() {
        init_test_tracing();
        let config = SourceConfig::Database {
            url: "unsupported://nowhere".to_string(),
        };
        let source = DataSource::open(&config).await;

        assert!(matches!(source, DataSource::Unavailable(_)));
        assert!(source.load::<Employee>().await.is_none());
    }
}
