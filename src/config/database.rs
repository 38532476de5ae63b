//! Database connection for the SQLite source.
//!
//! The analytics service only reads the system of record's tables. Table
//! creation from the entity definitions exists for test fixtures and for
//! bootstrapping an empty database with the expected schema.

use crate::entities::{Employee, Hardware, License, WebAccess};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::info;

/// Opens a connection to the database at `url`.
pub async fn connect(url: &str) -> Result<DatabaseConnection> {
    let db = Database::connect(url).await?;
    info!("Connected to database source");
    Ok(db)
}

/// Creates the four source tables from their entity definitions.
///
/// Employees is created first so the foreign keys of the asset tables resolve.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let employee_table = schema.create_table_from_entity(Employee);
    let hardware_table = schema.create_table_from_entity(Hardware);
    let license_table = schema.create_table_from_entity(License);
    let web_access_table = schema.create_table_from_entity(WebAccess);

    db.execute(builder.build(&employee_table)).await?;
    db.execute(builder.build(&hardware_table)).await?;
    db.execute(builder.build(&license_table)).await?;
    db.execute(builder.build(&web_access_table)).await?;

    Ok(())
}
