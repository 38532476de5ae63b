//! Hardware entity - Physical equipment (laptops, monitors, phones...).
//!
//! A hardware item is unassigned when `employee_id` is null. The system of
//! record does not guarantee any column other than `id` is populated.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Hardware database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hardware")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Equipment category (e.g., "Laptop", "Monitor")
    #[sea_orm(column_name = "type")]
    pub hardware_type: Option<String>,
    /// Manufacturer
    pub brand: Option<String>,
    /// Manufacturer serial number, unique across the table
    #[sea_orm(unique)]
    pub serial_number: Option<String>,
    /// Physical location
    pub location: Option<String>,
    /// Assigned employee, if any
    pub employee_id: Option<i64>,
}

/// Defines relationships between Hardware and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item may belong to one employee
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
