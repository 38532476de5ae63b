//! License entity - Software licenses with optional purchase and expiration dates.
//!
//! Dates are read as text; values that are not `YYYY-MM-DD` are dropped when
//! converted into records.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// License database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "licenses")]
pub struct Model {
    /// Unique identifier for the license
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Licensed product (e.g., "Office 365")
    pub software_name: Option<String>,
    /// License key, unique across the table
    #[sea_orm(unique)]
    pub license_key: Option<String>,
    /// When the license was bought
    pub purchase_date: Option<String>,
    /// When the license stops being valid
    pub expiration_date: Option<String>,
    /// Assigned employee, if any
    pub employee_id: Option<i64>,
}

/// Defines relationships between License and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each license may belong to one employee
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
