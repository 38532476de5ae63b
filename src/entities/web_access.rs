//! Web access entity - Credentials for external web services.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Web access database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "web_accesses")]
pub struct Model {
    /// Unique identifier for the access
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Service display name
    pub service_name: Option<String>,
    /// Login URL
    pub url: Option<String>,
    /// Account user name
    pub access_username: Option<String>,
    /// Account password as stored by the system of record
    pub access_password: Option<String>,
    /// Assigned employee, if any
    pub employee_id: Option<i64>,
}

/// Defines relationships between `WebAccess` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each access may belong to one employee
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
