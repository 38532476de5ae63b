//! Employee entity - People that hardware, licenses and web accesses are assigned to.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    /// Unique identifier for the employee
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name
    pub name: Option<String>,
    /// Department, if recorded
    pub department: Option<String>,
    /// Job title, if recorded
    pub position: Option<String>,
}

/// Defines relationships between Employee and the asset tables
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One employee has many hardware items
    #[sea_orm(has_many = "super::hardware::Entity")]
    Hardware,
    /// One employee has many licenses
    #[sea_orm(has_many = "super::license::Entity")]
    Licenses,
    /// One employee has many web accesses
    #[sea_orm(has_many = "super::web_access::Entity")]
    WebAccesses,
}

impl Related<super::hardware::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hardware.def()
    }
}

impl Related<super::license::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Licenses.def()
    }
}

impl Related<super::web_access::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WebAccesses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
