//! Entity module - `SeaORM` definitions for the tables owned by the asset system of record.
//! These entities are only ever read; the analytics service never writes to the database.

pub mod employee;
pub mod hardware;
pub mod license;
pub mod web_access;

// Re-export specific types to avoid conflicts
pub use employee::{Column as EmployeeColumn, Entity as Employee, Model as EmployeeModel};
pub use hardware::{Column as HardwareColumn, Entity as Hardware, Model as HardwareModel};
pub use license::{Column as LicenseColumn, Entity as License, Model as LicenseModel};
pub use web_access::{Column as WebAccessColumn, Entity as WebAccess, Model as WebAccessModel};
