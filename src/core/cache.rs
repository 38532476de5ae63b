//! Process-lifetime cache of loaded tables.
//!
//! Each table is loaded from the [`DataSource`] on first access and kept for the
//! rest of the process. Concurrent first accesses share a single load.

use crate::core::{
    records::{Employee, Hardware, License, StoredRecord, Table, TableName, WebAccess},
    source::DataSource,
};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::trace;

/// A loaded slot: the table, or `None` when the source was unavailable.
pub type Loaded<R> = Option<Arc<Table<R>>>;

/// Lazily populated, read-only table cache.
#[derive(Debug)]
pub struct TableCache {
    source: DataSource,
    employees: OnceCell<Loaded<Employee>>,
    hardware: OnceCell<Loaded<Hardware>>,
    licenses: OnceCell<Loaded<License>>,
    web_accesses: OnceCell<Loaded<WebAccess>>,
}

impl TableCache {
    /// Creates an empty cache over `source`. Nothing is loaded until first use.
    #[must_use]
    pub fn new(source: DataSource) -> Self {
        Self {
            source,
            employees: OnceCell::new(),
            hardware: OnceCell::new(),
            licenses: OnceCell::new(),
            web_accesses: OnceCell::new(),
        }
    }

    /// The employees table.
    pub async fn employees(&self) -> Loaded<Employee> {
        self.get(&self.employees).await
    }

    /// The hardware table.
    pub async fn hardware(&self) -> Loaded<Hardware> {
        self.get(&self.hardware).await
    }

    /// The licenses table.
    pub async fn licenses(&self) -> Loaded<License> {
        self.get(&self.licenses).await
    }

    /// The web accesses table.
    pub async fn web_accesses(&self) -> Loaded<WebAccess> {
        self.get(&self.web_accesses).await
    }

    /// Whether `table` has been loaded (successfully or not).
    #[must_use]
    pub fn is_loaded(&self, table: TableName) -> bool {
        match table {
            TableName::Employees => self.employees.initialized(),
            TableName::Hardware => self.hardware.initialized(),
            TableName::Licenses => self.licenses.initialized(),
            TableName::WebAccesses => self.web_accesses.initialized(),
        }
    }

    async fn get<R: StoredRecord>(&self, slot: &OnceCell<Loaded<R>>) -> Loaded<R> {
        let loaded = slot
            .get_or_init(|| async {
                trace!(table = R::TABLE.as_str(), "Cache miss; loading table");
                self.source.load::<R>().await.map(Arc::new)
            })
            .await;
        loaded.clone()
    }
}
