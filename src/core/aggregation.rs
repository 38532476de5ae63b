//! Group-by counts over cached tables.
//!
//! All metrics share [`count_by`]; the instantiations differ only in which table
//! and column they read.

use crate::core::{
    cache::TableCache,
    records::{ColumnPresence, NOT_AVAILABLE, Record, Table},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metric name for hardware grouped by type.
pub const HARDWARE_BY_TYPE: &str = "Hardware Count by Type";
/// Metric name for employees grouped by department.
pub const EMPLOYEES_BY_DEPARTMENT: &str = "Employee Count by Department";
/// Metric name for licenses grouped by software.
pub const LICENSES_BY_SOFTWARE: &str = "License Count by Software Name";

/// Number of rows sharing one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountByItem {
    /// Group label (`"N/A"` for missing values)
    pub item: String,
    /// Rows in the group
    pub count: usize,
}

impl CountByItem {
    /// Creates an entry.
    pub fn new(item: impl Into<String>, count: usize) -> Self {
        Self {
            item: item.into(),
            count,
        }
    }
}

/// JSON payload returned by the metric endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricResponse {
    /// Human-readable metric name
    pub metric_name: String,
    /// Grouped counts
    pub data: Vec<CountByItem>,
}

impl MetricResponse {
    /// Wraps grouped counts under a metric name.
    pub fn new(metric_name: impl Into<String>, data: Vec<CountByItem>) -> Self {
        Self {
            metric_name: metric_name.into(),
            data,
        }
    }
}

/// Counts rows of `table` grouped by `column`.
///
/// - An absent or empty table yields no entries.
/// - A column the source never provided yields a single `("N/A", rows)` entry.
/// - Null values are counted under `"N/A"`.
///
/// Entries are ordered by label so repeated calls give identical output.
#[must_use]
pub fn count_by<R: Record>(table: Option<&Table<R>>, column: &str) -> Vec<CountByItem> {
    let Some(table) = table.filter(|t| !t.is_empty()) else {
        return Vec::new();
    };

    match table.column(column) {
        ColumnPresence::Missing => vec![CountByItem::new(NOT_AVAILABLE, table.len())],
        ColumnPresence::Present => {
            let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
            for row in table.rows() {
                let label = row.category(column).unwrap_or(NOT_AVAILABLE);
                *groups.entry(label).or_default() += 1;
            }
            groups
                .into_iter()
                .map(|(label, count)| CountByItem::new(label, count))
                .collect()
        }
    }
}

/// Hardware items per type.
pub async fn hardware_counts_by_type(cache: &TableCache) -> Vec<CountByItem> {
    count_by(cache.hardware().await.as_deref(), "type")
}

/// Employees per department.
pub async fn employee_counts_by_department(cache: &TableCache) -> Vec<CountByItem> {
    count_by(cache.employees().await.as_deref(), "department")
}

/// Licenses per software product.
pub async fn license_counts_by_software(cache: &TableCache) -> Vec<CountByItem> {
    count_by(cache.licenses().await.as_deref(), "software_name")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::records::{Employee, Hardware};
    use crate::core::source::DataSource;
    use crate::errors::Result;
    use crate::test_utils::{csv_dir, employee, hardware, write_csv};

    fn total(entries: &[CountByItem]) -> usize {
        entries.iter().map(|e| e.count).sum()
    }

    #[test]
    fn test_absent_table_yields_nothing() {
        assert!(count_by::<Hardware>(None, "type").is_empty());
    }

    #[test]
    fn test_empty_table_yields_nothing() {
        let table: Table<Hardware> = Table::complete(Vec::new());
        assert!(count_by(Some(&table), "type").is_empty());

        // Even when the column is missing.
        let table: Table<Hardware> = Table::new(Vec::new(), ["id"]);
        assert!(count_by(Some(&table), "type").is_empty());
    }

    #[test]
    fn test_nulls_are_counted_as_not_available() {
        let table = Table::complete(vec![
            hardware(1, Some("Laptop"), None),
            hardware(2, Some("Laptop"), None),
            hardware(3, None, None),
        ]);

        let counts = count_by(Some(&table), "type");
        assert_eq!(
            counts,
            vec![CountByItem::new("Laptop", 2), CountByItem::new("N/A", 1)]
        );
    }

    #[test]
    fn test_missing_column_yields_single_entry() {
        let table = Table::new(
            vec![
                hardware(1, None, None),
                hardware(2, None, None),
                hardware(3, None, None),
            ],
            ["id", "brand"],
        );

        assert_eq!(
            count_by(Some(&table), "type"),
            vec![CountByItem::new("N/A", 3)]
        );
    }

    #[test]
    fn test_counts_sum_to_row_count() {
        let rows = vec![
            employee(1, "Ana", Some("IT")),
            employee(2, "Bea", Some("Finance")),
            employee(3, "Carlos", None),
            employee(4, "Dana", Some("IT")),
            employee(5, "Eva", Some("HR")),
            employee(6, "Fer", None),
        ];
        let table = Table::complete(rows);

        let counts = count_by(Some(&table), "department");
        assert_eq!(total(&counts), table.len());
        assert_eq!(counts.len(), 4);
    }

    #[test]
    fn test_order_is_deterministic() {
        let table = Table::complete(vec![
            hardware(1, Some("Printer"), None),
            hardware(2, Some("Laptop"), None),
            hardware(3, Some("Monitor"), None),
            hardware(4, Some("Laptop"), None),
        ]);

        let first = count_by(Some(&table), "type");
        let second = count_by(Some(&table), "type");
        assert_eq!(first, second);

        let labels: Vec<&str> = first.iter().map(|e| e.item.as_str()).collect();
        assert_eq!(labels, vec!["Laptop", "Monitor", "Printer"]);
    }

    #[test]
    fn test_unknown_column_is_missing() {
        let table: Table<Employee> = Table::complete(vec![employee(1, "Ana", Some("IT"))]);
        assert_eq!(
            count_by(Some(&table), "salary_band"),
            vec![CountByItem::new("N/A", 1)]
        );
    }

    #[tokio::test]
    async fn test_instantiations_read_their_tables() -> Result<()> {
        let dir = csv_dir()?;
        write_csv(
            dir.path(),
            "employees",
            "id,name,department\n1,Ana,IT\n2,Bea,\n3,Carlos,IT\n",
        )?;
        write_csv(
            dir.path(),
            "licenses",
            "id,software_name,license_key\n1,Office,K1\n2,Office,K2\n3,Slack,K3\n",
        )?;
        let cache = TableCache::new(DataSource::CsvDirectory(dir.path().to_path_buf()));

        assert_eq!(
            employee_counts_by_department(&cache).await,
            vec![CountByItem::new("IT", 2), CountByItem::new("N/A", 1)]
        );
        assert_eq!(
            license_counts_by_software(&cache).await,
            vec![CountByItem::new("Office", 2), CountByItem::new("Slack", 1)]
        );
        // No hardware.csv in the directory.
        assert!(hardware_counts_by_type(&cache).await.is_empty());
        Ok(())
    }

    #[test]
    fn test_metric_response_serializes_expected_shape() -> Result<()> {
        let response = MetricResponse::new(HARDWARE_BY_TYPE, vec![CountByItem::new("Laptop", 2)]);
        let json = serde_json::to_value(&response)
            .map_err(|e| crate::errors::Error::render(e.to_string()))?;
        assert_eq!(
            json,
            serde_json::json!({
                "metric_name": "Hardware Count by Type",
                "data": [{"item": "Laptop", "count": 2}]
            })
        );
        Ok(())
    }
}
