//! Report operations exposed to the request layer.

use crate::{
    core::{
        acta::{ActaData, acta_filename, build_acta},
        aggregation::{
            EMPLOYEES_BY_DEPARTMENT, HARDWARE_BY_TYPE, LICENSES_BY_SOFTWARE, MetricResponse,
            employee_counts_by_department, hardware_counts_by_type, license_counts_by_software,
        },
        blocking,
        cache::TableCache,
        chart::{ChartRenderer, HARDWARE_TYPE_CHART},
        export::{build_sheets, export_filename, write_workbook},
        source::DataSource,
    },
    errors::{Error, Result},
};
use chrono::Local;
use tracing::{debug, info};

/// A generated file together with its download name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Suggested file name
    pub filename: String,
    /// File contents
    pub bytes: Vec<u8>,
}

/// Aggregations, charts and documents over one table cache.
#[derive(Debug)]
pub struct ReportService {
    cache: TableCache,
    charts: ChartRenderer,
}

impl ReportService {
    /// Creates a service reading from `source`.
    #[must_use]
    pub fn new(source: DataSource, charts: ChartRenderer) -> Self {
        Self {
            cache: TableCache::new(source),
            charts,
        }
    }

    /// Hardware counts grouped by type.
    pub async fn hardware_by_type(&self) -> MetricResponse {
        MetricResponse::new(HARDWARE_BY_TYPE, hardware_counts_by_type(&self.cache).await)
    }

    /// Employee counts grouped by department.
    pub async fn employees_by_department(&self) -> MetricResponse {
        MetricResponse::new(
            EMPLOYEES_BY_DEPARTMENT,
            employee_counts_by_department(&self.cache).await,
        )
    }

    /// License counts grouped by software name.
    pub async fn licenses_by_software(&self) -> MetricResponse {
        MetricResponse::new(
            LICENSES_BY_SOFTWARE,
            license_counts_by_software(&self.cache).await,
        )
    }

    /// PNG bar chart of hardware counts by type.
    pub async fn hardware_type_chart(&self) -> Result<Vec<u8>> {
        let entries = hardware_counts_by_type(&self.cache).await;
        let charts = self.charts.clone();
        debug!(bars = entries.len(), "Rendering hardware type chart");

        blocking("chart", move || {
            charts.render_bar_chart(&HARDWARE_TYPE_CHART, &entries)
        })
        .await
    }

    /// The assignment acta for `employee_id` as a `.docx`.
    ///
    /// Fails with [`Error::NotFound`] when the employee does not exist.
    pub async fn employee_acta(&self, employee_id: i64) -> Result<Attachment> {
        let data = ActaData::collect(&self.cache, employee_id)
            .await
            .ok_or(Error::NotFound {
                entity: "Employee",
                id: employee_id,
            })?;
        let generated_at = Local::now().naive_local();

        let bytes = blocking("acta", move || build_acta(&data, generated_at).to_docx()).await?;
        info!(employee_id, size = bytes.len(), "Generated acta");

        Ok(Attachment {
            filename: acta_filename(employee_id),
            bytes,
        })
    }

    /// The full four-sheet `.xlsx` export.
    pub async fn full_export(&self) -> Result<Attachment> {
        let employees = self.cache.employees().await;
        let hardware = self.cache.hardware().await;
        let licenses = self.cache.licenses().await;
        let web_accesses = self.cache.web_accesses().await;
        let generated_at = Local::now().naive_local();

        let bytes = blocking("export", move || {
            let sheets = build_sheets(
                employees.as_deref(),
                hardware.as_deref(),
                licenses.as_deref(),
                web_accesses.as_deref(),
            );
            write_workbook(&sheets)
        })
        .await?;
        info!(size = bytes.len(), "Generated full export");

        Ok(Attachment {
            filename: export_filename(generated_at),
            bytes,
        })
    }
}
