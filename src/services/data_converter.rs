use log::{info, warn};

use crate::domain::kpi::KpiReport;
use crate::domain::period_row::PeriodRow;
use crate::services::data_source::{DataSourceError, RowSupplier};
use crate::services::kpi_engine::{compute_kpis, period_labels};
use crate::services::normalizer::normalize_all;

/// Turns the rows of a supplier into a KPI report.
pub struct DataConverter {
    supplier: Box<dyn RowSupplier>,
}

impl DataConverter {
    pub fn new(supplier: Box<dyn RowSupplier>) -> Self {
        Self { supplier }
    }

    pub fn get_period_rows(&self) -> Result<Vec<PeriodRow>, DataSourceError> {
        let raw_rows = self.supplier.fetch_raw_rows()?;
        if raw_rows.is_empty() {
            warn!("No rows received from {}", self.supplier.source_name());
        }
        Ok(normalize_all(&raw_rows))
    }

    pub fn get_kpi_report(&self) -> Result<KpiReport, DataSourceError> {
        self.get_rows_and_report().map(|(_, report)| report)
    }

    /// The normalized rows together with the report computed from them.
    pub fn get_rows_and_report(&self) -> Result<(Vec<PeriodRow>, KpiReport), DataSourceError> {
        let rows = self.get_period_rows()?;
        info!(
            "Computing KPIs for {} periods from {}",
            rows.len(),
            self.supplier.source_name()
        );
        let report = build_kpi_report(self.supplier.source_name(), &rows);
        Ok((rows, report))
    }
}

pub fn build_kpi_report(source: String, rows: &[PeriodRow]) -> KpiReport {
    KpiReport {
        source,
        periods: period_labels(rows),
        kpis: compute_kpis(rows),
    }
}
