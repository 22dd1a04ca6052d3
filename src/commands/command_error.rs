use std::io;

use thiserror::Error;

use crate::domain::location::OnboardingError;
use crate::services::data_source::DataSourceError;
use crate::services::kpi_plot::KpiPlotError;
use crate::services::report_api::ApiConfigError;
use crate::services::row_source::RowSourceError;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Rows(#[from] RowSourceError),
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
    #[error(transparent)]
    Config(#[from] ApiConfigError),
    #[error(transparent)]
    Onboarding(#[from] OnboardingError),
    #[error(transparent)]
    Plot(#[from] KpiPlotError),
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: io::Error },
}

impl CommandError {
    pub fn write(path: &str, source: io::Error) -> Self {
        CommandError::Write {
            path: path.to_string(),
            source,
        }
    }
}
