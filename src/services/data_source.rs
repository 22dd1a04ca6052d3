use std::path::PathBuf;

use thiserror::Error;

use crate::domain::period_row::RawRow;
use crate::services::row_source::{RowSourceError, load_raw_rows_from_file};

#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("resource not found")]
    NotFound,
    #[error("connection error")]
    Connection,
    #[error("parse error")]
    Parse,
    #[error("unauthorized")]
    Unauthorized,
    #[error("server error ({0})")]
    Status(u16),
    #[error(transparent)]
    Rows(#[from] RowSourceError),
    #[error("{0}")]
    Other(String),
}

/// Describes an interface for retrieving raw period rows.
pub trait RowSupplier {
    /// Name recorded in reports as the origin of the rows.
    fn source_name(&self) -> String;

    fn fetch_raw_rows(&self) -> Result<Vec<RawRow>, DataSourceError>;
}

/// Rows from a local CSV or JSON file.
pub struct FileRowSource {
    path: PathBuf,
}

impl FileRowSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RowSupplier for FileRowSource {
    fn source_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn fetch_raw_rows(&self) -> Result<Vec<RawRow>, DataSourceError> {
        Ok(load_raw_rows_from_file(&self.path)?)
    }
}
