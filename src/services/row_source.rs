use std::io::Read;
use std::path::Path;

use log::debug;
use serde_json::Value;
use thiserror::Error;

use crate::domain::period_row::RawRow;

#[derive(Error, Debug)]
pub enum RowSourceError {
    #[error("failed to read rows file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse csv rows: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to parse json rows: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads delimited text with a header row into raw rows. Each cell is kept as
/// a string; rows shorter than the header simply lack the trailing keys.
pub fn read_raw_rows_from_csv<R: Read>(reader: R) -> Result<Vec<RawRow>, RowSourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let mut row = RawRow::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            row.insert(header.clone(), Value::String(cell.to_string()));
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Extracts raw rows from an API payload: a bare array, or an object holding
/// the array under `rows` or `data`. Non-object entries are skipped.
pub fn raw_rows_from_json(payload: &Value) -> Vec<RawRow> {
    let array = match payload {
        Value::Array(items) => Some(items),
        Value::Object(map) => ["rows", "data"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array)),
        _ => None,
    };

    array
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .collect()
        })
        .unwrap_or_default()
}

pub fn read_raw_rows_from_json_str(text: &str) -> Result<Vec<RawRow>, RowSourceError> {
    let payload: Value = serde_json::from_str(text)?;
    Ok(raw_rows_from_json(&payload))
}

/// Loads raw rows from a `.csv` file, or from a JSON file for any other extension.
pub fn load_raw_rows_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<RawRow>, RowSourceError> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let rows = if is_csv {
        read_raw_rows_from_csv(std::fs::File::open(path)?)?
    } else {
        read_raw_rows_from_json_str(&std::fs::read_to_string(path)?)?
    };
    debug!("Loaded {} raw rows from {:?}", rows.len(), path);
    Ok(rows)
}
