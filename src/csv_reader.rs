// Dataset loading from delimited text and JSON files

use crate::data::Dataset;
use crate::error::{ChartError, Result};
use log::{debug, info};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// File types the loader recognises by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Csv,
    Json,
    Spreadsheet,
}

impl InputKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "txt" => Ok(InputKind::Csv),
            "json" => Ok(InputKind::Json),
            "xlsx" | "xls" => Ok(InputKind::Spreadsheet),
            "" => Err(ChartError::UnsupportedFormat(format!(
                "'{}' has no file extension",
                path.display()
            ))),
            other => Err(ChartError::UnsupportedFormat(format!(".{}", other))),
        }
    }
}

/// Read CSV data (with a header row) from any reader
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(ChartError::EmptyInput("CSV has no header row".to_string()));
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    debug!("Read CSV with {} columns and {} rows", headers.len(), rows.len());
    Ok(Dataset::from_rows(headers, rows))
}

/// Read CSV data from stdin
pub fn read_csv_from_stdin() -> Result<Dataset> {
    read_csv(io::stdin().lock())
}

/// Load a dataset from a file, dispatching on its extension.
/// Spreadsheet files are recognised but not decoded.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let kind = InputKind::from_path(path)?;
    let open = |p: &Path| {
        File::open(p).map_err(|source| ChartError::Io {
            path: p.to_path_buf(),
            source,
        })
    };

    let dataset = match kind {
        InputKind::Csv => read_csv(open(path)?)?,
        InputKind::Json => {
            let value: serde_json::Value = serde_json::from_reader(open(path)?)?;
            Dataset::from_json(&value)?
        }
        InputKind::Spreadsheet => {
            return Err(ChartError::UnsupportedFormat(format!(
                "spreadsheet input '{}' must be exported to CSV first",
                path.display()
            )));
        }
    };

    info!(
        "Loaded '{}': {} columns, {} rows",
        path.display(),
        dataset.columns().len(),
        dataset.row_count()
    );
    Ok(dataset)
}
