use crate::error::{ChartError, Result};
use serde_json::Value;

/// Label used for the bucket that collects rows with no label value.
pub const MISSING_LABEL: &str = "(missing)";

/// A single typed cell of a dataset column.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Infer a cell from raw text: blank and NA markers are missing,
    /// anything that parses as a finite float is numeric, the rest is text.
    /// `inf` and overflowing literals such as `1e400` stay text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || is_na_marker(trimmed) {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(trimmed.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Text used when the cell is shown as a category label.
    /// Whole numbers drop the trailing `.0`; `-0` reads as `0`.
    pub fn label(&self) -> String {
        match self {
            Cell::Number(n) => {
                let n = if *n == 0.0 { 0.0 } else { *n };
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    n.to_string()
                }
            }
            Cell::Text(s) => s.clone(),
            Cell::Missing => MISSING_LABEL.to_string(),
        }
    }
}

fn is_na_marker(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "na" | "n/a" | "nan" | "null" | "none" | "#n/a"
    )
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }
}

/// In-memory tabular data: ordered columns of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Build a dataset from columns. Shorter columns are padded with
    /// missing cells so every column has the same number of rows.
    pub fn new(mut columns: Vec<Column>) -> Self {
        let row_count = columns.iter().map(|c| c.cells.len()).max().unwrap_or(0);
        for column in &mut columns {
            column.cells.resize(row_count, Cell::Missing);
        }
        Self { columns, row_count }
    }

    /// Build a dataset from a header row and raw string rows
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let columns = headers
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let cells = rows
                    .iter()
                    .map(|row| row.get(idx).map(|s| Cell::parse(s)).unwrap_or(Cell::Missing))
                    .collect();
                Column::new(name, cells)
            })
            .collect();
        Self::new(columns)
    }

    /// Create a Dataset from a JSON array of objects.
    /// Headers are taken from the first object.
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value.as_array().ok_or_else(|| {
            ChartError::EmptyInput("input data must be a JSON array of objects".to_string())
        })?;

        let first_obj = array
            .first()
            .and_then(Value::as_object)
            .ok_or_else(|| ChartError::EmptyInput("JSON array has no objects".to_string()))?;

        let headers: Vec<String> = first_obj.keys().cloned().collect();
        let mut columns: Vec<Column> = headers
            .iter()
            .map(|h| Column::new(h.clone(), Vec::with_capacity(array.len())))
            .collect();

        for item in array {
            let obj = item.as_object().ok_or_else(|| {
                ChartError::EmptyInput("items in array must be objects".to_string())
            })?;
            for column in &mut columns {
                let cell = match obj.get(&column.name) {
                    Some(Value::Number(n)) => match n.as_f64() {
                        Some(f) if f.is_finite() => Cell::Number(f),
                        Some(_) => Cell::Text(n.to_string()),
                        None => Cell::Missing,
                    },
                    Some(Value::String(s)) => Cell::parse(s),
                    Some(Value::Bool(b)) => Cell::Text(b.to_string()),
                    Some(Value::Null) | None => Cell::Missing,
                    Some(other) => Cell::Text(other.to_string()),
                };
                column.cells.push(cell);
            }
        }

        Ok(Self::new(columns))
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in file order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Look up a column, failing with `ColumnNotFound` when absent.
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| ChartError::ColumnNotFound(name.to_string()))
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// First `n` rows, for previews.
    pub fn head(&self, n: usize) -> Dataset {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), c.cells.iter().take(n).cloned().collect()))
            .collect();
        Dataset::new(columns)
    }
}
