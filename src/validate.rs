//! Column classification and selection checks.
//!
//! A column is numeric when it has at least one value and every non-missing
//! cell is a number. Everything else, including fully empty columns, is
//! categorical since it cannot be summed.

use crate::data::{Cell, Column, Dataset};
use crate::error::Result;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric)
    }
}

/// Column name to kind, in dataset column order.
pub type ColumnClassification = IndexMap<String, ColumnKind>;

/// Outcome of checking a (label, value) column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationResult {
    Ok,
    /// The value column cannot be summed. Chart generation must stop.
    ValueColumnNotNumeric,
    /// Grouping by a numeric column is allowed but usually unintended.
    LabelColumnIsNumeric,
}

impl ValidationResult {
    /// True when aggregation may proceed.
    pub fn allows_aggregation(&self) -> bool {
        !matches!(self, ValidationResult::ValueColumnNotNumeric)
    }
}

pub fn classify_column(column: &Column) -> ColumnKind {
    let mut seen_value = false;
    for cell in &column.cells {
        match cell {
            Cell::Number(_) => seen_value = true,
            Cell::Text(_) => return ColumnKind::Categorical,
            Cell::Missing => {}
        }
    }
    if seen_value {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

pub fn classify(dataset: &Dataset) -> ColumnClassification {
    dataset
        .columns()
        .iter()
        .map(|c| (c.name.clone(), classify_column(c)))
        .collect()
}

/// Check a label/value selection against the dataset.
///
/// The value-column check wins over the label-column check. Selecting the
/// same column twice is only valid when that column is numeric. A dataset
/// with no rows always passes: it aggregates to an empty chart.
pub fn validate_selection(
    dataset: &Dataset,
    label_column: &str,
    value_column: &str,
) -> Result<ValidationResult> {
    let label_kind = classify_column(dataset.require_column(label_column)?);
    let value_kind = classify_column(dataset.require_column(value_column)?);

    if dataset.is_empty() {
        return Ok(ValidationResult::Ok);
    }

    if !value_kind.is_numeric() {
        return Ok(ValidationResult::ValueColumnNotNumeric);
    }
    if label_kind.is_numeric() {
        return Ok(ValidationResult::LabelColumnIsNumeric);
    }
    Ok(ValidationResult::Ok)
}

/// Categorical columns, suggested when a numeric label column was picked.
pub fn categorical_alternatives(classification: &ColumnClassification) -> Vec<String> {
    classification
        .iter()
        .filter(|(_, kind)| !kind.is_numeric())
        .map(|(name, _)| name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChartError;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Column::new(
                "region",
                vec![Cell::Text("N".into()), Cell::Text("S".into()), Cell::Missing],
            ),
            Column::new(
                "sales",
                vec![Cell::Number(1.0), Cell::Missing, Cell::Number(3.0)],
            ),
            Column::new("year", vec![Cell::Number(2020.0), Cell::Number(2021.0), Cell::Number(2020.0)]),
            Column::new("mixed", vec![Cell::Number(1.0), Cell::Text("x".into()), Cell::Number(2.0)]),
            Column::new("empty", vec![Cell::Missing, Cell::Missing, Cell::Missing]),
        ])
    }

    #[test]
    fn test_classify_every_column() {
        let ds = dataset();
        let classes = classify(&ds);
        assert_eq!(classes.len(), ds.columns().len());
        assert_eq!(classes["region"], ColumnKind::Categorical);
        assert_eq!(classes["sales"], ColumnKind::Numeric);
        assert_eq!(classes["year"], ColumnKind::Numeric);
        assert_eq!(classes["mixed"], ColumnKind::Categorical);
        assert_eq!(classes["empty"], ColumnKind::Categorical);
    }

    #[test]
    fn test_classify_preserves_column_order() {
        let classes = classify(&dataset());
        let names: Vec<&str> = classes.keys().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["region", "sales", "year", "mixed", "empty"]);
    }

    #[test]
    fn test_validate_ok() {
        let ds = dataset();
        assert_eq!(validate_selection(&ds, "region", "sales").unwrap(), ValidationResult::Ok);
    }

    #[test]
    fn test_validate_value_not_numeric() {
        let ds = dataset();
        let result = validate_selection(&ds, "region", "mixed").unwrap();
        assert_eq!(result, ValidationResult::ValueColumnNotNumeric);
        assert!(!result.allows_aggregation());
    }

    #[test]
    fn test_validate_label_numeric_is_warning() {
        let ds = dataset();
        let result = validate_selection(&ds, "year", "sales").unwrap();
        assert_eq!(result, ValidationResult::LabelColumnIsNumeric);
        assert!(result.allows_aggregation());
    }

    #[test]
    fn test_validate_value_check_takes_precedence() {
        let ds = dataset();
        assert_eq!(
            validate_selection(&ds, "year", "region").unwrap(),
            ValidationResult::ValueColumnNotNumeric
        );
    }

    #[test]
    fn test_validate_same_column() {
        let ds = dataset();
        assert_eq!(
            validate_selection(&ds, "sales", "sales").unwrap(),
            ValidationResult::LabelColumnIsNumeric
        );
        assert_eq!(
            validate_selection(&ds, "region", "region").unwrap(),
            ValidationResult::ValueColumnNotNumeric
        );
    }

    #[test]
    fn test_validate_column_not_found() {
        let ds = dataset();
        let err = validate_selection(&ds, "nope", "sales").unwrap_err();
        assert!(matches!(err, ChartError::ColumnNotFound(ref c) if c == "nope"));
    }

    #[test]
    fn test_validate_zero_rows_passes() {
        let ds = dataset().head(0);
        assert_eq!(classify(&ds)["sales"], ColumnKind::Categorical);
        assert_eq!(validate_selection(&ds, "region", "sales").unwrap(), ValidationResult::Ok);
        assert!(validate_selection(&ds, "region", "missing").is_err());
    }

    #[test]
    fn test_categorical_alternatives() {
        let classes = classify(&dataset());
        assert_eq!(categorical_alternatives(&classes), vec!["region", "mixed", "empty"]);
    }
}
