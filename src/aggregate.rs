use crate::data::{Cell, Dataset, MISSING_LABEL};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Order applied to aggregated rows by total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Descending,
    Ascending,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "descending" | "desc" => Ok(SortOrder::Descending),
            "ascending" | "asc" => Ok(SortOrder::Ascending),
            _ => Err(format!("unknown sort order '{}' (expected descending or ascending)", s)),
        }
    }
}

/// One bar's worth of data: a distinct label and the sum of its values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationRow {
    pub label: String,
    pub total: f64,
}

/// Grouping key: missing labels never share a group with a real value,
/// even one that reads as [`MISSING_LABEL`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Missing,
    Value(String),
}

impl GroupKey {
    fn of(cell: &Cell) -> Self {
        match cell {
            Cell::Missing => GroupKey::Missing,
            other => GroupKey::Value(other.label()),
        }
    }

    fn display(&self) -> String {
        match self {
            GroupKey::Missing => MISSING_LABEL.to_string(),
            GroupKey::Value(s) if s == MISSING_LABEL => format!("\"{}\"", s),
            GroupKey::Value(s) => s.clone(),
        }
    }
}

/// Group rows by `label_column` and sum `value_column` per group.
///
/// Missing or non-numeric value cells count as 0. Rows with a missing label
/// are collected under [`MISSING_LABEL`]; a literal `(missing)` text label
/// keeps its own group and is shown quoted. Groups are emitted in
/// first-appearance order and then stably sorted by total, so ties keep that
/// order.
pub fn aggregate(
    dataset: &Dataset,
    label_column: &str,
    value_column: &str,
    sort_order: SortOrder,
) -> Result<Vec<AggregationRow>> {
    let labels = dataset.require_column(label_column)?;
    let values = dataset.require_column(value_column)?;

    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut rows: Vec<AggregationRow> = Vec::new();

    for (label_cell, value_cell) in labels.cells.iter().zip(&values.cells) {
        let key = GroupKey::of(label_cell);
        let value = value_cell.as_number().unwrap_or(0.0);

        match index.get(&key) {
            Some(&idx) => rows[idx].total += value,
            None => {
                rows.push(AggregationRow { label: key.display(), total: value });
                index.insert(key, rows.len() - 1);
            }
        }
    }

    // sort_by is stable
    match sort_order {
        SortOrder::Descending => rows.sort_by(|a, b| b.total.total_cmp(&a.total)),
        SortOrder::Ascending => rows.sort_by(|a, b| a.total.total_cmp(&b.total)),
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;
    use crate::error::ChartError;

    fn make_dataset(rows: &[(&str, f64)]) -> Dataset {
        Dataset::new(vec![
            Column::new("label", rows.iter().map(|(l, _)| Cell::Text(l.to_string())).collect()),
            Column::new("value", rows.iter().map(|(_, v)| Cell::Number(*v)).collect()),
        ])
    }

    fn pairs(rows: &[AggregationRow]) -> Vec<(&str, f64)> {
        rows.iter().map(|r| (r.label.as_str(), r.total)).collect()
    }

    #[test]
    fn test_aggregate_sums_and_sorts_descending() {
        let ds = make_dataset(&[("A", 10.0), ("B", 5.0), ("A", 5.0)]);
        let rows = aggregate(&ds, "label", "value", SortOrder::Descending).unwrap();
        assert_eq!(pairs(&rows), vec![("A", 15.0), ("B", 5.0)]);
    }

    #[test]
    fn test_aggregate_ascending() {
        let ds = make_dataset(&[("A", 10.0), ("B", 5.0), ("C", 7.0)]);
        let rows = aggregate(&ds, "label", "value", SortOrder::Ascending).unwrap();
        assert_eq!(pairs(&rows), vec![("B", 5.0), ("C", 7.0), ("A", 10.0)]);
    }

    #[test]
    fn test_aggregate_ties_keep_first_appearance() {
        let ds = make_dataset(&[("X", 3.0), ("Y", 5.0), ("Z", 3.0), ("W", 3.0)]);
        let desc = aggregate(&ds, "label", "value", SortOrder::Descending).unwrap();
        assert_eq!(pairs(&desc), vec![("Y", 5.0), ("X", 3.0), ("Z", 3.0), ("W", 3.0)]);
        let asc = aggregate(&ds, "label", "value", SortOrder::Ascending).unwrap();
        assert_eq!(pairs(&asc), vec![("X", 3.0), ("Z", 3.0), ("W", 3.0), ("Y", 5.0)]);
    }

    #[test]
    fn test_aggregate_negative_and_zero() {
        let ds = make_dataset(&[("A", -4.0), ("B", 0.0), ("A", 1.0)]);
        let rows = aggregate(&ds, "label", "value", SortOrder::Descending).unwrap();
        assert_eq!(pairs(&rows), vec![("B", 0.0), ("A", -3.0)]);
    }

    #[test]
    fn test_aggregate_missing_values_count_as_zero() {
        let ds = Dataset::new(vec![
            Column::new("label", vec![Cell::Text("A".into()), Cell::Text("A".into()), Cell::Text("B".into())]),
            Column::new("value", vec![Cell::Number(2.0), Cell::Missing, Cell::Text("oops".into())]),
        ]);
        let rows = aggregate(&ds, "label", "value", SortOrder::Descending).unwrap();
        assert_eq!(pairs(&rows), vec![("A", 2.0), ("B", 0.0)]);
    }

    #[test]
    fn test_aggregate_missing_labels_grouped() {
        let ds = Dataset::new(vec![
            Column::new("label", vec![Cell::Missing, Cell::Text("A".into()), Cell::Missing]),
            Column::new("value", vec![Cell::Number(1.0), Cell::Number(1.0), Cell::Number(4.0)]),
        ]);
        let rows = aggregate(&ds, "label", "value", SortOrder::Descending).unwrap();
        assert_eq!(pairs(&rows), vec![(MISSING_LABEL, 5.0), ("A", 1.0)]);
    }

    #[test]
    fn test_aggregate_literal_missing_text_keeps_own_group() {
        let ds = Dataset::new(vec![
            Column::new("label", vec![Cell::Text(MISSING_LABEL.into()), Cell::Missing]),
            Column::new("value", vec![Cell::Number(1.0), Cell::Number(2.0)]),
        ]);
        let rows = aggregate(&ds, "label", "value", SortOrder::Descending).unwrap();
        assert_eq!(pairs(&rows), vec![(MISSING_LABEL, 2.0), ("\"(missing)\"", 1.0)]);
    }

    #[test]
    fn test_aggregate_negative_zero_label_joins_zero() {
        let ds = Dataset::new(vec![
            Column::new("label", vec![Cell::Number(-0.0), Cell::Number(0.0), Cell::Number(-0.0)]),
            Column::new("value", vec![Cell::Number(1.0), Cell::Number(1.0), Cell::Number(1.0)]),
        ]);
        let rows = aggregate(&ds, "label", "value", SortOrder::Descending).unwrap();
        assert_eq!(pairs(&rows), vec![("0", 3.0)]);
    }

    #[test]
    fn test_aggregate_self_grouping() {
        let ds = Dataset::new(vec![Column::new(
            "n",
            vec![Cell::Number(2.0), Cell::Number(3.0), Cell::Number(2.0), Cell::Number(2.0)],
        )]);
        let rows = aggregate(&ds, "n", "n", SortOrder::Descending).unwrap();
        assert_eq!(pairs(&rows), vec![("2", 6.0), ("3", 3.0)]);
    }

    #[test]
    fn test_aggregate_empty_dataset() {
        let ds = make_dataset(&[]);
        let rows = aggregate(&ds, "label", "value", SortOrder::Descending).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_aggregate_column_not_found() {
        let ds = make_dataset(&[("A", 1.0)]);
        let err = aggregate(&ds, "label", "nope", SortOrder::Descending).unwrap_err();
        assert!(matches!(err, ChartError::ColumnNotFound(ref c) if c == "nope"));
    }

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Descending);
        assert_eq!("Ascending".parse::<SortOrder>().unwrap(), SortOrder::Ascending);
        assert!("sideways".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::default(), SortOrder::Descending);
    }
}
