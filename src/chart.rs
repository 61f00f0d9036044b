use crate::aggregate::AggregationRow;
use crate::error::{ChartError, Result};
use crate::format::format_value;
use crate::palette::Color;
use serde::Serialize;

/// Headroom above the tallest bar, leaving space for its value label.
pub const Y_HEADROOM: f64 = 1.15;

/// A single bar: category label, total, fill color and the text drawn above it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: Color,
    pub display_text: String,
}

/// Renderer-agnostic description of a single-series bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub bars: Vec<Bar>,
    pub title: String,
    pub x_axis_label: String,
    pub y_axis_label: String,
    /// `max(total) * 1.15`, or 0 when there are no bars.
    pub y_axis_max: f64,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Compose aggregated rows and their colors into a [`ChartSpec`].
///
/// Fails with `ColorCountMismatch` unless there is exactly one color per row.
pub fn build(
    rows: &[AggregationRow],
    colors: &[Color],
    title: &str,
    x_label: &str,
    y_label: &str,
) -> Result<ChartSpec> {
    if rows.len() != colors.len() {
        return Err(ChartError::ColorCountMismatch {
            bars: rows.len(),
            colors: colors.len(),
        });
    }

    let bars: Vec<Bar> = rows
        .iter()
        .zip(colors)
        .map(|(row, &color)| Bar {
            label: row.label.clone(),
            value: row.total,
            color,
            display_text: format_value(row.total),
        })
        .collect();

    let y_axis_max = rows
        .iter()
        .map(|r| r.total)
        .reduce(f64::max)
        .map(|max| max * Y_HEADROOM)
        .unwrap_or(0.0);

    Ok(ChartSpec {
        bars,
        title: title.to_string(),
        x_axis_label: x_label.to_string(),
        y_axis_label: y_label.to_string(),
        y_axis_max,
    })
}
