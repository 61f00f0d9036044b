// Request-driven pipeline: validate -> aggregate -> colors -> chart spec

use crate::aggregate::{aggregate, AggregationRow, SortOrder};
use crate::chart::{self, ChartSpec};
use crate::data::Dataset;
use crate::error::{ChartError, Result};
use crate::palette::{assign_colors, ColorMode};
use crate::validate::{categorical_alternatives, classify, validate_selection, ValidationResult};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Everything a caller chooses for one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub label_column: String,
    pub value_column: String,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default)]
    pub color_mode: ColorMode,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub x_label: Option<String>,
    #[serde(default)]
    pub y_label: Option<String>,
}

impl ChartRequest {
    pub fn new(label_column: impl Into<String>, value_column: impl Into<String>) -> Self {
        Self {
            label_column: label_column.into(),
            value_column: value_column.into(),
            sort_order: SortOrder::default(),
            color_mode: ColorMode::default(),
            title: None,
            x_label: None,
            y_label: None,
        }
    }

    /// Label from the first column and values from the second (or the
    /// first again when the dataset has a single column).
    pub fn with_default_columns(dataset: &Dataset) -> Result<Self> {
        let names = dataset.column_names();
        let label = names
            .first()
            .ok_or_else(|| ChartError::EmptyInput("dataset has no columns".to_string()))?;
        let value = names.get(1).unwrap_or(label);
        Ok(Self::new(*label, *value))
    }

    pub fn title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("Distribution of {}", self.value_column))
    }

    pub fn x_label(&self) -> String {
        self.x_label.clone().unwrap_or_else(|| self.label_column.clone())
    }

    pub fn y_label(&self) -> String {
        self.y_label.clone().unwrap_or_else(|| self.value_column.clone())
    }

    /// File name for the exported PNG, e.g. `total_sales_chart.png`.
    pub fn export_file_name(&self) -> String {
        format!("{}_chart.png", self.value_column.replace(' ', "_").to_lowercase())
    }
}

/// Non-fatal findings surfaced alongside a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    LabelColumnIsNumeric {
        column: String,
        alternatives: Vec<String>,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::LabelColumnIsNumeric { column, alternatives } => {
                write!(f, "Label column '{}' is numeric", column)?;
                if alternatives.is_empty() {
                    write!(f, "; no categorical columns are available")
                } else {
                    write!(f, "; consider a categorical column: {}", alternatives.join(", "))
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOutput {
    pub spec: ChartSpec,
    pub aggregation: Vec<AggregationRow>,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineOutcome {
    Chart(ChartOutput),
    /// The value column cannot be summed; no chart was produced.
    Blocked { column: String, message: String },
}

impl PipelineOutcome {
    pub fn chart(&self) -> Option<&ChartOutput> {
        match self {
            PipelineOutcome::Chart(output) => Some(output),
            PipelineOutcome::Blocked { .. } => None,
        }
    }
}

/// Run the full pipeline for one request.
pub fn run(dataset: &Dataset, request: &ChartRequest) -> Result<PipelineOutcome> {
    run_with_aggregator(dataset, request, aggregate)
}

/// Same as [`run`] with the aggregation step supplied by the caller.
pub fn run_with_aggregator<F>(
    dataset: &Dataset,
    request: &ChartRequest,
    aggregator: F,
) -> Result<PipelineOutcome>
where
    F: FnOnce(&Dataset, &str, &str, SortOrder) -> Result<Vec<AggregationRow>>,
{
    let label = request.label_column.as_str();
    let value = request.value_column.as_str();

    let mut warnings = Vec::new();
    match validate_selection(dataset, label, value)? {
        ValidationResult::ValueColumnNotNumeric => {
            let message = format!(
                "Column '{}' is not numeric. Please choose a column with numbers.",
                value
            );
            warn!("{}", message);
            return Ok(PipelineOutcome::Blocked {
                column: value.to_string(),
                message,
            });
        }
        ValidationResult::LabelColumnIsNumeric => {
            let warning = Warning::LabelColumnIsNumeric {
                column: label.to_string(),
                alternatives: categorical_alternatives(&classify(dataset)),
            };
            warn!("{}", warning);
            warnings.push(warning);
        }
        ValidationResult::Ok => {}
    }

    let rows = aggregator(dataset, label, value, request.sort_order)?;
    debug!("Aggregated '{}' by '{}' into {} groups", value, label, rows.len());

    let colors = assign_colors(rows.len(), request.color_mode);
    let spec = chart::build(
        &rows,
        &colors,
        &request.title(),
        &request.x_label(),
        &request.y_label(),
    )?;
    info!("Built chart '{}' with {} bars", spec.title, spec.bars.len());

    Ok(PipelineOutcome::Chart(ChartOutput {
        spec,
        aggregation: rows,
        warnings,
    }))
}
