// Library exports for barchart

pub mod aggregate;
pub mod chart;
pub mod csv_reader;
pub mod data;
pub mod error;
pub mod format;
pub mod graph;
pub mod palette;
pub mod pipeline;
pub mod render;
pub mod validate;
pub mod vegalite;

pub use aggregate::{aggregate, AggregationRow, SortOrder};
pub use chart::{Bar, ChartSpec};
pub use data::{Cell, Column, Dataset};
pub use error::{ChartError, Result};
pub use format::format_value;
pub use palette::{assign_colors, Color, ColorMode, PaletteName};
pub use pipeline::{run, ChartOutput, ChartRequest, PipelineOutcome, Warning};
pub use render::Renderer;
pub use validate::{classify, validate_selection, ColumnClassification, ColumnKind, ValidationResult};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    /// Interactive Vega-Lite JSON document
    #[serde(rename = "vega")]
    Vega,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "vega" | "vega-lite" | "json" => Ok(OutputFormat::Vega),
            _ => Err(format!("unknown output format '{}' (expected png or vega)", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
}

fn default_width() -> u32 { 1200 }
fn default_height() -> u32 { 800 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            format: OutputFormat::Png,
        }
    }
}
