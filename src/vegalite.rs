//! Interactive chart output as a Vega-Lite v5 document.
//!
//! Bars are colored through an explicit ordinal scale whose domain is the
//! bar labels and whose range is the bar colors, so the document shows
//! exactly the colors in the [`ChartSpec`]. Category order is the spec's
//! order (`"sort": null`).

use crate::chart::ChartSpec;
use crate::render::{y_bounds, Renderer};
use anyhow::{Context, Result};
use serde_json::{json, Value};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

#[derive(Debug, Clone)]
pub struct VegaLiteRenderer {
    width: u32,
    height: u32,
}

impl VegaLiteRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Build the Vega-Lite JSON value for a spec.
    pub fn to_value(&self, spec: &ChartSpec) -> Result<Value> {
        let values: Vec<Value> = spec
            .bars
            .iter()
            .map(|bar| {
                json!({
                    "label": bar.label,
                    "value": bar.value,
                    "color": bar.color.to_hex(),
                    "display_text": bar.display_text,
                })
            })
            .collect();

        let domain: Vec<&str> = spec.bars.iter().map(|b| b.label.as_str()).collect();
        let range: Vec<String> = spec.bars.iter().map(|b| b.color.to_hex()).collect();
        let (y_min, y_max) = y_bounds(spec)?;

        Ok(json!({
            "$schema": VEGA_LITE_SCHEMA,
            "title": spec.title,
            "width": self.width,
            "height": self.height,
            "data": { "values": values },
            "encoding": {
                "x": {
                    "field": "label",
                    "type": "nominal",
                    "sort": null,
                    "title": spec.x_axis_label,
                    "axis": { "labelAngle": -45 }
                },
                "y": {
                    "field": "value",
                    "type": "quantitative",
                    "title": spec.y_axis_label,
                    "scale": { "domain": [y_min, y_max] }
                }
            },
            "layer": [
                {
                    "mark": { "type": "bar" },
                    "encoding": {
                        "color": {
                            "field": "label",
                            "type": "nominal",
                            "scale": { "domain": domain, "range": range },
                            "legend": null
                        },
                        "tooltip": [
                            { "field": "label", "type": "nominal", "title": spec.x_axis_label },
                            { "field": "display_text", "type": "nominal", "title": spec.y_axis_label }
                        ]
                    }
                },
                {
                    "mark": { "type": "text", "baseline": "bottom", "dy": -3, "fontWeight": "bold" },
                    "encoding": {
                        "text": { "field": "display_text", "type": "nominal" }
                    }
                }
            ]
        }))
    }
}

impl Renderer for VegaLiteRenderer {
    fn render(&self, spec: &ChartSpec) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.to_value(spec)?).context("Failed to serialize Vega-Lite spec")
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
