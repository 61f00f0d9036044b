// Renderer abstraction over ChartSpec

use crate::chart::ChartSpec;
use crate::graph::RasterRenderer;
use crate::vegalite::VegaLiteRenderer;
use crate::{OutputFormat, RenderOptions};
use anyhow::{bail, Result};

/// Turns a finished [`ChartSpec`] into output bytes.
pub trait Renderer {
    fn render(&self, spec: &ChartSpec) -> Result<Vec<u8>>;

    /// File extension (without the dot) of the produced output.
    fn extension(&self) -> &'static str;
}

/// Pick the renderer for the requested output format
pub fn renderer_for(options: &RenderOptions) -> Box<dyn Renderer> {
    match options.format {
        OutputFormat::Png => Box::new(RasterRenderer::new(options.width, options.height)),
        OutputFormat::Vega => Box::new(VegaLiteRenderer::new(options.width, options.height)),
    }
}

/// Y-axis bounds shared by all renderers.
///
/// Bars grow from zero, so the range always includes 0. The top is the
/// spec's `y_axis_max`; all-negative data gets the same 15% headroom below.
/// An empty or all-zero chart falls back to `0..1`. Totals that overflowed
/// to a non-finite value cannot be drawn and are rejected.
pub fn y_bounds(spec: &ChartSpec) -> Result<(f64, f64)> {
    if let Some(bar) = spec.bars.iter().find(|b| !b.value.is_finite()) {
        bail!("Total for '{}' is not a finite number ({})", bar.label, bar.value);
    }
    if !spec.y_axis_max.is_finite() {
        bail!("Y axis maximum is not a finite number ({})", spec.y_axis_max);
    }

    let min = spec
        .bars
        .iter()
        .map(|b| b.value)
        .fold(0.0_f64, f64::min);
    let lower = if min < 0.0 { min * crate::chart::Y_HEADROOM } else { 0.0 };
    let upper = spec.y_axis_max.max(0.0);

    if lower == upper {
        Ok((0.0, 1.0))
    } else if !lower.is_finite() {
        bail!("Y axis minimum is not a finite number ({})", lower);
    } else {
        Ok((lower, upper))
    }
}
