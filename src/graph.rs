use crate::chart::ChartSpec;
use crate::palette::Color;
use crate::render::{y_bounds, Renderer};
use anyhow::{bail, Context, Result};
use image::ImageEncoder;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::Color as _;
use plotters::style::FontTransform;

/// Pixels trimmed from each side of a bar inside its category slot
const BAR_GAP: u32 = 8;

/// Rough glyph width at the tick label size, used to decide rotation
const TICK_CHAR_PX: usize = 8;

/// Draws a [`ChartSpec`] onto an RGB bitmap and encodes it as PNG.
#[derive(Debug, Clone)]
pub struct RasterRenderer {
    width: u32,
    height: u32,
}

impl RasterRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn draw(&self, spec: &ChartSpec, buffer: &mut [u8]) -> Result<()> {
        let root = BitMapBackend::with_buffer(buffer, (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        let (y_min, y_max) = y_bounds(spec)?;
        let num_bars = spec.bars.len().max(1) as u32;
        let labels: Vec<&str> = spec.bars.iter().map(|b| b.label.as_str()).collect();

        // Long category names overlap when laid flat; turn them sideways.
        let slot_px = (self.width as usize / labels.len().max(1)).max(1);
        let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let rotate = longest * TICK_CHAR_PX > slot_px;
        let tick_font = ("sans-serif", 13).into_font();
        let (tick_style, x_area) = if rotate {
            let area = (longest * TICK_CHAR_PX + 30).min(self.height as usize / 3) as u32;
            (tick_font.transform(FontTransform::Rotate90), area.max(60))
        } else {
            (tick_font, 60)
        };

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .caption(&spec.title, ("sans-serif", 28).into_font().style(FontStyle::Bold))
            .x_label_area_size(x_area)
            .y_label_area_size(70)
            .build_cartesian_2d((0u32..num_bars).into_segmented(), y_min..y_max)
            .context("Failed to build chart")?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(RGBColor(235, 235, 235))
            .bold_line_style(RGBColor(210, 210, 210))
            .x_labels(labels.len().max(1))
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(idx) => labels
                    .get(*idx as usize)
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .x_desc(spec.x_axis_label.as_str())
            .y_desc(spec.y_axis_label.as_str())
            .axis_desc_style(("sans-serif", 16))
            .y_label_style(("sans-serif", 13))
            .x_label_style(tick_style)
            .draw()
            .context("Failed to draw mesh")?;

        chart
            .draw_series(spec.bars.iter().enumerate().map(|(idx, bar)| {
                let idx = idx as u32;
                let mut rect = Rectangle::new(
                    [
                        (SegmentValue::Exact(idx), 0.0),
                        (SegmentValue::Exact(idx + 1), bar.value),
                    ],
                    to_rgb(bar.color).filled(),
                );
                rect.set_margin(0, 0, BAR_GAP, BAR_GAP);
                rect
            }))
            .context("Failed to draw bars")?;

        let value_style = TextStyle::from(("sans-serif", 14).into_font().style(FontStyle::Bold))
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart
            .draw_series(spec.bars.iter().enumerate().map(|(idx, bar)| {
                Text::new(
                    bar.display_text.clone(),
                    (SegmentValue::CenterOf(idx as u32), bar.value),
                    value_style.clone(),
                )
            }))
            .context("Failed to draw value labels")?;

        root.present().context("Failed to present drawing")?;
        Ok(())
    }
}

impl Renderer for RasterRenderer {
    fn render(&self, spec: &ChartSpec) -> Result<Vec<u8>> {
        if self.width == 0 || self.height == 0 {
            bail!("Image size must be non-zero, got {}x{}", self.width, self.height);
        }
        let len = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|px| px.checked_mul(3))
            .with_context(|| format!("Image size {}x{} is too large", self.width, self.height))?;
        let mut buffer = vec![0u8; len];
        self.draw(spec, &mut buffer)?;

        let mut png_bytes = Vec::new();
        {
            let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
            encoder
                .write_image(&buffer, self.width, self.height, image::ColorType::Rgb8)
                .context("Failed to encode PNG")?;
        }

        Ok(png_bytes)
    }

    fn extension(&self) -> &'static str {
        "png"
    }
}

fn to_rgb(color: Color) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}
