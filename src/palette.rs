//! Per-bar color assignment.
//!
//! Continuous ramps are stored as evenly spaced anchor stops and linearly
//! interpolated. Bars sample the ramp over [0.2, 0.8] so the extreme ends
//! never show up. Discrete palettes cycle.

use crate::error::{ChartError, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sub-range of a continuous ramp that bars are drawn from.
pub const RAMP_START: f64 = 0.2;
pub const RAMP_END: f64 = 0.8;

/// Concrete RGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb` (the leading `#` is optional).
    pub fn parse(hex: &str) -> Result<Self> {
        parse_hex(hex).ok_or_else(|| ChartError::InvalidColor(hex.to_string()))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn lerp(self, other: Color, t: f64) -> Color {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let hex = hex.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::rgb(r, g, b))
        }
        _ => None,
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

/// The closed set of named palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum PaletteName {
    #[serde(rename = "viridis")]
    #[default]
    Viridis,
    #[serde(rename = "plasma")]
    Plasma,
    #[serde(rename = "cividis")]
    Cividis,
    #[serde(rename = "coolwarm")]
    Coolwarm,
    Set2,
    #[serde(rename = "tab10")]
    Tab10,
}

impl PaletteName {
    /// Fallback used for unrecognised names.
    pub const FALLBACK: PaletteName = PaletteName::Tab10;

    pub const ALL: [PaletteName; 6] = [
        PaletteName::Viridis,
        PaletteName::Plasma,
        PaletteName::Cividis,
        PaletteName::Coolwarm,
        PaletteName::Set2,
        PaletteName::Tab10,
    ];

    /// Resolve a palette by name (case-insensitive). Unknown names map to
    /// [`PaletteName::FALLBACK`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "viridis" => PaletteName::Viridis,
            "plasma" => PaletteName::Plasma,
            "cividis" => PaletteName::Cividis,
            "coolwarm" => PaletteName::Coolwarm,
            "set2" => PaletteName::Set2,
            "tab10" => PaletteName::Tab10,
            other => {
                warn!("Unknown palette '{}', falling back to {}", other, Self::FALLBACK);
                Self::FALLBACK
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaletteName::Viridis => "viridis",
            PaletteName::Plasma => "plasma",
            PaletteName::Cividis => "cividis",
            PaletteName::Coolwarm => "coolwarm",
            PaletteName::Set2 => "Set2",
            PaletteName::Tab10 => "tab10",
        }
    }

    fn palette(&self) -> Palette {
        match self {
            PaletteName::Viridis => Palette::Continuous(VIRIDIS),
            PaletteName::Plasma => Palette::Continuous(PLASMA),
            PaletteName::Cividis => Palette::Continuous(CIVIDIS),
            PaletteName::Coolwarm => Palette::Continuous(COOLWARM),
            PaletteName::Set2 => Palette::Discrete(SET2),
            PaletteName::Tab10 => Palette::Discrete(TAB10),
        }
    }
}

impl From<String> for PaletteName {
    fn from(name: String) -> Self {
        PaletteName::from_name(&name)
    }
}

impl fmt::Display for PaletteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How bars get their colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    Automatic(PaletteName),
    Fixed(Color),
}

impl Default for ColorMode {
    fn default() -> Self {
        ColorMode::Automatic(PaletteName::default())
    }
}

enum Palette {
    Continuous(&'static [Color]),
    Discrete(&'static [Color]),
}

/// Return exactly `count` colors for `mode`.
pub fn assign_colors(count: usize, mode: ColorMode) -> Vec<Color> {
    match mode {
        ColorMode::Fixed(c) => vec![c; count],
        ColorMode::Automatic(name) => match name.palette() {
            Palette::Continuous(stops) => linspace(RAMP_START, RAMP_END, count)
                .into_iter()
                .map(|t| sample_ramp(stops, t))
                .collect(),
            Palette::Discrete(colors) => colors.iter().copied().cycle().take(count).collect(),
        },
    }
}

/// `count` evenly spaced points over [start, end]; a single point is `start`.
fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

fn sample_ramp(stops: &[Color], t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let segments = stops.len() - 1;
    let pos = t * segments as f64;
    let idx = (pos.floor() as usize).min(segments - 1);
    stops[idx].lerp(stops[idx + 1], pos - idx as f64)
}

const VIRIDIS: &[Color] = &[
    Color::rgb(0x44, 0x01, 0x54),
    Color::rgb(0x47, 0x2c, 0x7a),
    Color::rgb(0x3b, 0x51, 0x8b),
    Color::rgb(0x2c, 0x71, 0x8e),
    Color::rgb(0x21, 0x90, 0x8d),
    Color::rgb(0x27, 0xad, 0x81),
    Color::rgb(0x5c, 0xc8, 0x63),
    Color::rgb(0xaa, 0xdc, 0x32),
    Color::rgb(0xfd, 0xe7, 0x25),
];

const PLASMA: &[Color] = &[
    Color::rgb(0x0d, 0x08, 0x87),
    Color::rgb(0x4c, 0x02, 0xa1),
    Color::rgb(0x7e, 0x03, 0xa8),
    Color::rgb(0xa9, 0x23, 0x95),
    Color::rgb(0xcc, 0x47, 0x78),
    Color::rgb(0xe5, 0x6b, 0x5d),
    Color::rgb(0xf8, 0x94, 0x41),
    Color::rgb(0xfd, 0xc3, 0x28),
    Color::rgb(0xf0, 0xf9, 0x21),
];

const CIVIDIS: &[Color] = &[
    Color::rgb(0x00, 0x20, 0x4d),
    Color::rgb(0x41, 0x4d, 0x6b),
    Color::rgb(0x7c, 0x7b, 0x78),
    Color::rgb(0xbc, 0xaf, 0x6f),
    Color::rgb(0xff, 0xea, 0x46),
];

const COOLWARM: &[Color] = &[
    Color::rgb(0x3b, 0x4c, 0xc0),
    Color::rgb(0x67, 0x88, 0xee),
    Color::rgb(0x9a, 0xbb, 0xff),
    Color::rgb(0xc9, 0xd7, 0xf0),
    Color::rgb(0xed, 0xd1, 0xc2),
    Color::rgb(0xf7, 0xa8, 0x89),
    Color::rgb(0xe2, 0x69, 0x52),
    Color::rgb(0xb4, 0x04, 0x26),
];

const SET2: &[Color] = &[
    Color::rgb(0x66, 0xc2, 0xa5),
    Color::rgb(0xfc, 0x8d, 0x62),
    Color::rgb(0x8d, 0xa0, 0xcb),
    Color::rgb(0xe7, 0x8a, 0xc3),
    Color::rgb(0xa6, 0xd8, 0x54),
    Color::rgb(0xff, 0xd9, 0x2f),
    Color::rgb(0xe5, 0xc4, 0x94),
    Color::rgb(0xb3, 0xb3, 0xb3),
];

const TAB10: &[Color] = &[
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0xff, 0x7f, 0x0e),
    Color::rgb(0x2c, 0xa0, 0x2c),
    Color::rgb(0xd6, 0x27, 0x28),
    Color::rgb(0x94, 0x67, 0xbd),
    Color::rgb(0x8c, 0x56, 0x4b),
    Color::rgb(0xe3, 0x77, 0xc2),
    Color::rgb(0x7f, 0x7f, 0x7f),
    Color::rgb(0xbc, 0xbd, 0x22),
    Color::rgb(0x17, 0xbe, 0xcf),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(Color::parse("#FF0000").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(Color::parse("#1f77b4").unwrap(), Color::rgb(0x1f, 0x77, 0xb4));
        assert_eq!(Color::parse("#F00").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(Color::parse("00ff00").unwrap(), Color::rgb(0, 255, 0));
        assert!(matches!(Color::parse("blue"), Err(ChartError::InvalidColor(_))));
        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("#ééé").is_err());
    }

    #[test]
    fn test_color_hex_roundtrip_text() {
        assert_eq!(Color::rgb(0x1f, 0x77, 0xb4).to_hex(), "#1f77b4");
        assert_eq!(Color::parse("#1F77B4").unwrap().to_string(), "#1f77b4");
    }

    #[test]
    fn test_fixed_colors() {
        let fixed = Color::parse("#1f77b4").unwrap();
        let colors = assign_colors(3, ColorMode::Fixed(fixed));
        let hex: Vec<String> = colors.iter().map(Color::to_hex).collect();
        assert_eq!(hex, vec!["#1f77b4", "#1f77b4", "#1f77b4"]);
    }

    #[test]
    fn test_zero_count_is_empty() {
        for name in PaletteName::ALL {
            assert!(assign_colors(0, ColorMode::Automatic(name)).is_empty());
        }
        assert!(assign_colors(0, ColorMode::Fixed(Color::rgb(0, 0, 0))).is_empty());
    }

    #[test]
    fn test_count_matches_for_all_palettes() {
        for name in PaletteName::ALL {
            for n in [1, 2, 7, 10, 11, 25] {
                assert_eq!(assign_colors(n, ColorMode::Automatic(name)).len(), n);
            }
        }
    }

    #[test]
    fn test_discrete_palette_wraps() {
        let colors = assign_colors(12, ColorMode::Automatic(PaletteName::Tab10));
        assert_eq!(colors[0], colors[10]);
        assert_eq!(colors[1], colors[11]);
        assert_eq!(colors[0].to_hex(), "#1f77b4");

        let set2 = assign_colors(9, ColorMode::Automatic(PaletteName::Set2));
        assert_eq!(set2[8], set2[0]);
    }

    #[test]
    fn test_continuous_palette_avoids_endpoints() {
        let colors = assign_colors(2, ColorMode::Automatic(PaletteName::Viridis));
        assert_eq!(colors[0], sample_ramp(VIRIDIS, 0.2));
        assert_eq!(colors[1], sample_ramp(VIRIDIS, 0.8));
        assert_ne!(colors[0], VIRIDIS[0]);
        assert_ne!(colors[1], VIRIDIS[VIRIDIS.len() - 1]);
    }

    #[test]
    fn test_linspace() {
        assert!(linspace(0.2, 0.8, 0).is_empty());
        assert_eq!(linspace(0.2, 0.8, 1), vec![0.2]);
        let pts = linspace(0.2, 0.8, 4);
        assert_eq!(pts.len(), 4);
        assert!((pts[0] - 0.2).abs() < 1e-12);
        assert!((pts[3] - 0.8).abs() < 1e-12);
        assert!((pts[1] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_sample_ramp_stops() {
        assert_eq!(sample_ramp(VIRIDIS, 0.0), VIRIDIS[0]);
        assert_eq!(sample_ramp(VIRIDIS, 1.0), VIRIDIS[8]);
        assert_eq!(sample_ramp(VIRIDIS, 0.5), VIRIDIS[4]);
    }

    #[test]
    fn test_palette_name_fallback() {
        assert_eq!(PaletteName::from_name("Set2"), PaletteName::Set2);
        assert_eq!(PaletteName::from_name("VIRIDIS"), PaletteName::Viridis);
        assert_eq!(PaletteName::from_name("rainbow"), PaletteName::FALLBACK);
    }

    #[test]
    fn test_color_mode_deserialize() {
        let auto: ColorMode = serde_json::from_str(r#"{"automatic": "plasma"}"#).unwrap();
        assert_eq!(auto, ColorMode::Automatic(PaletteName::Plasma));
        let unknown: ColorMode = serde_json::from_str(r#"{"automatic": "jet"}"#).unwrap();
        assert_eq!(unknown, ColorMode::Automatic(PaletteName::Tab10));
        let fixed: ColorMode = serde_json::from_str(r##"{"fixed": "#1f77b4"}"##).unwrap();
        assert_eq!(fixed, ColorMode::Fixed(Color::rgb(0x1f, 0x77, 0xb4)));
        assert!(serde_json::from_str::<ColorMode>(r#"{"fixed": "nope"}"#).is_err());
    }
}
