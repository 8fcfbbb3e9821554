use crate::prelude::{GaugeError, GaugeResult};
use crate::render::canvas::Rgb;
use crate::render::gauge::GaugeLayout;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest accepted image side, in pixels.
pub const MAX_DIMENSION: u32 = 4096;
const MAX_TICKS: f64 = 100.0;

const BLACK: Rgb = [0, 0, 0];
const WHITE: Rgb = [255, 255, 255];
const GREY: Rgb = [128, 128, 128];
const LIGHT_GREY: Rgb = [211, 211, 211];
const YELLOW: Rgb = [255, 255, 0];
const RED: Rgb = [255, 0, 0];
const INCREASING: Rgb = [61, 153, 112];
const DECREASING: Rgb = [255, 65, 54];

/// Physical panel the image is produced for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width_inches: f64,
    pub dpi: f64,
    /// Height divided by width.
    pub aspect_ratio: f64,
}

impl ScreenSize {
    pub fn pixel_size(&self) -> (u32, u32) {
        let width = self.width_inches * self.dpi;
        let height = width * self.aspect_ratio;
        (width.round() as u32, height.round() as u32)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

/// Axis range `[from, to]` painted in `color`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBand {
    pub from: f64,
    pub to: f64,
    pub color: Rgb,
}

impl ColorBand {
    pub fn new(from: f64, to: f64, color: Rgb) -> Self {
        Self { from, to, color }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityBands {
    pub low: ColorBand,
    pub normal: ColorBand,
    pub high: ColorBand,
}

impl SeverityBands {
    pub fn iter(&self) -> impl Iterator<Item = &ColorBand> {
        [&self.low, &self.normal, &self.high].into_iter()
    }
}

/// Everything the renderer needs besides the reading itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub screen: ScreenSize,
    pub margins: Margins,
    pub title: String,
    pub axis_max: f64,
    pub tick_step: f64,
    pub bands: SeverityBands,
    pub bar_color: Rgb,
    pub background: Rgb,
    pub foreground: Rgb,
    pub increasing_color: Rgb,
    pub decreasing_color: Rgb,
    /// Appended to the elapsed-minutes annotation; may be empty.
    pub minutes_suffix: String,
}

impl RenderConfig {
    pub fn pixel_size(&self) -> (u32, u32) {
        self.screen.pixel_size()
    }

    pub fn validate(&self) -> GaugeResult<()> {
        let screen = &self.screen;
        if ![screen.width_inches, screen.dpi, screen.aspect_ratio]
            .into_iter()
            .all(positive)
        {
            return Err(GaugeError::InvalidConfig(
                "screen width, dpi and aspect ratio must be positive".into(),
            ));
        }
        let width = screen.width_inches * screen.dpi;
        let height = width * screen.aspect_ratio;
        if width.round() > MAX_DIMENSION as f64 || height.round() > MAX_DIMENSION as f64 {
            return Err(GaugeError::InvalidConfig(format!(
                "{:.0}x{:.0} px exceeds the {}px limit",
                width, height, MAX_DIMENSION
            )));
        }
        if !positive(self.axis_max) {
            return Err(GaugeError::InvalidConfig("axis_max must be positive".into()));
        }
        if !positive(self.tick_step) {
            return Err(GaugeError::InvalidConfig("tick_step must be positive".into()));
        }
        if self.axis_max / self.tick_step > MAX_TICKS {
            return Err(GaugeError::InvalidConfig(format!(
                "tick_step {} yields more than {} ticks",
                self.tick_step, MAX_TICKS
            )));
        }
        for band in self.bands.iter() {
            if band.to < band.from {
                return Err(GaugeError::InvalidConfig(format!(
                    "band [{}, {}] is inverted",
                    band.from, band.to
                )));
            }
        }
        GaugeLayout::compute(self).map(|_| ())
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderPreset::Standard.config()
    }
}

/// Named layouts for the panels the gauge is shown on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderPreset {
    /// 4.2" 16:9 screen at 96 dpi.
    #[default]
    Standard,
    /// 4.2" 400x300 e-paper panel, three-colour palette.
    Epaper,
}

impl RenderPreset {
    pub fn config(self) -> RenderConfig {
        match self {
            RenderPreset::Standard => RenderConfig {
                screen: ScreenSize {
                    width_inches: 4.2,
                    dpi: 96.0,
                    aspect_ratio: 9.0 / 16.0,
                },
                margins: Margins {
                    left: 19,
                    right: 19,
                    top: 50,
                    bottom: 20,
                },
                title: "SGV".into(),
                axis_max: 25.0,
                tick_step: 5.0,
                bands: SeverityBands {
                    low: ColorBand::new(0.0, 3.8, GREY),
                    normal: ColorBand::new(3.8, 10.8, LIGHT_GREY),
                    high: ColorBand::new(10.8, 30.0, YELLOW),
                },
                bar_color: BLACK,
                background: WHITE,
                foreground: BLACK,
                increasing_color: INCREASING,
                decreasing_color: DECREASING,
                minutes_suffix: "min ago".into(),
            },
            RenderPreset::Epaper => RenderConfig {
                screen: ScreenSize {
                    width_inches: 4.2,
                    dpi: 95.24,
                    aspect_ratio: 3.0 / 4.0,
                },
                margins: Margins {
                    left: 12,
                    right: 12,
                    top: 40,
                    bottom: 16,
                },
                title: "SGV".into(),
                axis_max: 20.0,
                tick_step: 4.0,
                bands: SeverityBands {
                    low: ColorBand::new(0.0, 4.0, BLACK),
                    normal: ColorBand::new(4.0, 10.0, WHITE),
                    high: ColorBand::new(10.0, 30.0, RED),
                },
                bar_color: BLACK,
                background: WHITE,
                foreground: BLACK,
                increasing_color: BLACK,
                decreasing_color: RED,
                minutes_suffix: "m".into(),
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RenderPreset::Standard => "standard",
            RenderPreset::Epaper => "epaper",
        }
    }
}

impl fmt::Display for RenderPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RenderPreset {
    type Err = GaugeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "standard" => Ok(RenderPreset::Standard),
            "epaper" => Ok(RenderPreset::Epaper),
            other => Err(GaugeError::InvalidConfig(format!(
                "unknown preset {other:?} (expected standard or epaper)"
            ))),
        }
    }
}
