pub mod canvas;
pub mod config;
pub mod gauge;

pub use canvas::{Canvas, Rgb};
pub use config::{ColorBand, Margins, RenderConfig, RenderPreset, ScreenSize, SeverityBands};
pub use gauge::{GaugeLayout, GaugeRenderer};
