//! Core pipeline for the SGV gauge display.
//!
//! A run fetches the latest glucose entries from a Nightscout-style endpoint,
//! reduces them to a [`DisplayReading`] and rasterizes a radial gauge to PNG.
//! Every stage is synchronous and stateless between runs.

pub mod prelude;
pub mod render;
pub mod source;
pub mod telemetry;
pub mod transform;

pub use prelude::{GaugeError, GaugeResult};
pub use render::{GaugeRenderer, RenderConfig, RenderPreset};
pub use source::{Direction, HttpSource, RawReading, ReadingSource};
pub use transform::DisplayReading;
