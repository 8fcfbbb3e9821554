pub use crate::render::{GaugeRenderer, RenderConfig, RenderPreset};
pub use crate::source::{Direction, HttpSource, RawReading, ReadingSource};
pub use crate::transform::DisplayReading;

/// Common error type for every stage of the gauge pipeline.
#[derive(thiserror::Error, Debug)]
pub enum GaugeError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("expected at least {required} readings, got {found}")]
    InsufficientReadings { required: usize, found: usize },
    #[error("unknown trend code {0:?}")]
    UnknownDirection(String),
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type GaugeResult<T> = Result<T, GaugeError>;
