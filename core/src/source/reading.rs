use crate::prelude::{GaugeError, GaugeResult};
use serde::Deserialize;
use std::fmt;

/// One glucose entry as served by the monitoring API.
///
/// Only the fields the gauge needs are decoded; everything else in the
/// entry object (`_id`, `dateString`, `device`, ...) is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawReading {
    /// Sensor glucose value in mg/dL.
    pub sgv: f64,
    /// Unix epoch in milliseconds.
    pub date: i64,
    /// Trend code, e.g. `Flat` or `FortyFiveUp`.
    pub direction: String,
}

impl RawReading {
    pub fn new(sgv: f64, date: i64, direction: impl Into<String>) -> Self {
        Self {
            sgv,
            date,
            direction: direction.into(),
        }
    }
}

/// Trend directions the display knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    SingleUp,
    SingleDown,
    Flat,
    FortyFiveUp,
    FortyFiveDown,
}

impl Direction {
    pub fn from_code(code: &str) -> GaugeResult<Self> {
        match code {
            "SingleUp" => Ok(Direction::SingleUp),
            "SingleDown" => Ok(Direction::SingleDown),
            "Flat" => Ok(Direction::Flat),
            "FortyFiveUp" => Ok(Direction::FortyFiveUp),
            "FortyFiveDown" => Ok(Direction::FortyFiveDown),
            other => Err(GaugeError::UnknownDirection(other.to_string())),
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Direction::SingleUp => '↑',
            Direction::SingleDown => '↓',
            Direction::Flat => '→',
            Direction::FortyFiveUp => '↗',
            Direction::FortyFiveDown => '↘',
        }
    }

    /// Arrow heading in degrees, counter-clockwise from pointing right.
    pub fn angle_degrees(self) -> f32 {
        match self {
            Direction::SingleUp => 90.0,
            Direction::SingleDown => -90.0,
            Direction::Flat => 0.0,
            Direction::FortyFiveUp => 45.0,
            Direction::FortyFiveDown => -45.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}
