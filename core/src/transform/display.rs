use crate::prelude::{GaugeError, GaugeResult};
use crate::source::{Direction, RawReading};
use crate::telemetry::log::LogManager;
use crate::transform::units::{elapsed_minutes, to_mmol};
use chrono::{DateTime, Utc};

/// Position of the comparison entry in the newest-first sequence.
pub const REFERENCE_INDEX: usize = 9;
pub const REQUIRED_READINGS: usize = REFERENCE_INDEX + 1;

/// Display-ready values for a single render.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayReading {
    /// Current value in mmol/L.
    pub value: f64,
    /// Value ten entries earlier, in mmol/L.
    pub reference: f64,
    pub minutes_ago: i64,
    pub direction: Direction,
}

impl DisplayReading {
    pub fn from_readings(readings: &[RawReading], now: DateTime<Utc>) -> GaugeResult<Self> {
        let logger = LogManager::new("transform");
        if readings.len() < REQUIRED_READINGS {
            return Err(GaugeError::InsufficientReadings {
                required: REQUIRED_READINGS,
                found: readings.len(),
            });
        }

        let current = &readings[0];
        let reference = &readings[REFERENCE_INDEX];
        let display = Self {
            value: to_mmol(current.sgv),
            reference: to_mmol(reference.sgv),
            minutes_ago: elapsed_minutes(now.timestamp_millis(), current.date),
            direction: Direction::from_code(&current.direction)?,
        };

        logger.record(&format!(
            "{:.1} mmol/L {} ({} min ago, reference {:.1})",
            display.value, display.direction, display.minutes_ago, display.reference
        ));
        Ok(display)
    }

    pub fn delta(&self) -> f64 {
        self.value - self.reference
    }

    pub fn minutes_ago_label(&self) -> String {
        self.minutes_ago.to_string()
    }

    pub fn value_label(&self) -> String {
        format!("{:.1}", self.value)
    }

    /// Signed delta with one decimal, `0.0` when unchanged.
    pub fn delta_label(&self) -> String {
        let delta = (self.delta() * 10.0).round() / 10.0;
        if delta == 0.0 {
            "0.0".to_string()
        } else {
            format!("{:+.1}", delta)
        }
    }
}
