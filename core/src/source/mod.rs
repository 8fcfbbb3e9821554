pub mod http;
pub mod reading;

pub use http::{HttpSource, DEFAULT_ENDPOINT};
pub use reading::{Direction, RawReading};

use crate::prelude::GaugeResult;

/// Anything that can hand the pipeline a newest-first sequence of entries.
pub trait ReadingSource {
    fn fetch(&self) -> GaugeResult<Vec<RawReading>>;
}

impl ReadingSource for Vec<RawReading> {
    fn fetch(&self) -> GaugeResult<Vec<RawReading>> {
        Ok(self.clone())
    }
}
