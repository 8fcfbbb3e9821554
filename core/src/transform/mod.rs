pub mod display;
pub mod units;

pub use display::{DisplayReading, REFERENCE_INDEX, REQUIRED_READINGS};
pub use units::{elapsed_minutes, to_mmol, MMOL_PER_MGDL};
