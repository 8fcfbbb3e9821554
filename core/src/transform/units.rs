/// Conversion factor from mg/dL to mmol/L used by the display.
pub const MMOL_PER_MGDL: f64 = 0.0555;

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Converts a sensor value to mmol/L rounded to one decimal.
///
/// Rounding works on the exact decimal expansion of the product, so
/// `100 * 0.0555` (stored as 5.5499...) lands on 5.5 rather than 5.6.
pub fn to_mmol(sgv: f64) -> f64 {
    round_tenths(sgv * MMOL_PER_MGDL)
}

fn round_tenths(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Whole minutes between `date_ms` and `now_ms`.
///
/// Magnitudes under half a minute collapse to 0 so clock skew never shows
/// up as "-0"; everything else rounds half away from zero.
pub fn elapsed_minutes(now_ms: i64, date_ms: i64) -> i64 {
    let minutes = (now_ms as f64 - date_ms as f64) / MILLIS_PER_MINUTE;
    if minutes.abs() < 0.5 {
        0
    } else {
        minutes.round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(delta: f64) -> i64 {
        elapsed_minutes((delta * MILLIS_PER_MINUTE) as i64, 0)
    }

    #[test]
    fn conversion_rounds_to_one_decimal() {
        assert_eq!(to_mmol(0.0), 0.0);
        assert_eq!(to_mmol(100.0), 5.5);
        assert_eq!(to_mmol(160.0), 8.9);
        assert_eq!(to_mmol(180.0), 10.0);
        assert_eq!(to_mmol(400.0), 22.2);
    }

    #[test]
    fn small_offsets_snap_to_zero() {
        assert_eq!(minutes(0.0), 0);
        assert_eq!(minutes(0.49), 0);
        assert_eq!(minutes(-0.49), 0);
        assert_eq!(minutes(-0.2).to_string(), "0");
    }

    #[test]
    fn larger_offsets_round_to_nearest() {
        assert_eq!(minutes(1.4), 1);
        assert_eq!(minutes(-1.6), -2);
        assert_eq!(minutes(7.5), 8);
        assert_eq!(minutes(12.2), 12);
    }

    // Halves round away from zero (2.5 -> 3), not to even.
    #[test]
    fn half_minute_rounds_away_from_zero() {
        assert_eq!(minutes(0.5), 1);
        assert_eq!(minutes(-0.5), -1);
        assert_eq!(minutes(2.5), 3);
    }

    #[test]
    fn extreme_timestamps_do_not_overflow() {
        let now = 1_700_000_000_000;
        assert!(elapsed_minutes(now, i64::MIN) > 0);
        assert!(elapsed_minutes(now, i64::MAX) < 0);
        assert!(elapsed_minutes(i64::MIN, i64::MAX) < 0);
    }
}
