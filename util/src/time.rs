//! General time utility functions

use chrono;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

/// Number of whole ticks of `period_s` needed to cover `duration_s`.
///
/// Partial ticks round up, so any positive duration produces at least one tick. A small tolerance
/// is removed before rounding so that durations which are an exact multiple of the period in
/// decimal (like 1.1 s at 0.1 s) don't gain an extra tick from floating point error.
pub fn ticks_covering(duration_s: f64, period_s: f64) -> u32 {
    if duration_s <= 0.0 || period_s <= 0.0 {
        return 0;
    }

    let ticks = (duration_s / period_s - 1e-9).ceil();

    ticks.max(1.0) as u32
}

/// Number of ticks of `period_s` in `duration_s`, rounded to the nearest whole tick.
pub fn ticks_in(duration_s: f64, period_s: f64) -> u32 {
    if duration_s <= 0.0 || period_s <= 0.0 {
        return 0;
    }

    (duration_s / period_s).round() as u32
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ticks_covering() {
        assert_eq!(ticks_covering(0.0, 0.1), 0);
        assert_eq!(ticks_covering(0.35, 0.1), 4);
        assert_eq!(ticks_covering(0.2, 0.1), 2);
        assert_eq!(ticks_covering(1.1, 0.1), 11);
        assert_eq!(ticks_covering(0.01, 0.1), 1);
        assert_eq!(ticks_covering(-1.0, 0.1), 0);
        assert_eq!(ticks_covering(1e-12, 0.1), 1);
        assert_eq!(ticks_covering(f64::MIN_POSITIVE, 0.1), 1);
    }

    #[test]
    fn test_ticks_in() {
        assert_eq!(ticks_in(2.0, 0.1), 20);
        assert_eq!(ticks_in(3.0, 0.1), 30);
        assert_eq!(ticks_in(0.0, 0.1), 0);
    }

    #[test]
    fn test_duration_to_seconds() {
        let d = chrono::Duration::milliseconds(1500);
        assert_eq!(duration_to_seconds(d), Some(1.5));
    }
}
