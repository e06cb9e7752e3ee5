//! Rate computation per value kind.
//!
//! Pure functions; the caller guarantees `elapsed > 0` and that both raw
//! values carry the kind declared for the column.

use crate::core::types::{DataSet, RawValue};

/// Difference between two counter readings, accounting for wraparound.
///
/// A counter that went backwards is assumed to have wrapped at 32 bits if the
/// previous reading fit in 32 bits, otherwise at 64 bits.
pub fn counter_diff(old: u64, new: u64) -> u64 {
    if new >= old {
        return new - old;
    }
    if old <= u64::from(u32::MAX) {
        u64::from(u32::MAX) - old + new + 1
    } else {
        new.wrapping_sub(old)
    }
}

/// Rate stored on first sight of a value.
///
/// Only gauges have a meaningful rate without a previous reading.
pub fn initial_rate(value: &RawValue) -> f64 {
    match *value {
        RawValue::Gauge(v) => v,
        RawValue::Counter(_) | RawValue::Derive(_) | RawValue::Absolute(_) => f64::NAN,
    }
}

/// Rate between `old` and `new` over `elapsed` seconds.
///
/// Returns `None` when the kinds of `old` and `new` differ.
#[allow(clippy::cast_precision_loss)]
pub fn rate(old: &RawValue, new: &RawValue, elapsed: f64) -> Option<f64> {
    let rate = match (*old, *new) {
        (RawValue::Counter(o), RawValue::Counter(n)) => counter_diff(o, n) as f64 / elapsed,
        (RawValue::Gauge(_), RawValue::Gauge(n)) => n,
        // Not clamped: a reset shows up as a negative rate.
        (RawValue::Derive(o), RawValue::Derive(n)) => n.wrapping_sub(o) as f64 / elapsed,
        (RawValue::Absolute(_), RawValue::Absolute(n)) => n as f64 / elapsed,
        _ => return None,
    };
    Some(rate)
}

/// Replaces every rate outside its column's `[min, max]` with NaN.
pub fn check_range(ds: &DataSet, rates: &mut [f64]) {
    for (rate, source) in rates.iter_mut().zip(&ds.sources) {
        if source.out_of_range(*rate) {
            *rate = f64::NAN;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DataSource, ValueKind};

    #[test]
    fn test_counter_without_wrap() {
        assert_eq!(counter_diff(100, 150), 50);
        assert_eq!(rate(&RawValue::Counter(100), &RawValue::Counter(150), 10.0), Some(5.0));
    }

    #[test]
    fn test_counter_wraps_at_32_bits() {
        let old = u64::from(u32::MAX) - 10;
        assert_eq!(counter_diff(old, 5), 16);
        assert_eq!(counter_diff(u64::from(u32::MAX), 0), 1);
    }

    #[test]
    fn test_counter_wraps_at_64_bits() {
        let old = u64::MAX - 10;
        assert_eq!(counter_diff(old, 5), 16);
        assert_eq!(counter_diff(u64::MAX, 0), 1);
        assert_eq!(
            rate(&RawValue::Counter(u64::MAX), &RawValue::Counter(0), 1.0),
            Some(1.0)
        );
    }

    #[test]
    fn test_derive_passes_resets_through() {
        let r = rate(&RawValue::Derive(500), &RawValue::Derive(100), 4.0).unwrap();
        assert_eq!(r, -100.0);
    }

    #[test]
    fn test_absolute_ignores_previous() {
        let r = rate(&RawValue::Absolute(1_000), &RawValue::Absolute(30), 10.0).unwrap();
        assert_eq!(r, 3.0);
    }

    #[test]
    fn test_gauge_is_not_time_scaled() {
        let r = rate(&RawValue::Gauge(1.0), &RawValue::Gauge(42.5), 100.0).unwrap();
        assert_eq!(r, 42.5);
    }

    #[test]
    fn test_kind_mismatch() {
        assert_eq!(rate(&RawValue::Gauge(1.0), &RawValue::Counter(1), 1.0), None);
    }

    #[test]
    fn test_initial_rate() {
        assert!(initial_rate(&RawValue::Counter(5)).is_nan());
        assert!(initial_rate(&RawValue::Derive(5)).is_nan());
        assert!(initial_rate(&RawValue::Absolute(5)).is_nan());
        assert_eq!(initial_rate(&RawValue::Gauge(5.0)), 5.0);
    }

    #[test]
    fn test_check_range() {
        let ds = DataSet::new(
            "pair",
            vec![
                DataSource::new("a", ValueKind::Gauge).with_range(0.0, 100.0),
                DataSource::new("b", ValueKind::Gauge),
            ],
        );
        let mut rates = vec![150.0, 150.0];
        check_range(&ds, &mut rates);
        assert!(rates[0].is_nan());
        assert_eq!(rates[1], 150.0);
    }
}
