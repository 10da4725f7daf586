use num_traits::Float;

/// Relative tolerance used to decide that a value sits on a tick or on zero.
const RELATIVE_TOLERANCE: f64 = 1e-9;

/// Compute a small tolerance relative to the provided span.
///
/// Never returns less than `T::epsilon()` so that zero-width spans still get
/// a usable comparison window.
pub fn tolerance_from_span<T: Float>(span: &T) -> T {
    let relative = T::from(RELATIVE_TOLERANCE).unwrap_or_else(T::epsilon);
    (span.abs() * relative).max(T::epsilon())
}

/// Format a value with one or two fractional digits.
///
/// Values are rounded to two decimals; a trailing zero in the second decimal
/// place is dropped, the first decimal is always kept.
///
/// ```
/// use bioscale::scale::util::format_value;
///
/// assert_eq!(format_value(8.0), "8.0");
/// assert_eq!(format_value(20.5), "20.5");
/// assert_eq!(format_value(26.254), "26.25");
/// ```
pub fn format_value<T: Float>(value: T) -> String {
    let value = value.to_f64().unwrap_or(f64::NAN);
    let mut rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        // Avoid "-0.0".
        rounded = 0.0;
    }

    let mut text = format!("{rounded:.2}");
    if text.ends_with('0') {
        text.pop();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_value_keeps_one_decimal() {
        assert_eq!(format_value(0.0), "0.0");
        assert_eq!(format_value(-0.001), "0.0");
        assert_eq!(format_value(100.0), "100.0");
        assert_eq!(format_value(-3.5), "-3.5");
        assert_eq!(format_value(0.125f32), "0.13");
    }

    #[test]
    fn tolerance_scales_with_span() {
        assert_eq!(tolerance_from_span(&0.0f64), f64::EPSILON);
        assert!((tolerance_from_span(&1000.0f64) - 1e-6).abs() < 1e-12);
    }
}
