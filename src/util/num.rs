/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Converts a number into the text the interpreter prints for it.
///
/// The rules follow the usual scripting-language conventions:
/// - integral values inside the safe integer range print without a
///   fractional part (`3`, `-12`),
/// - negative zero prints as `0`,
/// - non-finite values print as `NaN`, `Infinity` or `-Infinity`,
/// - magnitudes of `1e21` and above or below `1e-6` use exponent form with an
///   explicit sign (`1e+21`, `1.5e-7`),
/// - every other value uses Rust's shortest round-trip representation.
///
/// ## Parameters
/// - `value`: The number to format.
///
/// ## Returns
/// The formatted number.
///
/// ## Example
/// ```
/// use tslite::util::num::format_number;
///
/// assert_eq!(format_number(10.0), "10");
/// assert_eq!(format_number(2.5), "2.5");
/// assert_eq!(format_number(-0.0), "0");
/// assert_eq!(format_number(f64::INFINITY), "Infinity");
/// assert_eq!(format_number(1e46), "1e+46");
/// ```
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if let Some(n) = f64_to_i64_exact(value) {
        return n.to_string();
    }

    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        return exponent_form(value);
    }
    value.to_string()
}

/// Formats a number as `<mantissa>e<sign><exponent>`.
fn exponent_form(value: f64) -> String {
    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{mantissa}e+{exponent}"),
        _ => text,
    }
}

/// Converts an `f64` to `i64` if and only if it is integral and inside the
/// safe integer range.
///
/// ## Parameters
/// - `value`: The number to convert.
///
/// ## Returns
/// - `Some(i64)`: The integer if the conversion is lossless.
/// - `None`: If the value has a fractional part or is out of range.
///
/// ## Example
/// ```
/// use tslite::util::num::f64_to_i64_exact;
///
/// assert_eq!(f64_to_i64_exact(42.0), Some(42));
/// assert_eq!(f64_to_i64_exact(4.2), None);
/// assert_eq!(f64_to_i64_exact(1e300), None);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn f64_to_i64_exact(value: f64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > MAX_SAFE_INTEGER {
        return None;
    }

    Some(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_integral_values_without_fraction() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(-42.0), "-42");
    }

    #[test]
    fn formats_fractional_values() {
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(10.0 / 4.0), "2.5");
    }

    #[test]
    fn formats_extreme_magnitudes_in_exponent_form() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e30), "-2.5e+30");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(0.000_001), "0.000001");
        assert_eq!(format_number(123_456_789_012_345_680_000.0), "123456789012345680000");
    }

    #[test]
    fn formats_non_finite_values() {
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn rejects_values_outside_safe_range() {
        assert_eq!(f64_to_i64_exact(MAX_SAFE_INTEGER), Some(9_007_199_254_740_991));
        assert_eq!(f64_to_i64_exact(MAX_SAFE_INTEGER * 2.0), None);
    }
}
