//! Number formatting and lenient parsing for the display.
//!
//! Two output policies coexist: binary evaluation, `max`, percent and `π`
//! render with [`full`], while scientific functions and `hypot` render with
//! [`fixed4`]. Results from the two paths are not interchangeable (`1/3`
//! shows `0.3333333333333333` but `√(x)` results stop at four decimals).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Longest numeric prefix accepted by [`parse_float_prefix`].
    static ref FLOAT_PREFIX: Regex = Regex::new(
        r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)"
    ).unwrap();
}

/// Values at or above this magnitude switch to exponent notation.
const EXPONENT_UPPER: f64 = 1e21;
/// Non-zero values below this magnitude switch to exponent notation.
const EXPONENT_LOWER: f64 = 1e-6;
/// Enough fractional digits to print any double below [`EXPONENT_UPPER`] exactly.
const EXACT_DIGITS: usize = 1100;

/// Shortest round-trip rendering of a double.
///
/// Integers print without a fractional part, very large and very small
/// magnitudes use `1e+21` / `1.5e-7` notation, and the non-finite values
/// print as `Infinity`, `-Infinity` and `NaN`.
pub fn full(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    if value == 0.0 {
        // Negative zero displays as plain zero.
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (EXPONENT_LOWER..EXPONENT_UPPER).contains(&magnitude) {
        return format!("{}", value);
    }

    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

/// Four fixed decimals with trailing zeros and a bare trailing point removed.
pub fn fixed4(value: f64) -> String {
    if !value.is_finite() || value.abs() >= EXPONENT_UPPER {
        return full(value);
    }

    // `{:.4}` settles exact ties to even; ties here round away from zero,
    // decided on the exact decimal expansion of the double.
    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let (kept, rest) = fraction.split_at(fraction.len().min(4));
    let Ok(mut scaled) = format!("{}{:0<4}", whole, kept).parse::<u128>() else {
        return full(value);
    };
    if rest.starts_with(['5', '6', '7', '8', '9']) {
        scaled += 1;
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let formatted = format!("{}{}.{:04}", sign, scaled / 10_000, scaled % 10_000);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Parse the leading numeric portion of `input`, ignoring any trailing text.
///
/// `"3,4"` reads as `3`, `"  2.5abc"` as `2.5`. Returns `None` when no
/// numeric prefix exists.
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let trimmed = input.trim_start();
    let matched = FLOAT_PREFIX.find(trimmed)?.as_str();

    match matched.trim_start_matches(['+', '-']) {
        "Infinity" if matched.starts_with('-') => Some(f64::NEG_INFINITY),
        "Infinity" => Some(f64::INFINITY),
        _ => matched.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_integers_and_decimals() {
        assert_eq!(full(8.0), "8");
        assert_eq!(full(-12.0), "-12");
        assert_eq!(full(0.5), "0.5");
        assert_eq!(full(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(full(1.0 / 3.0), "0.3333333333333333");
    }

    #[test]
    fn test_full_special_values() {
        assert_eq!(full(-0.0), "0");
        assert_eq!(full(f64::NAN), "NaN");
        assert_eq!(full(f64::INFINITY), "Infinity");
        assert_eq!(full(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(full(std::f64::consts::PI), "3.141592653589793");
    }

    #[test]
    fn test_full_exponent_notation() {
        assert_eq!(full(1e21), "1e+21");
        assert_eq!(full(1.5e-7), "1.5e-7");
        assert_eq!(full(123456789012.0), "123456789012");
        assert_eq!(full(0.000001), "0.000001");
    }

    #[test]
    fn test_fixed4_trims() {
        assert_eq!(fixed4(5.0), "5");
        assert_eq!(fixed4(0.5), "0.5");
        assert_eq!(fixed4(100.0), "100");
        assert_eq!(fixed4(1.41421356), "1.4142");
        assert_eq!(fixed4(0.00001), "0");
        assert_eq!(fixed4(2.10004), "2.1");
    }

    #[test]
    fn test_fixed4_ties_round_away_from_zero() {
        assert_eq!(fixed4(2.15625), "2.1563");
        assert_eq!(fixed4(0.03125), "0.0313");
        assert_eq!(fixed4(-0.03125), "-0.0313");
        assert_eq!(fixed4(0.99995), "1");
        assert_eq!(fixed4(9.99999), "10");
        assert_eq!(fixed4(-0.00001), "-0");
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("42"), Some(42.0));
        assert_eq!(parse_float_prefix(" -2.5"), Some(-2.5));
        assert_eq!(parse_float_prefix("3,4"), Some(3.0));
        assert_eq!(parse_float_prefix("7."), Some(7.0));
        assert_eq!(parse_float_prefix(".25"), Some(0.25));
        assert_eq!(parse_float_prefix("1e3x"), Some(1000.0));
        assert_eq!(parse_float_prefix("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_float_prefix("Error"), None);
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix("."), None);
    }
}
