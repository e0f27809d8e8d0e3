//! Display formatting for numeric results

/// Integers below this magnitude print without a fractional part
const INTEGER_DISPLAY_LIMIT: f64 = 1e15;

/// Significant digits used for everything else
const SIGNIFICANT_DIGITS: i32 = 6;

/// Format a numeric result for display
///
/// Integral values below 1e15 in magnitude print as plain integers. Other
/// values use at most six significant digits, switching to scientific
/// notation for very small or very large magnitudes.
///
/// # Example
/// ```rust
/// use cellcalc_formula::format_number;
///
/// assert_eq!(format_number(14.0), "14");
/// assert_eq!(format_number(0.1 + 0.2), "0.3");
/// assert_eq!(format_number(1.0 / 3.0), "0.333333");
/// assert_eq!(format_number(1e15), "1e+15");
/// ```
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value.fract() == 0.0 && value.abs() < INTEGER_DISPLAY_LIMIT {
        // Adding zero turns -0 into 0
        return format!("{:.0}", value + 0.0);
    }
    format_general(value)
}

/// `%g`-style formatting with six significant digits
fn format_general(value: f64) -> String {
    let precision = (SIGNIFICANT_DIGITS - 1) as usize;
    let scientific = format!("{:.*e}", precision, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
