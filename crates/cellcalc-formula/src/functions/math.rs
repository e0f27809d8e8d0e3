//! Math and aggregate functions
//!
//! Arguments arrive flattened: a range contributes each numeric value it
//! resolved to, a scalar argument contributes one value.

use crate::error::{FormulaError, FormulaResult};

/// SUM function
pub fn fn_sum(args: &[f64]) -> FormulaResult<f64> {
    Ok(args.iter().sum())
}

/// AVERAGE / AVG function; 0 when there is nothing to average
pub fn fn_average(args: &[f64]) -> FormulaResult<f64> {
    if args.is_empty() {
        return Ok(0.0);
    }
    Ok(args.iter().sum::<f64>() / args.len() as f64)
}

/// COUNT function
pub fn fn_count(args: &[f64]) -> FormulaResult<f64> {
    Ok(args.len() as f64)
}

/// MIN function; 0 when empty
pub fn fn_min(args: &[f64]) -> FormulaResult<f64> {
    Ok(args.iter().copied().reduce(f64::min).unwrap_or(0.0))
}

/// MAX function; 0 when empty
pub fn fn_max(args: &[f64]) -> FormulaResult<f64> {
    Ok(args.iter().copied().reduce(f64::max).unwrap_or(0.0))
}

/// ABS(number)
pub fn fn_abs(args: &[f64]) -> FormulaResult<f64> {
    first(args, "ABS").map(f64::abs)
}

/// ROUND(number, [num_digits])
///
/// Scales by a power of ten, rounds half away from zero, scales back.
/// Negative digits round to the left of the decimal point.
pub fn fn_round(args: &[f64]) -> FormulaResult<f64> {
    let number = first(args, "ROUND")?;
    let digits = args.get(1).map_or(0, |d| d.trunc().clamp(-308.0, 308.0) as i32);

    let multiplier = 10_f64.powi(digits);
    let rounded = (number * multiplier).round() / multiplier;

    if rounded.is_finite() {
        Ok(rounded)
    } else if digits > 0 {
        // Scaling overflowed; the value has no digits that far out
        Ok(number)
    } else {
        Ok(0.0)
    }
}

fn first(args: &[f64], name: &str) -> FormulaResult<f64> {
    args.first()
        .copied()
        .ok_or_else(|| FormulaError::InvalidArgs(format!("{} requires a value", name)))
}
