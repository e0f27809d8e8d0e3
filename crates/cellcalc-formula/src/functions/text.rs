//! Text functions

use crate::error::FormulaResult;

/// CONCATENATE / CONCAT
///
/// Values are numbers only, so there is no text to join; the arguments are
/// still evaluated (their errors surface) and the result is 0.
pub fn fn_concatenate(_args: &[f64]) -> FormulaResult<f64> {
    Ok(0.0)
}
