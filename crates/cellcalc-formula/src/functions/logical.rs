//! Logical functions

use crate::ast::FormulaExpr;
use crate::error::{FormulaError, FormulaResult};
use crate::functions::ArgEvaluator;

/// IF(condition, if_true, if_false)
///
/// Only the selected branch is evaluated. Any non-zero condition is true.
pub fn fn_if(args: &[FormulaExpr], eval: &mut ArgEvaluator<'_>) -> FormulaResult<f64> {
    let [condition, if_true, if_false] = args else {
        return Err(FormulaError::InvalidArgs(format!(
            "IF requires exactly 3 arguments, got {}",
            args.len()
        )));
    };

    if eval(condition)? != 0.0 {
        eval(if_true)
    } else {
        eval(if_false)
    }
}
