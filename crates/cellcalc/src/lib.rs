//! # cellcalc
//!
//! A spreadsheet formula engine.
//!
//! cellcalc parses a cell's formula text, evaluates it against a snapshot of
//! the sheet, and produces either display text or an error code.
//!
//! ## Features
//!
//! - Arithmetic with `+ - * / ^`, parentheses and unary minus
//! - A1-style cell references and `start:end` ranges
//! - Built-in functions: SUM, AVERAGE, COUNT, MIN, MAX, ABS, ROUND, IF
//! - Circular reference detection
//! - Numeric series extraction for charts
//!
//! ## Example
//!
//! ```rust
//! use cellcalc::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set("A1", "1").unwrap();
//! sheet.set("A2", "=1+1").unwrap();
//! sheet.set("A3", "3").unwrap();
//!
//! assert_eq!(evaluate("=SUM(A1:A3)", &sheet), "6");
//! assert_eq!(evaluate("=(2+3)*4", &sheet), "20");
//! assert_eq!(evaluate("=FOO(1)", &sheet), "#NAME?");
//! ```

pub mod prelude;
pub mod render;

pub use render::{is_error_code, RenderStats, RenderedCell, SheetRenderExt};

// Re-export core types
pub use cellcalc_core::{
    Cell, CellAddress, CellRange, CellRangeIterator, Error, HorizontalAlignment, Presentation,
    Result, Sheet,
};

// Re-export formula types
pub use cellcalc_formula::{
    evaluate, evaluate_cell, extract_series, format_number, parse_formula, CellSource,
    EvaluationOptions, Evaluator, FormulaError, FormulaExpr, FormulaResult, FunctionRegistry,
    MAX_EVALUATION_DEPTH, MAX_NESTING_DEPTH, MAX_RANGE_CELLS,
};
