//! # cellcalc-formula
//!
//! Formula parser and evaluator for cellcalc.
//!
//! This crate provides:
//! - Formula parsing (text → tokens → expression tree)
//! - Formula evaluation against a read-only sheet snapshot
//! - A small built-in function library (SUM, AVERAGE, COUNT, MIN, MAX, ABS,
//!   ROUND, IF)
//! - Circular reference detection
//! - Display formatting for numeric results
//!
//! Evaluation never fails: the result is either display text or one of the
//! error codes `#PARSE!`, `#REF!`, `#VALUE!`, `#DIV/0!`, `#NAME?`, `#CIRC!`.
//!
//! ## Example
//!
//! ```rust
//! use cellcalc_core::Sheet;
//! use cellcalc_formula::{evaluate, extract_series};
//!
//! let mut sheet = Sheet::new();
//! sheet.set("A1", "1").unwrap();
//! sheet.set("A2", "=1+1").unwrap();
//! sheet.set("A3", "3").unwrap();
//!
//! assert_eq!(evaluate("=AVERAGE(A1:A3)", &sheet), "2");
//! assert_eq!(evaluate("=2^3^2", &sheet), "64");
//! assert_eq!(extract_series("A1:A3", &sheet), vec![1.0, 2.0, 3.0]);
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod format;
pub mod functions;
pub mod parser;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{
    evaluate, evaluate_cell, extract_series, parse_number, CellSource, EvaluationOptions,
    Evaluator, MAX_EVALUATION_DEPTH, MAX_RANGE_CELLS,
};
pub use format::format_number;
pub use functions::FunctionRegistry;
pub use parser::{parse_expression, parse_formula, tokenize, Token, MAX_NESTING_DEPTH};
