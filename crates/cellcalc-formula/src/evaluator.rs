//! Formula evaluator
//!
//! Evaluates formula text against a read-only snapshot of a sheet. Values
//! are plain `f64`; errors abort the evaluation and surface as display codes.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::format::format_number;
use crate::functions::{FunctionImpl, FunctionRegistry};
use crate::parser::parse_expression;
use cellcalc_core::{Cell, CellAddress, CellRange, Sheet};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::sync::OnceLock;
use tracing::trace;

/// Largest range a single evaluation may expand
pub const MAX_RANGE_CELLS: u64 = 10_000;

/// Deepest an evaluation may recurse, counting every sub-expression and
/// every formula cell entered on the way
pub const MAX_EVALUATION_DEPTH: usize = 512;

/// Global function registry (lazily initialized)
static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

fn get_function_registry() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
}

/// Read access to a sheet's cells by canonical address text ("A1")
///
/// The evaluator only ever asks for canonical keys: uppercase column
/// letters followed by the 1-based row, no whitespace. The plain map impls
/// look keys up exactly, so a host map must be keyed that way; an entry
/// stored under "a1" or " A1" is never found. Collect such a map into a
/// [`Sheet`] to normalize its keys.
pub trait CellSource {
    /// Look up the cell stored under the canonical `key`
    fn cell(&self, key: &str) -> Option<&Cell>;
}

impl CellSource for Sheet {
    fn cell(&self, key: &str) -> Option<&Cell> {
        self.get(key)
    }
}

impl<S: BuildHasher> CellSource for HashMap<String, Cell, S> {
    fn cell(&self, key: &str) -> Option<&Cell> {
        self.get(key)
    }
}

impl CellSource for BTreeMap<String, Cell> {
    fn cell(&self, key: &str) -> Option<&Cell> {
        self.get(key)
    }
}

impl<T: CellSource + ?Sized> CellSource for &T {
    fn cell(&self, key: &str) -> Option<&Cell> {
        (**self).cell(key)
    }
}

/// Options for formula evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationOptions {
    /// Ranges with more cells than this are rejected with `#REF!`
    pub max_range_cells: u64,
    /// Evaluations nested deeper than this (long reference chains) are
    /// rejected with `#REF!`
    pub max_depth: usize,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            max_range_cells: MAX_RANGE_CELLS,
            max_depth: MAX_EVALUATION_DEPTH,
        }
    }
}

/// Cells currently being evaluated on one call path
///
/// Each level borrows its parent, so descending into a cell extends the set
/// without touching what sibling branches see.
#[derive(Debug, Clone, Copy)]
enum Visiting<'p> {
    Root,
    Cell {
        addr: CellAddress,
        parent: &'p Visiting<'p>,
    },
}

impl<'p> Visiting<'p> {
    fn contains(&self, target: CellAddress) -> bool {
        let mut current = self;
        while let Visiting::Cell { addr, parent } = current {
            if *addr == target {
                return true;
            }
            current = *parent;
        }
        false
    }

    fn with(&'p self, addr: CellAddress) -> Visiting<'p> {
        Visiting::Cell { addr, parent: self }
    }
}

/// Evaluates formulas against one sheet snapshot
///
/// An evaluator holds no state between calls; evaluating the same formula
/// twice against an unchanged snapshot gives the same text.
///
/// # Example
/// ```rust
/// use cellcalc_core::Sheet;
/// use cellcalc_formula::Evaluator;
///
/// let mut sheet = Sheet::new();
/// sheet.set("A1", "1").unwrap();
/// sheet.set("A2", "=1+1").unwrap();
/// sheet.set("A3", "3").unwrap();
///
/// let evaluator = Evaluator::new(&sheet);
/// assert_eq!(evaluator.evaluate("=SUM(A1:A3)"), "6");
/// assert_eq!(evaluator.evaluate("=5/0"), "#DIV/0!");
/// assert_eq!(evaluator.evaluate("plain text"), "plain text");
/// ```
pub struct Evaluator<'a, S: CellSource + ?Sized> {
    cells: &'a S,
    options: EvaluationOptions,
}

impl<'a, S: CellSource + ?Sized> Evaluator<'a, S> {
    /// Create an evaluator with default options
    pub fn new(cells: &'a S) -> Self {
        Self {
            cells,
            options: EvaluationOptions::default(),
        }
    }

    /// Replace the evaluation options
    pub fn with_options(mut self, options: EvaluationOptions) -> Self {
        self.options = options;
        self
    }

    /// The options in effect
    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    /// Evaluate formula text to display text
    ///
    /// Text not starting with `=` is returned unchanged, an empty formula
    /// body gives an empty string, and any error gives its display code.
    pub fn evaluate(&self, formula: &str) -> String {
        if !formula.starts_with('=') {
            return formula.to_string();
        }
        display(self.evaluate_value(formula))
    }

    /// Evaluate the cell at `addr` to display text
    ///
    /// The cell itself counts as being evaluated, so a formula that leads
    /// back to it is circular. Missing cells display as empty, literal
    /// cells as their raw text.
    pub fn evaluate_cell(&self, addr: CellAddress) -> String {
        let Some(cell) = self.cells.cell(&addr.to_a1_string()) else {
            return String::new();
        };
        if !cell.is_formula() {
            return cell.raw_value().to_string();
        }
        display(self.evaluate_formula_cell(cell, addr, &Visiting::Root, 0))
    }

    /// Numeric result of a formula
    ///
    /// `Ok(None)` when the text is not a formula or its body is empty.
    pub fn evaluate_value(&self, formula: &str) -> FormulaResult<Option<f64>> {
        match formula.strip_prefix('=') {
            Some(body) => self.evaluate_body(body, &Visiting::Root, 0),
            None => Ok(None),
        }
    }

    /// Numeric values of every cell in a `start:end` range, row by row
    ///
    /// Anything that fails to produce a number (a malformed or oversized
    /// range, an erroring formula, non-numeric text, an empty cell) is
    /// skipped.
    pub fn extract_series(&self, range: &str) -> Vec<f64> {
        let Ok(range) = CellRange::parse(range) else {
            return Vec::new();
        };
        if self.check_range_size(&range).is_err() {
            return Vec::new();
        }

        range
            .cells()
            .filter_map(|addr| {
                let cell = self.cells.cell(&addr.to_a1_string())?;
                if cell.is_formula() {
                    self.evaluate_formula_cell(cell, addr, &Visiting::Root, 0)
                        .ok()
                        .flatten()
                } else {
                    parse_number(cell.raw_value())
                }
            })
            .collect()
    }

    fn evaluate_formula_cell(
        &self,
        cell: &Cell,
        addr: CellAddress,
        visiting: &Visiting<'_>,
        depth: usize,
    ) -> FormulaResult<Option<f64>> {
        let depth = self.descend(depth)?;
        let body = cell.raw_value().strip_prefix('=').unwrap_or_default();
        self.evaluate_body(body, &visiting.with(addr), depth)
    }

    fn evaluate_body(
        &self,
        body: &str,
        visiting: &Visiting<'_>,
        depth: usize,
    ) -> FormulaResult<Option<f64>> {
        if body.trim().is_empty() {
            return Ok(None);
        }
        let expr = parse_expression(body)?;
        self.eval(&expr, visiting, depth).map(Some)
    }

    fn descend(&self, depth: usize) -> FormulaResult<usize> {
        let depth = depth + 1;
        if depth > self.options.max_depth {
            return Err(FormulaError::InvalidRange(format!(
                "evaluation nested deeper than {} levels",
                self.options.max_depth
            )));
        }
        Ok(depth)
    }

    fn eval(
        &self,
        expr: &FormulaExpr,
        visiting: &Visiting<'_>,
        depth: usize,
    ) -> FormulaResult<f64> {
        let depth = self.descend(depth)?;
        match expr {
            FormulaExpr::Number(n) => Ok(*n),

            FormulaExpr::Reference(addr) => self.resolve_reference(*addr, visiting, depth),

            FormulaExpr::Range(range) => Err(FormulaError::InvalidArgs(format!(
                "range {} used where a single value is expected",
                range
            ))),

            FormulaExpr::Call { name, args } => self.call_function(name, args, visiting, depth),

            FormulaExpr::BinaryOp { op, left, right } => {
                let l = self.eval(left, visiting, depth)?;
                let r = self.eval(right, visiting, depth)?;
                apply_binary(*op, l, r)
            }

            FormulaExpr::UnaryOp { op, operand } => {
                let value = self.eval(operand, visiting, depth)?;
                match op {
                    UnaryOperator::Negate => Ok(-value),
                }
            }
        }
    }

    /// Value of a single referenced cell; missing or non-numeric cells are 0
    fn resolve_reference(
        &self,
        addr: CellAddress,
        visiting: &Visiting<'_>,
        depth: usize,
    ) -> FormulaResult<f64> {
        if visiting.contains(addr) {
            return Err(FormulaError::CircularReference(addr.to_a1_string()));
        }

        let key = addr.to_a1_string();
        trace!(cell = %key, "resolving reference");

        match self.cells.cell(&key) {
            Some(cell) if cell.is_formula() => Ok(self
                .evaluate_formula_cell(cell, addr, visiting, depth)?
                .unwrap_or(0.0)),
            Some(cell) => Ok(parse_number(cell.raw_value()).unwrap_or(0.0)),
            None => Ok(0.0),
        }
    }

    /// Numeric values of a range, skipping empty and non-numeric cells
    fn resolve_range(
        &self,
        range: &CellRange,
        visiting: &Visiting<'_>,
        depth: usize,
    ) -> FormulaResult<Vec<f64>> {
        self.check_range_size(range)?;
        trace!(%range, cells = range.cell_count(), "resolving range");

        let mut values = Vec::new();
        for addr in range.cells() {
            let Some(cell) = self.cells.cell(&addr.to_a1_string()) else {
                continue;
            };

            if cell.is_formula() {
                if visiting.contains(addr) {
                    return Err(FormulaError::CircularReference(addr.to_a1_string()));
                }
                if let Some(value) = self.evaluate_formula_cell(cell, addr, visiting, depth)? {
                    values.push(value);
                }
            } else if let Some(value) = parse_number(cell.raw_value()) {
                values.push(value);
            }
        }

        Ok(values)
    }

    fn check_range_size(&self, range: &CellRange) -> FormulaResult<()> {
        let count = range.cell_count();
        if count > self.options.max_range_cells {
            return Err(FormulaError::InvalidRange(format!(
                "{} spans {} cells (limit {})",
                range, count, self.options.max_range_cells
            )));
        }
        Ok(())
    }

    fn call_function(
        &self,
        name: &str,
        args: &[FormulaExpr],
        visiting: &Visiting<'_>,
        depth: usize,
    ) -> FormulaResult<f64> {
        let func = get_function_registry()
            .get(name)
            .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;

        if args.len() < func.min_args || func.max_args.is_some_and(|max| args.len() > max) {
            return Err(FormulaError::InvalidArgs(format!(
                "{} given {} arguments",
                name,
                args.len()
            )));
        }

        match func.implementation {
            FunctionImpl::Eager(f) => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    match arg {
                        FormulaExpr::Range(range) => {
                            values.extend(self.resolve_range(range, visiting, depth)?)
                        }
                        expr => values.push(self.eval(expr, visiting, depth)?),
                    }
                }
                f(&values)
            }
            FunctionImpl::Lazy(f) => {
                f(args, &mut |expr: &FormulaExpr| self.eval(expr, visiting, depth))
            }
        }
    }
}

fn apply_binary(op: BinaryOperator, l: f64, r: f64) -> FormulaResult<f64> {
    match op {
        BinaryOperator::Add => Ok(l + r),
        BinaryOperator::Subtract => Ok(l - r),
        BinaryOperator::Multiply => Ok(l * r),
        BinaryOperator::Divide => {
            if r == 0.0 {
                Err(FormulaError::DivisionByZero)
            } else {
                Ok(l / r)
            }
        }
        BinaryOperator::Power => Ok(l.powf(r)),
    }
}

fn display(result: FormulaResult<Option<f64>>) -> String {
    match result {
        Ok(Some(value)) => format_number(value),
        Ok(None) => String::new(),
        Err(e) => e.code().to_string(),
    }
}

/// Parse a literal cell's text as a number
///
/// Surrounding whitespace is ignored. Text that only spells a non-finite
/// float ("inf", "NaN") is not a number.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Evaluate formula text against a sheet snapshot with default options
///
/// Never fails: the result is a display value or one of the error codes
/// `#PARSE!`, `#REF!`, `#VALUE!`, `#DIV/0!`, `#NAME?`, `#CIRC!`.
pub fn evaluate<S: CellSource + ?Sized>(formula: &str, cells: &S) -> String {
    Evaluator::new(cells).evaluate(formula)
}

/// Evaluate the cell at `addr` with default options
pub fn evaluate_cell<S: CellSource + ?Sized>(addr: CellAddress, cells: &S) -> String {
    Evaluator::new(cells).evaluate_cell(addr)
}

/// Numeric series for a `start:end` range with default options
pub fn extract_series<S: CellSource + ?Sized>(range: &str, cells: &S) -> Vec<f64> {
    Evaluator::new(cells).extract_series(range)
}
