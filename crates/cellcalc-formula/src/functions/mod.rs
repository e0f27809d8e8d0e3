//! Built-in functions

pub mod logical;
pub mod math;
pub mod text;

use crate::ast::FormulaExpr;
use crate::error::FormulaResult;
use std::collections::HashMap;

/// Evaluates one unevaluated argument on the caller's call path
pub type ArgEvaluator<'e> = dyn FnMut(&FormulaExpr) -> FormulaResult<f64> + 'e;

/// Function implementation signature
#[derive(Clone, Copy)]
pub enum FunctionImpl {
    /// Receives every argument already evaluated, left to right, with
    /// ranges expanded into their values
    Eager(fn(&[f64]) -> FormulaResult<f64>),
    /// Receives the argument expressions and decides what to evaluate
    Lazy(fn(&[FormulaExpr], &mut ArgEvaluator<'_>) -> FormulaResult<f64>),
}

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
}

/// Function registry
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDef>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        registry.register_math_functions();
        registry.register_logical_functions();
        registry.register_text_functions();

        registry
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_uppercase())
    }

    /// Register a function
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.to_uppercase(), def);
    }

    /// Names of all registered functions, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.values().map(|def| def.name).collect();
        names.sort_unstable();
        names
    }

    fn register_eager(
        &mut self,
        name: &'static str,
        min_args: usize,
        f: fn(&[f64]) -> FormulaResult<f64>,
    ) {
        self.register(FunctionDef {
            name,
            min_args,
            max_args: None,
            implementation: FunctionImpl::Eager(f),
        });
    }

    fn register_math_functions(&mut self) {
        self.register_eager("SUM", 0, math::fn_sum);
        self.register_eager("AVERAGE", 0, math::fn_average);
        self.register_eager("AVG", 0, math::fn_average);
        self.register_eager("COUNT", 0, math::fn_count);
        self.register_eager("MIN", 0, math::fn_min);
        self.register_eager("MAX", 0, math::fn_max);
        // Extra arguments are ignored
        self.register_eager("ABS", 1, math::fn_abs);
        self.register_eager("ROUND", 1, math::fn_round);
    }

    fn register_logical_functions(&mut self) {
        self.register(FunctionDef {
            name: "IF",
            min_args: 3,
            max_args: Some(3),
            implementation: FunctionImpl::Lazy(logical::fn_if),
        });
    }

    fn register_text_functions(&mut self) {
        self.register_eager("CONCATENATE", 0, text::fn_concatenate);
        self.register_eager("CONCAT", 0, text::fn_concatenate);
    }
}
