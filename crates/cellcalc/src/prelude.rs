//! Prelude module - common imports for cellcalc users
//!
//! ```rust
//! use cellcalc::prelude::*;
//! ```

pub use crate::{
    // Evaluation
    evaluate,
    evaluate_cell,
    extract_series,
    // Core types
    Cell,
    CellAddress,
    CellRange,
    CellSource,
    Error,
    EvaluationOptions,
    Evaluator,
    FormulaError,
    HorizontalAlignment,
    Presentation,
    Result,
    Sheet,
    // Extension traits
    SheetRenderExt,
};
