//! Sheet rendering
//!
//! Computes the display text of every stored cell, the way a grid view
//! would show it.
//!
//! # Example
//!
//! ```rust
//! use cellcalc::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set("A1", "10").unwrap();
//! sheet.set("B1", "=A1/4").unwrap();
//! sheet.set("A2", "=B2").unwrap();
//! sheet.set("B2", "=A2").unwrap();
//!
//! let rendered = sheet.render();
//! let text: Vec<_> = rendered.iter().map(|c| c.display.as_str()).collect();
//! assert_eq!(text, vec!["10", "2.5", "#CIRC!", "#CIRC!"]);
//! ```

use crate::{CellAddress, EvaluationOptions, Evaluator, FormulaError, Presentation, Sheet};

/// Display result for one cell
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCell {
    /// Cell position
    pub address: CellAddress,
    /// Text shown in the grid
    pub display: String,
    /// Presentation attributes carried through unchanged
    pub presentation: Presentation,
    /// Whether the cell holds a formula
    pub is_formula: bool,
}

impl RenderedCell {
    /// Whether the display text is one of the formula error codes
    pub fn is_error(&self) -> bool {
        self.is_formula && is_error_code(&self.display)
    }
}

/// Counts from one rendering pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Number of cells rendered
    pub cells_rendered: usize,
    /// Number of formula cells evaluated
    pub formulas_evaluated: usize,
    /// Number of formula cells that produced an error code
    pub errors: usize,
}

/// Whether `text` is one of the six formula error codes
pub fn is_error_code(text: &str) -> bool {
    FormulaError::CODES.contains(&text)
}

/// Extension trait for rendering a whole sheet
pub trait SheetRenderExt {
    /// Render every stored cell with default options, row by row
    fn render(&self) -> Vec<RenderedCell>;

    /// Render every stored cell with custom options, row by row
    fn render_with_options(&self, options: &EvaluationOptions) -> Vec<RenderedCell>;

    /// Render and summarize
    fn render_with_stats(&self, options: &EvaluationOptions) -> (Vec<RenderedCell>, RenderStats);
}

impl SheetRenderExt for Sheet {
    fn render(&self) -> Vec<RenderedCell> {
        self.render_with_options(&EvaluationOptions::default())
    }

    fn render_with_options(&self, options: &EvaluationOptions) -> Vec<RenderedCell> {
        let evaluator = Evaluator::new(self).with_options(options.clone());

        self.addresses()
            .into_iter()
            .filter_map(|address| {
                let cell = self.cell_at(address)?;
                Some(RenderedCell {
                    address,
                    display: evaluator.evaluate_cell(address),
                    presentation: cell.presentation,
                    is_formula: cell.is_formula(),
                })
            })
            .collect()
    }

    fn render_with_stats(&self, options: &EvaluationOptions) -> (Vec<RenderedCell>, RenderStats) {
        let rendered = self.render_with_options(options);
        let stats = RenderStats {
            cells_rendered: rendered.len(),
            formulas_evaluated: rendered.iter().filter(|c| c.is_formula).count(),
            errors: rendered.iter().filter(|c| c.is_error()).count(),
        };
        (rendered, stats)
    }
}
