//! Stored cell contents

use crate::style::Presentation;

/// A stored cell: the raw text the user typed plus presentation attributes
///
/// A cell holds a formula when its raw text starts with `=`. Presentation
/// attributes are carried for the renderer and never read by evaluation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    raw: String,
    is_formula: bool,
    /// Bold/italic/alignment
    pub presentation: Presentation,
}

impl Cell {
    /// Create a cell from raw text with default presentation
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            is_formula: raw.starts_with('='),
            raw,
            presentation: Presentation::default(),
        }
    }

    /// Set presentation attributes
    pub fn with_presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = presentation;
        self
    }

    /// The raw text as entered
    pub fn raw_value(&self) -> &str {
        &self.raw
    }

    /// Whether the raw text is a formula
    pub fn is_formula(&self) -> bool {
        self.is_formula
    }

    /// Whether the cell holds no text at all
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Replace the raw text, keeping presentation
    pub fn set_raw_value(&mut self, raw: impl Into<String>) {
        self.raw = raw.into();
        self.is_formula = self.raw.starts_with('=');
    }
}

impl From<&str> for Cell {
    fn from(raw: &str) -> Self {
        Cell::new(raw)
    }
}

impl From<String> for Cell {
    fn from(raw: String) -> Self {
        Cell::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::HorizontalAlignment;

    #[test]
    fn test_formula_flag() {
        assert!(Cell::new("=1+2").is_formula());
        assert!(Cell::new("=").is_formula());
        assert!(!Cell::new("42").is_formula());
        assert!(!Cell::new(" =1").is_formula());
        assert!(!Cell::new("").is_formula());
    }

    #[test]
    fn test_set_raw_value_updates_flag() {
        let mut cell = Cell::new("10").with_presentation(Presentation {
            bold: true,
            ..Default::default()
        });
        cell.set_raw_value("=A1");
        assert!(cell.is_formula());
        assert_eq!(cell.raw_value(), "=A1");
        assert!(cell.presentation.bold);

        cell.set_raw_value("text");
        assert!(!cell.is_formula());
        assert_eq!(cell.presentation.alignment, HorizontalAlignment::General);
    }
}
