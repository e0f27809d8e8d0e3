//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
///
/// The set is closed: every failure surfaces to the caller as one of six
/// display codes (see [`FormulaError::code`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// Expression matches no grammar rule
    #[error("Parse error: {0}")]
    Parse(String),

    /// Malformed `start:end` or a range over the cell limit
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Wrong number or kind of arguments
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// `/` with a zero right-hand side
    #[error("Division by zero")]
    DivisionByZero,

    /// Unrecognized function name
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// A reference cycle through the named cell
    #[error("Circular reference detected involving cell {0}")]
    CircularReference(String),
}

impl FormulaError {
    /// Every display code, in variant order
    pub const CODES: [&'static str; 6] =
        ["#PARSE!", "#REF!", "#VALUE!", "#DIV/0!", "#NAME?", "#CIRC!"];

    /// The spreadsheet-style code shown in place of a value
    pub fn code(&self) -> &'static str {
        match self {
            FormulaError::Parse(_) => "#PARSE!",
            FormulaError::InvalidRange(_) => "#REF!",
            FormulaError::InvalidArgs(_) => "#VALUE!",
            FormulaError::DivisionByZero => "#DIV/0!",
            FormulaError::UnknownFunction(_) => "#NAME?",
            FormulaError::CircularReference(_) => "#CIRC!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_codes() {
        assert_eq!(FormulaError::Parse("x".into()).code(), "#PARSE!");
        assert_eq!(FormulaError::InvalidRange("x".into()).code(), "#REF!");
        assert_eq!(FormulaError::InvalidArgs("x".into()).code(), "#VALUE!");
        assert_eq!(FormulaError::DivisionByZero.code(), "#DIV/0!");
        assert_eq!(FormulaError::UnknownFunction("FOO".into()).code(), "#NAME?");
        assert_eq!(FormulaError::CircularReference("A1".into()).code(), "#CIRC!");
    }

    #[test]
    fn test_codes_table_matches_variants() {
        let errors = [
            FormulaError::Parse(String::new()),
            FormulaError::InvalidRange(String::new()),
            FormulaError::InvalidArgs(String::new()),
            FormulaError::DivisionByZero,
            FormulaError::UnknownFunction(String::new()),
            FormulaError::CircularReference(String::new()),
        ];
        let codes: Vec<_> = errors.iter().map(FormulaError::code).collect();
        assert_eq!(codes, FormulaError::CODES);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            FormulaError::UnknownFunction("FOO".into()).to_string(),
            "Unknown function: FOO"
        );
        assert_eq!(FormulaError::DivisionByZero.to_string(), "Division by zero");
    }
}
