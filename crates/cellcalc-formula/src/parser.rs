//! Formula parser
//!
//! The formula body is first split into a flat token stream, then a
//! precedence-climbing parser builds a [`FormulaExpr`] tree.
//!
//! Precedence (lowest to highest):
//! 1. Addition/Subtraction: `+`, `-`
//! 2. Multiplication/Division: `*`, `/`
//! 3. Exponentiation: `^`
//! 4. Unary minus
//! 5. Primary: numbers, cell references, function calls, parentheses
//!
//! Every binary operator is left-associative, `^` included, so `2^3^2`
//! is `(2^3)^2`.

use crate::ast::{BinaryOperator, FormulaExpr};
use crate::error::{FormulaError, FormulaResult};
use cellcalc_core::{CellAddress, CellRange};

/// Parse a formula string (leading `=` required) into an AST
///
/// # Example
/// ```rust
/// use cellcalc_formula::parse_formula;
///
/// let ast = parse_formula("=1+2").unwrap();
/// let ast = parse_formula("=SUM(A1:A10)").unwrap();
/// let ast = parse_formula("=IF(A1,1,2)").unwrap();
/// assert!(parse_formula("1+2").is_err());
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<FormulaExpr> {
    let body = formula
        .trim()
        .strip_prefix('=')
        .ok_or_else(|| FormulaError::Parse("Formula must start with '='".into()))?;

    parse_expression(body)
}

/// Parse a formula body (no leading `=`) into an AST
pub fn parse_expression(body: &str) -> FormulaResult<FormulaExpr> {
    let tokens = tokenize(body)?;
    if tokens.len() == 1 {
        return Err(FormulaError::Parse("empty formula".into()));
    }

    let mut parser = FormulaParser::new(&tokens);
    let (expr, _) = parser.parse_binary(1)?;

    match parser.peek() {
        Token::Eof => Ok(expr),
        other => Err(FormulaError::Parse(format!(
            "Unexpected {} after expression",
            other.describe()
        ))),
    }
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    /// Function name or cell reference, as written
    Identifier(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Colon,
    Comma,
    LeftParen,
    RightParen,

    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::Identifier(s) => format!("'{}'", s),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::Caret => "'^'".into(),
            Token::Colon => "':'".into(),
            Token::Comma => "','".into(),
            Token::LeftParen => "'('".into(),
            Token::RightParen => "')'".into(),
            Token::Eof => "end of input".into(),
        }
    }
}

/// Split a formula body into tokens, always terminated by [`Token::Eof`]
pub fn tokenize(input: &str) -> FormulaResult<Vec<Token>> {
    let mut lexer = Lexer { input, pos: 0 };
    let mut tokens = Vec::new();

    loop {
        let token = lexer.scan_token()?;
        let done = token == Token::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl Lexer<'_> {
    fn scan_token(&mut self) -> FormulaResult<Token> {
        self.skip_whitespace();

        let Some(c) = self.peek_char() else {
            return Ok(Token::Eof);
        };

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '^' => Some(Token::Caret),
            ':' => Some(Token::Colon),
            ',' => Some(Token::Comma),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).is_some_and(|c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        if c.is_ascii_alphabetic() || c == '_' {
            return Ok(self.scan_identifier());
        }

        Err(FormulaError::Parse(format!(
            "Unexpected character '{}' at offset {}",
            c, self.pos
        )))
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        self.skip_digits();

        if self.peek_char() == Some('.') {
            self.advance();
            self.skip_digits();
        }

        // Exponent only when digits follow, so "2E" stays a number then a name
        if self.peek_char().is_some_and(|c| c == 'e' || c == 'E') {
            let digit_at = match self.peek_char_at(1) {
                Some('+') | Some('-') => 2,
                _ => 1,
            };
            if self
                .peek_char_at(digit_at)
                .is_some_and(|c| c.is_ascii_digit())
            {
                for _ in 0..digit_at {
                    self.advance();
                }
                self.skip_digits();
            }
        }

        let text = &self.input[start..self.pos];
        text.parse()
            .map(Token::Number)
            .map_err(|_| FormulaError::Parse(format!("Invalid number '{}'", text)))
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek_char()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            self.advance();
        }
        Token::Identifier(self.input[start..self.pos].to_string())
    }

    fn skip_digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_whitespace()) {
            self.advance();
        }
    }
}

/// Deepest a formula may nest, counting parentheses, calls, operators and
/// unary minus
pub const MAX_NESTING_DEPTH: usize = 256;

/// A parsed expression with the depth of its tree
type Parsed = (FormulaExpr, usize);

fn check_depth(depth: usize) -> FormulaResult<usize> {
    if depth > MAX_NESTING_DEPTH {
        return Err(FormulaError::Parse(format!(
            "formula nested deeper than {} levels",
            MAX_NESTING_DEPTH
        )));
    }
    Ok(depth)
}

/// Formula parser over a token stream
struct FormulaParser<'t> {
    tokens: &'t [Token],
    pos: usize,
    /// Open parentheses and calls around the current position
    nesting: usize,
}

impl<'t> FormulaParser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            nesting: 0,
        }
    }

    fn peek(&self) -> &'t Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &'t Token {
        self.tokens.get(self.pos + offset).unwrap_or(&Token::Eof)
    }

    fn consume(&mut self) -> &'t Token {
        let token = self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.peek() == expected {
            self.consume();
            Ok(())
        } else {
            Err(FormulaError::Parse(format!(
                "Expected {}, got {}",
                expected.describe(),
                self.peek().describe()
            )))
        }
    }

    fn enter(&mut self) -> FormulaResult<()> {
        self.nesting += 1;
        check_depth(self.nesting).map(|_| ())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    fn peek_binary_operator(&self) -> Option<BinaryOperator> {
        match self.peek() {
            Token::Plus => Some(BinaryOperator::Add),
            Token::Minus => Some(BinaryOperator::Subtract),
            Token::Star => Some(BinaryOperator::Multiply),
            Token::Slash => Some(BinaryOperator::Divide),
            Token::Caret => Some(BinaryOperator::Power),
            _ => None,
        }
    }

    /// Precedence climbing; `min_precedence + 1` on the right keeps
    /// every operator left-associative
    fn parse_binary(&mut self, min_precedence: u8) -> FormulaResult<Parsed> {
        let (mut left, mut depth) = self.parse_unary()?;

        while let Some(op) = self.peek_binary_operator() {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.consume();
            let (right, right_depth) = self.parse_binary(precedence + 1)?;
            depth = check_depth(depth.max(right_depth) + 1)?;
            left = FormulaExpr::binary(op, left, right);
        }

        Ok((left, depth))
    }

    fn parse_unary(&mut self) -> FormulaResult<Parsed> {
        let mut negations = 0;
        while matches!(self.peek(), Token::Minus) {
            self.consume();
            negations = check_depth(negations + 1)?;
        }

        let (mut expr, depth) = self.parse_primary()?;
        for _ in 0..negations {
            expr = FormulaExpr::negate(expr);
        }
        Ok((expr, check_depth(depth + negations)?))
    }

    fn parse_primary(&mut self) -> FormulaResult<Parsed> {
        match self.consume() {
            Token::Number(n) => Ok((FormulaExpr::Number(*n), 1)),

            Token::LeftParen => {
                self.enter()?;
                let parsed = self.parse_binary(1)?;
                self.expect(&Token::RightParen)?;
                self.leave();
                Ok(parsed)
            }

            // A name followed by '(' is a call even if it looks like a cell (LOG10)
            Token::Identifier(name) if matches!(self.peek(), Token::LeftParen) => {
                self.consume();
                self.enter()?;
                let parsed = self.parse_function_call(name)?;
                self.leave();
                Ok(parsed)
            }

            Token::Identifier(name) => CellAddress::parse(name)
                .map(|addr| (FormulaExpr::Reference(addr), 1))
                .map_err(|_| FormulaError::Parse(format!("Unknown identifier '{}'", name))),

            other => Err(FormulaError::Parse(format!(
                "Unexpected {}",
                other.describe()
            ))),
        }
    }

    /// Arguments after the opening parenthesis, through the closing one
    fn parse_function_call(&mut self, name: &str) -> FormulaResult<Parsed> {
        let mut args = Vec::new();
        let mut depth = 0;

        if matches!(self.peek(), Token::RightParen) {
            self.consume();
        } else {
            loop {
                let (arg, arg_depth) = self.parse_argument()?;
                args.push(arg);
                depth = depth.max(arg_depth);
                match self.consume() {
                    Token::Comma => continue,
                    Token::RightParen => break,
                    other => {
                        return Err(FormulaError::Parse(format!(
                            "Expected ',' or ')' in arguments of {}, got {}",
                            name,
                            other.describe()
                        )))
                    }
                }
            }
        }

        let call = FormulaExpr::Call {
            name: name.to_uppercase(),
            args,
        };
        Ok((call, check_depth(depth + 1)?))
    }

    /// A function argument: an expression or a `start:end` range
    fn parse_argument(&mut self) -> FormulaResult<Parsed> {
        if let (Token::Identifier(start), Token::Colon) = (self.peek(), self.peek_at(1)) {
            self.pos += 2;
            let end = match self.consume() {
                Token::Identifier(end) => end.as_str(),
                other => {
                    return Err(FormulaError::InvalidRange(format!(
                        "Expected cell after '{}:', got {}",
                        start,
                        other.describe()
                    )))
                }
            };
            return CellRange::parse(&format!("{}:{}", start, end))
                .map(|range| (FormulaExpr::Range(range), 1))
                .map_err(|e| FormulaError::InvalidRange(e.to_string()));
        }

        let parsed = self.parse_binary(1)?;
        if matches!(self.peek(), Token::Colon) {
            return Err(FormulaError::InvalidRange(
                "Range endpoints must be cell references".into(),
            ));
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::UnaryOperator;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> FormulaExpr {
        FormulaExpr::Number(n)
    }

    fn cell(s: &str) -> FormulaExpr {
        FormulaExpr::Reference(CellAddress::parse(s).unwrap())
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("SUM(A1:B2, 1.5e2)").unwrap(),
            vec![
                Token::Identifier("SUM".into()),
                Token::LeftParen,
                Token::Identifier("A1".into()),
                Token::Colon,
                Token::Identifier("B2".into()),
                Token::Comma,
                Token::Number(150.0),
                Token::RightParen,
                Token::Eof,
            ]
        );

        assert_eq!(
            tokenize("2E").unwrap(),
            vec![
                Token::Number(2.0),
                Token::Identifier("E".into()),
                Token::Eof
            ]
        );
        assert_eq!(tokenize(".5").unwrap(), vec![Token::Number(0.5), Token::Eof]);
        assert!(tokenize("1 & 2").is_err());
        assert!(tokenize("\"text\"").is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_formula("=42").unwrap(), num(42.0));
        assert_eq!(parse_formula("=3.14").unwrap(), num(3.14));
        assert_eq!(parse_formula("=1e10").unwrap(), num(1e10));
        assert_eq!(parse_formula("=  7  ").unwrap(), num(7.0));
    }

    #[test]
    fn test_parse_precedence() {
        // 1+(2*3)
        assert_eq!(
            parse_formula("=1+2*3").unwrap(),
            FormulaExpr::binary(
                BinaryOperator::Add,
                num(1.0),
                FormulaExpr::binary(BinaryOperator::Multiply, num(2.0), num(3.0))
            )
        );

        // (1+2)*3
        assert_eq!(
            parse_formula("=(1+2)*3").unwrap(),
            FormulaExpr::binary(
                BinaryOperator::Multiply,
                FormulaExpr::binary(BinaryOperator::Add, num(1.0), num(2.0)),
                num(3.0)
            )
        );
    }

    #[test]
    fn test_parse_left_associative() {
        // (10-4)-3
        assert_eq!(
            parse_formula("=10-4-3").unwrap(),
            FormulaExpr::binary(
                BinaryOperator::Subtract,
                FormulaExpr::binary(BinaryOperator::Subtract, num(10.0), num(4.0)),
                num(3.0)
            )
        );

        // (2^3)^2
        assert_eq!(
            parse_formula("=2^3^2").unwrap(),
            FormulaExpr::binary(
                BinaryOperator::Power,
                FormulaExpr::binary(BinaryOperator::Power, num(2.0), num(3.0)),
                num(2.0)
            )
        );
    }

    #[test]
    fn test_parse_unary() {
        assert_eq!(parse_formula("=-5").unwrap(), FormulaExpr::negate(num(5.0)));
        assert_eq!(
            parse_formula("=--5").unwrap(),
            FormulaExpr::negate(FormulaExpr::negate(num(5.0)))
        );

        // Unary minus binds tighter than ^
        assert_eq!(
            parse_formula("=-2^2").unwrap(),
            FormulaExpr::binary(
                BinaryOperator::Power,
                FormulaExpr::negate(num(2.0)),
                num(2.0)
            )
        );

        // After another operator
        assert_eq!(
            parse_formula("=2*-A1").unwrap(),
            FormulaExpr::binary(
                BinaryOperator::Multiply,
                num(2.0),
                FormulaExpr::UnaryOp {
                    op: UnaryOperator::Negate,
                    operand: Box::new(cell("A1")),
                }
            )
        );

        // Unary plus is not part of the grammar
        assert!(matches!(parse_formula("=+5"), Err(FormulaError::Parse(_))));
    }

    #[test]
    fn test_parse_cell_reference() {
        assert_eq!(parse_formula("=A1").unwrap(), cell("A1"));
        assert_eq!(parse_formula("=aa12").unwrap(), cell("AA12"));
        assert_eq!(
            parse_formula("=A1+B2").unwrap(),
            FormulaExpr::binary(BinaryOperator::Add, cell("A1"), cell("B2"))
        );
    }

    #[test]
    fn test_parse_function() {
        assert_eq!(
            parse_formula("=sum(1,2,3)").unwrap(),
            FormulaExpr::Call {
                name: "SUM".into(),
                args: vec![num(1.0), num(2.0), num(3.0)],
            }
        );

        assert_eq!(
            parse_formula("=SUM()").unwrap(),
            FormulaExpr::Call {
                name: "SUM".into(),
                args: vec![],
            }
        );

        // Looks like a cell, but followed by '('
        assert!(matches!(
            parse_formula("=LOG10(100)").unwrap(),
            FormulaExpr::Call { ref name, .. } if name == "LOG10"
        ));
    }

    #[test]
    fn test_parse_range_argument() {
        assert_eq!(
            parse_formula("=SUM(B3:A1)").unwrap(),
            FormulaExpr::Call {
                name: "SUM".into(),
                args: vec![FormulaExpr::Range(CellRange::new(
                    CellAddress::new(0, 0),
                    CellAddress::new(1, 2)
                ))],
            }
        );
    }

    #[test]
    fn test_parse_nested_function() {
        let ast = parse_formula("=IF(A1,SUM(B1:B10),0)*2").unwrap();
        if let FormulaExpr::BinaryOp { op, left, .. } = ast {
            assert_eq!(op, BinaryOperator::Multiply);
            assert!(matches!(*left, FormulaExpr::Call { ref args, .. } if args.len() == 3));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_invalid_range() {
        assert!(matches!(
            parse_formula("=SUM(A1:ZZ)"),
            Err(FormulaError::InvalidRange(_))
        ));
        assert!(matches!(
            parse_formula("=SUM(ZZ:A1)"),
            Err(FormulaError::InvalidRange(_))
        ));
        assert!(matches!(
            parse_formula("=SUM(1:2)"),
            Err(FormulaError::InvalidRange(_))
        ));
        assert!(matches!(
            parse_formula("=SUM(A1:)"),
            Err(FormulaError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_parse_errors() {
        for formula in [
            "=", "=1+", "=(1+2", "=1+2)", "=*3", "=SUM(1,)", "=A1:B2", "=FOO", "=1 2", "=A0",
        ] {
            assert!(
                matches!(parse_formula(formula), Err(FormulaError::Parse(_))),
                "{formula} should be a parse error"
            );
        }
    }

    fn is_too_deep(formula: &str) -> bool {
        matches!(
            parse_formula(formula),
            Err(FormulaError::Parse(msg)) if msg.contains("nested deeper")
        )
    }

    #[test]
    fn test_nesting_limit() {
        let depth = MAX_NESTING_DEPTH;
        let parens = format!("={}1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(parse_formula(&parens).unwrap(), num(1.0));

        let parens = format!("={}1{}", "(".repeat(depth + 1), ")".repeat(depth + 1));
        assert!(is_too_deep(&parens));
        assert!(is_too_deep(&format!("={}1{}", "(".repeat(10_000), ")".repeat(10_000))));
        // Unbalanced input stops at the limit too
        assert!(is_too_deep(&format!("={}", "(".repeat(200_000))));
    }

    #[test]
    fn test_unary_chain_limit() {
        assert!(parse_formula(&format!("={}1", "-".repeat(MAX_NESTING_DEPTH - 1))).is_ok());
        assert!(is_too_deep(&format!("={}1", "-".repeat(MAX_NESTING_DEPTH))));
        assert!(is_too_deep(&format!("={}1", "-".repeat(10_000))));
    }

    #[test]
    fn test_operator_chain_limit() {
        let short = format!("=1{}", "+1".repeat(MAX_NESTING_DEPTH - 1));
        assert!(parse_formula(&short).is_ok());
        assert!(is_too_deep(&format!("=1{}", "+1".repeat(10_000))));
        assert!(is_too_deep(&format!("=2{}", "^1".repeat(10_000))));
    }

    #[test]
    fn test_nested_call_limit() {
        let calls = format!("={}1{}", "SUM(".repeat(10_000), ")".repeat(10_000));
        assert!(is_too_deep(&calls));

        let calls = format!("={}1{}", "ABS(".repeat(100), ")".repeat(100));
        assert!(parse_formula(&calls).is_ok());
    }
}
