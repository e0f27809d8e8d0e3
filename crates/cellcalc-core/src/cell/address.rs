//! Cell address and range types

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1", "AA12")
///
/// The column is written as base-26 letters with no zero digit (A=0, Z=25,
/// AA=26, ...) and the row as a 1-based decimal number. Internally both are
/// 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellAddress {
    /// Column index (0-based, A=0, B=1, ..., AA=26)
    pub col: u32,
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
}

impl CellAddress {
    /// Create a new cell address from 0-based column and row indices
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// The text must be a non-empty run of ASCII letters followed by a
    /// non-empty run of ASCII digits naming a row of at least 1. Anything
    /// else is rejected.
    ///
    /// # Examples
    /// ```
    /// use cellcalc_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A1").unwrap();
    /// assert_eq!(addr.col, 0);
    /// assert_eq!(addr.row, 0);
    ///
    /// let addr = CellAddress::parse("AA12").unwrap();
    /// assert_eq!(addr.col, 26);
    /// assert_eq!(addr.row, 11);
    ///
    /// assert!(CellAddress::parse("1A").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let letters_end = bytes
            .iter()
            .position(|b| !b.is_ascii_alphabetic())
            .unwrap_or(bytes.len());

        if letters_end == 0 {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }

        let row_str = &s[letters_end..];
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }

        // `u32::from_str` would accept a leading '+', so check the run first
        if !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "invalid row number in '{}'",
                s
            )));
        }

        let col = Self::letters_to_column(&s[..letters_end])?;

        // Rows are 1-based in text, 0-based internally
        let row: u64 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("row number too large in '{}'", s)))?;

        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        let row = u32::try_from(row - 1)
            .map_err(|_| Error::InvalidAddress(format!("row number too large in '{}'", s)))?;

        Ok(Self { col, row })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u32) -> String {
        let mut letters = Vec::new();
        let mut n = col as u64 + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            letters.push((n % 26) as u8 + b'A');
            n /= 26;
        }

        letters.iter().rev().map(|&b| b as char).collect()
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    ///
    /// Letters are case-insensitive.
    pub fn letters_to_column(letters: &str) -> Result<u32> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u64 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u64 - 'A' as u64 + 1);
            if col > u32::MAX as u64 + 1 {
                return Err(Error::InvalidAddress(format!(
                    "column '{}' out of range",
                    letters
                )));
            }
        }

        Ok((col - 1) as u32)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row as u64 + 1)
    }

    /// Create a range from this address to another
    pub fn to(&self, other: CellAddress) -> CellRange {
        CellRange::new(*self, other)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A rectangular range of cells (e.g., "A1:B10"), inclusive on both ends
///
/// `start` is always the top-left corner and `end` the bottom-right one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    start: CellAddress,
    end: CellAddress,
}

impl CellRange {
    /// Create a new cell range
    ///
    /// The corners may be given in any order; the range is normalized so
    /// `start` is top-left and `end` is bottom-right.
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        Self {
            start: CellAddress::new(a.col.min(b.col), a.row.min(b.row)),
            end: CellAddress::new(a.col.max(b.col), a.row.max(b.row)),
        }
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Top-left corner
    pub fn start(&self) -> CellAddress {
        self.start
    }

    /// Bottom-right corner
    pub fn end(&self) -> CellAddress {
        self.end
    }

    /// Parse a range from `start:end` notation
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        let (start, end) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidRange(format!("missing ':' in '{}'", s)))?;

        let start = CellAddress::parse(start)
            .map_err(|e| Error::InvalidRange(format!("bad start of '{}': {}", s, e)))?;
        let end = CellAddress::parse(end)
            .map_err(|e| Error::InvalidRange(format!("bad end of '{}': {}", s, e)))?;

        Ok(Self::new(start, end))
    }

    /// Check if a cell is within this range
    pub fn contains(&self, addr: &CellAddress) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u64 {
        (self.end.row - self.start.row) as u64 + 1
    }

    /// Get the number of columns in the range
    pub fn col_count(&self) -> u64 {
        (self.end.col - self.start.col) as u64 + 1
    }

    /// Get the total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.row_count().saturating_mul(self.col_count())
    }

    /// Iterate over all cell addresses in the range (row by row)
    pub fn cells(&self) -> CellRangeIterator {
        CellRangeIterator {
            range: *self,
            next: Some(self.start),
        }
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        format!("{}:{}", self.start, self.end)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Iterator over cells in a range
pub struct CellRangeIterator {
    range: CellRange,
    next: Option<CellAddress>,
}

impl Iterator for CellRangeIterator {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        let addr = self.next?;

        self.next = if addr.col < self.range.end.col {
            Some(CellAddress::new(addr.col + 1, addr.row))
        } else if addr.row < self.range.end.row {
            Some(CellAddress::new(self.range.start.col, addr.row + 1))
        } else {
            None
        };

        Some(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(CellAddress::column_to_letters(0), "A");
        assert_eq!(CellAddress::column_to_letters(1), "B");
        assert_eq!(CellAddress::column_to_letters(25), "Z");
        assert_eq!(CellAddress::column_to_letters(26), "AA");
        assert_eq!(CellAddress::column_to_letters(27), "AB");
        assert_eq!(CellAddress::column_to_letters(701), "ZZ");
        assert_eq!(CellAddress::column_to_letters(702), "AAA");
        assert_eq!(CellAddress::column_to_letters(u32::MAX), "MWLQKWV");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(CellAddress::letters_to_column("A").unwrap(), 0);
        assert_eq!(CellAddress::letters_to_column("Z").unwrap(), 25);
        assert_eq!(CellAddress::letters_to_column("AA").unwrap(), 26);
        assert_eq!(CellAddress::letters_to_column("ZZ").unwrap(), 701);
        assert_eq!(CellAddress::letters_to_column("AAA").unwrap(), 702);
        assert_eq!(CellAddress::letters_to_column("MWLQKWV").unwrap(), u32::MAX);

        // Case insensitive
        assert_eq!(CellAddress::letters_to_column("aa").unwrap(), 26);

        assert!(CellAddress::letters_to_column("MWLQKWW").is_err());
        assert!(CellAddress::letters_to_column(&"Z".repeat(40)).is_err());
    }

    #[test]
    fn test_cell_address_parse() {
        let addr = CellAddress::parse("A1").unwrap();
        assert_eq!(addr, CellAddress::new(0, 0));

        let addr = CellAddress::parse("B2").unwrap();
        assert_eq!(addr, CellAddress::new(1, 1));

        let addr = CellAddress::parse("AA12").unwrap();
        assert_eq!(addr, CellAddress::new(26, 11));

        let addr = CellAddress::parse("c100").unwrap();
        assert_eq!(addr, CellAddress::new(2, 99));
    }

    #[test]
    fn test_cell_address_parse_errors() {
        assert!(CellAddress::parse("").is_err());
        assert!(CellAddress::parse("A").is_err());
        assert!(CellAddress::parse("1").is_err());
        assert!(CellAddress::parse("1A").is_err());
        assert!(CellAddress::parse("A1B").is_err());
        assert!(CellAddress::parse("A1B2").is_err());
        assert!(CellAddress::parse("A0").is_err());
        assert!(CellAddress::parse("A+1").is_err());
        assert!(CellAddress::parse("A-1").is_err());
        assert!(CellAddress::parse("$A$1").is_err());
        assert!(CellAddress::parse("A99999999999").is_err());
    }

    #[test]
    fn test_cell_address_display() {
        assert_eq!(CellAddress::new(0, 0).to_string(), "A1");
        assert_eq!(CellAddress::new(2, 99).to_string(), "C100");
        assert_eq!(CellAddress::new(26, 11).to_string(), "AA12");
        assert_eq!(CellAddress::new(0, u32::MAX).to_string(), "A4294967296");
        assert_eq!(
            CellAddress::parse("A4294967296").unwrap(),
            CellAddress::new(0, u32::MAX)
        );
        assert!(CellAddress::parse("A4294967297").is_err());
    }

    #[test]
    fn test_cell_range_parse() {
        let range = CellRange::parse("A1:B2").unwrap();
        assert_eq!(range.start(), CellAddress::new(0, 0));
        assert_eq!(range.end(), CellAddress::new(1, 1));

        // Corners in any order
        let range = CellRange::parse("B3:A1").unwrap();
        assert_eq!(range.start(), CellAddress::new(0, 0));
        assert_eq!(range.end(), CellAddress::new(1, 2));

        let range = CellRange::parse("A3:B1").unwrap();
        assert_eq!(range.start(), CellAddress::new(0, 0));
        assert_eq!(range.end(), CellAddress::new(1, 2));

        assert!(CellRange::parse("A1").is_err());
        assert!(CellRange::parse("A1:").is_err());
        assert!(CellRange::parse("A1:ZZ").is_err());
    }

    #[test]
    fn test_cell_range_counts() {
        let range = CellRange::parse("B2:D5").unwrap();
        assert_eq!(range.row_count(), 4);
        assert_eq!(range.col_count(), 3);
        assert_eq!(range.cell_count(), 12);

        let range = CellAddress::new(0, 0).to(CellAddress::new(u32::MAX, u32::MAX));
        assert_eq!(range.cell_count(), u64::MAX);
    }

    #[test]
    fn test_cell_range_corners_always_ordered() {
        let range = CellRange::new(CellAddress::new(5, 1), CellAddress::new(2, 9));
        assert_eq!(range.start(), CellAddress::new(2, 1));
        assert_eq!(range.end(), CellAddress::new(5, 9));
        assert_eq!(range.row_count(), 9);
        assert_eq!(range.col_count(), 4);
        assert_eq!(range.cells().count(), 36);

        let range = CellAddress::new(u32::MAX, u32::MAX).to(CellAddress::new(0, 0));
        assert_eq!(range.start(), CellAddress::new(0, 0));
        assert_eq!(range.cell_count(), u64::MAX);
    }

    proptest! {
        #[test]
        fn prop_range_counts_never_underflow(
            a_col in any::<u32>(), a_row in any::<u32>(),
            b_col in any::<u32>(), b_row in any::<u32>(),
        ) {
            let range =
                CellRange::new(CellAddress::new(a_col, a_row), CellAddress::new(b_col, b_row));
            prop_assert_eq!(range.row_count(), u64::from(a_row.abs_diff(b_row)) + 1);
            prop_assert_eq!(range.col_count(), u64::from(a_col.abs_diff(b_col)) + 1);
            prop_assert!(range.contains(&range.start()) && range.contains(&range.end()));
        }
    }

    #[test]
    fn test_cell_range_contains() {
        let range = CellRange::parse("B2:D4").unwrap();

        assert!(range.contains(&CellAddress::new(1, 1))); // B2
        assert!(range.contains(&CellAddress::new(3, 3))); // D4
        assert!(range.contains(&CellAddress::new(2, 2))); // C3

        assert!(!range.contains(&CellAddress::new(0, 0))); // A1
        assert!(!range.contains(&CellAddress::new(1, 4))); // B5
    }

    #[test]
    fn test_cell_range_iterator() {
        let range = CellRange::parse("A1:B2").unwrap();
        let cells: Vec<_> = range.cells().collect();

        assert_eq!(
            cells,
            vec![
                CellAddress::new(0, 0), // A1
                CellAddress::new(1, 0), // B1
                CellAddress::new(0, 1), // A2
                CellAddress::new(1, 1), // B2
            ]
        );

        let single = CellRange::single(CellAddress::new(4, 4));
        assert_eq!(single.cells().count(), 1);
    }

    proptest! {
        #[test]
        fn prop_address_round_trip(col in 0u32..100_000, row in 0u32..10_000_000) {
            let addr = CellAddress::new(col, row);
            prop_assert_eq!(CellAddress::parse(&addr.to_string()).unwrap(), addr);
        }

        #[test]
        fn prop_parse_never_panics(s in "\\PC{0,12}") {
            let _ = CellAddress::parse(&s);
        }
    }
}
