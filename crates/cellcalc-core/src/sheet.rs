//! Sheet snapshot

use crate::cell::{Cell, CellAddress};
use crate::error::Result;
use ahash::AHashMap;

/// All cells of one sheet, keyed by canonical A1 text ("A1", "AA12")
///
/// The document layer owns and mutates a `Sheet`; the formula engine only
/// ever borrows it immutably for the duration of one evaluation.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    cells: AHashMap<String, Cell>,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sheet from `(address, cell)` pairs under any address spelling
    ///
    /// Keys are normalized ("a1" and " A1 " both land on "A1"); pairs with
    /// malformed addresses are skipped.
    pub fn from_cells<K, I>(cells: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Cell)>,
    {
        let mut sheet = Sheet::new();
        for (address, cell) in cells {
            if let Ok(addr) = CellAddress::parse(address.as_ref()) {
                sheet.set_cell_at(addr, cell);
            }
        }
        sheet
    }

    /// Set a cell's raw text by address string, keeping its presentation
    ///
    /// # Example
    /// ```rust
    /// use cellcalc_core::Sheet;
    ///
    /// let mut sheet = Sheet::new();
    /// sheet.set("b2", "=1+1").unwrap();
    /// assert_eq!(sheet.get("B2").unwrap().raw_value(), "=1+1");
    /// assert!(sheet.set("2B", "x").is_err());
    /// ```
    pub fn set(&mut self, address: &str, raw: impl Into<String>) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_at(addr, raw);
        Ok(())
    }

    /// Set a cell's raw text by address, keeping its presentation
    pub fn set_at(&mut self, addr: CellAddress, raw: impl Into<String>) {
        self.cells
            .entry(addr.to_a1_string())
            .or_default()
            .set_raw_value(raw);
    }

    /// Insert or replace a whole cell
    pub fn set_cell_at(&mut self, addr: CellAddress, cell: Cell) {
        self.cells.insert(addr.to_a1_string(), cell);
    }

    /// Look up a cell by address string
    ///
    /// Canonical keys hit directly; other spellings (lowercase letters,
    /// surrounding whitespace) are normalized first.
    pub fn get(&self, address: &str) -> Option<&Cell> {
        if let Some(cell) = self.cells.get(address) {
            return Some(cell);
        }
        let addr = CellAddress::parse(address).ok()?;
        self.cell_at(addr)
    }

    /// Look up a cell by address
    pub fn cell_at(&self, addr: CellAddress) -> Option<&Cell> {
        self.cells.get(&addr.to_a1_string())
    }

    /// Remove a cell, returning it if it existed
    pub fn remove_at(&mut self, addr: CellAddress) -> Option<Cell> {
        self.cells.remove(&addr.to_a1_string())
    }

    /// Iterate over `(canonical address, cell)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> + '_ {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Addresses of all stored cells, sorted row by row
    pub fn addresses(&self) -> Vec<CellAddress> {
        let mut addrs: Vec<_> = self
            .cells
            .keys()
            .filter_map(|k| CellAddress::parse(k).ok())
            .collect();
        addrs.sort_by_key(|a| (a.row, a.col));
        addrs
    }

    /// Number of stored cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cells are stored
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Sheet {
    /// Collect `(address, raw)` pairs, skipping malformed addresses
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut sheet = Sheet::new();
        for (addr, raw) in iter {
            if let Ok(addr) = CellAddress::parse(addr.as_ref()) {
                sheet.set_at(addr, raw);
            }
        }
        sheet
    }
}
