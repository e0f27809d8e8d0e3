//! # cellcalc-core
//!
//! Core data structures for the cellcalc formula engine.
//!
//! This crate provides the types the engine reads from:
//! - [`CellAddress`] and [`CellRange`] - A1-style addressing and rectangular ranges
//! - [`Cell`] - A stored cell: raw text, formula flag, presentation attributes
//! - [`Sheet`] - A snapshot of all cells in a sheet, keyed by canonical address
//!
//! ## Example
//!
//! ```rust
//! use cellcalc_core::{CellAddress, Sheet};
//!
//! let mut sheet = Sheet::new();
//! sheet.set("A1", "10").unwrap();
//! sheet.set("A2", "=A1*2").unwrap();
//!
//! let addr = CellAddress::parse("A2").unwrap();
//! assert!(sheet.cell_at(addr).unwrap().is_formula());
//! ```

pub mod cell;
pub mod error;
pub mod sheet;
pub mod style;

pub use cell::{Cell, CellAddress, CellRange, CellRangeIterator};
pub use error::{Error, Result};
pub use sheet::Sheet;
pub use style::{HorizontalAlignment, Presentation};
