//! Cell-related types
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A rectangular range of cells (e.g., "A1:B10")
//! - [`Cell`] - The stored contents of a cell

mod address;
mod data;

pub use address::{CellAddress, CellRange, CellRangeIterator};
pub use data::Cell;
