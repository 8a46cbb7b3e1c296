//! Spreadsheet engine: opening workbooks and reading worksheet cells
//!
//! The export pipeline only talks to the [`SpreadsheetEngine`] and [`Workbook`]
//! traits. [`CalamineEngine`] is the real implementation; tests plug in
//! in-memory workbooks.

mod grid;
mod reader;

pub use grid::{format_cell, Grid};
pub use reader::CalamineEngine;

use crate::error::XlResult;
use std::path::Path;

/// An open workbook
pub trait Workbook {
    /// Worksheet names in the workbook's own order
    fn sheet_names(&self) -> Vec<String>;

    /// Read the cells of a worksheet by name
    fn worksheet(&mut self, name: &str) -> XlResult<Grid>;
}

/// Opens workbooks from disk
pub trait SpreadsheetEngine {
    fn open(&self, path: &Path) -> XlResult<Box<dyn Workbook>>;
}
