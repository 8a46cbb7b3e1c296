use super::{Grid, SpreadsheetEngine, Workbook};
use crate::error::{XlError, XlResult};
use calamine::{open_workbook_auto, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Reads xlsx, xlsm, xlsb, xls and ods workbooks through calamine
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineEngine;

impl SpreadsheetEngine for CalamineEngine {
    fn open(&self, path: &Path) -> XlResult<Box<dyn Workbook>> {
        let sheets = open_workbook_auto(path).map_err(|e| {
            XlError::Workbook(format!("Failed to open {}: {}", path.display(), e))
        })?;

        Ok(Box::new(CalamineWorkbook {
            path: path.to_path_buf(),
            sheets,
        }))
    }
}

struct CalamineWorkbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl Workbook for CalamineWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn worksheet(&mut self, name: &str) -> XlResult<Grid> {
        if !self.sheets.sheet_names().iter().any(|n| n == name) {
            return Err(XlError::WorksheetNotFound {
                worksheet: name.to_string(),
                workbook: self.path.display().to_string(),
            });
        }

        let range = self.sheets.worksheet_range(name).map_err(|e| {
            XlError::Workbook(format!(
                "Failed to read worksheet '{}' of {}: {}",
                name,
                self.path.display(),
                e
            ))
        })?;

        Ok(Grid::new(name, range))
    }
}
