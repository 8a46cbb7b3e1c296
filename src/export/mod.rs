//! Saving worksheets as delimited text files
//!
//! Each config either names one worksheet (or the first one by default) or uses
//! `*` to save every worksheet of the workbook. The first failure stops the run.

use crate::engine::{Grid, SpreadsheetEngine, Workbook};
use crate::error::{XlError, XlResult};
use crate::output::build_path;
use crate::range::{normalize, RangeRef};
use crate::types::{ConfigMap, ExportConfig, WorksheetSelector};
use chrono::{DateTime, Local};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Options shared by every export of a run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Base folder for relative workbook paths and, by default, output files
    pub folder: PathBuf,
    /// Write output files under this folder instead of `folder`
    pub output_dir: Option<PathBuf>,
    pub extension: String,
    pub delimiter: char,
    /// Resolve ranges and paths but write nothing
    pub dry_run: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("."),
            output_dir: None,
            extension: "txt".to_string(),
            delimiter: '\t',
            dry_run: false,
        }
    }
}

impl ExportOptions {
    pub fn with_folder(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            ..Self::default()
        }
    }

    fn output_root(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.folder)
    }
}

/// One worksheet saved (or planned, in a dry run)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetExport {
    pub key: String,
    pub workbook: PathBuf,
    pub worksheet: String,
    /// Normalized range, `None` when the whole populated extent was saved
    pub range: Option<String>,
    pub path: PathBuf,
    pub rows: usize,
    pub bytes: u64,
}

/// Everything a run exported, in order
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub exports: Vec<SheetExport>,
}

impl RunSummary {
    pub fn len(&self) -> usize {
        self.exports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.exports.iter().map(|e| e.rows).sum()
    }
}

/// Drives the export of a resolved run configuration
pub struct Exporter<E: SpreadsheetEngine> {
    engine: E,
    options: ExportOptions,
}

impl<E: SpreadsheetEngine> Exporter<E> {
    pub fn new(engine: E, options: ExportOptions) -> Self {
        Self { engine, options }
    }

    /// Export every config in order, stopping at the first error
    pub fn run(&self, configs: &ConfigMap) -> XlResult<RunSummary> {
        let mut summary = RunSummary::default();
        for config in configs {
            let exports = if config.worksheet.is_all() {
                self.export_workbook(config)?
            } else {
                vec![self.export_worksheet(config)?]
            };
            summary.exports.extend(exports);
        }
        Ok(summary)
    }

    /// Save every worksheet of the workbook with the same range template
    pub fn export_workbook(&self, config: &ExportConfig) -> XlResult<Vec<SheetExport>> {
        let workbook_path = self.workbook_path(config);
        let mut workbook = self.engine.open(&workbook_path)?;
        info!(workbook = %workbook_path.display(), key = %config.key, "saving all worksheets");

        let mut exports = Vec::new();
        for name in workbook.sheet_names() {
            let grid = workbook.worksheet(&name)?;
            exports.push(self.save_grid(config, &workbook_path, &grid)?);
        }
        Ok(exports)
    }

    /// Save the named worksheet, or the first one if none is named
    pub fn export_worksheet(&self, config: &ExportConfig) -> XlResult<SheetExport> {
        let workbook_path = self.workbook_path(config);
        let mut workbook = self.engine.open(&workbook_path)?;
        let grid = select_worksheet(workbook.as_mut(), &config.worksheet, &workbook_path)?;
        self.save_grid(config, &workbook_path, &grid)
    }

    fn workbook_path(&self, config: &ExportConfig) -> PathBuf {
        self.options.folder.join(&config.file_name)
    }

    /// Workbook name as seen from `folder`, so an absolute path below it keeps
    /// its subfolders in the output tree
    fn output_name<'a>(&self, file_name: &'a str) -> &'a str {
        Path::new(file_name)
            .strip_prefix(&self.options.folder)
            .ok()
            .and_then(Path::to_str)
            .unwrap_or(file_name)
    }

    fn save_grid(
        &self,
        config: &ExportConfig,
        workbook_path: &Path,
        grid: &Grid,
    ) -> XlResult<SheetExport> {
        let sheet = grid.name();
        debug!(sheet, range = ?config.range, "saving worksheet");

        let last_row = grid.last_populated_row();
        if last_row < 1 {
            return Err(XlError::EmptyWorksheet(sheet.to_string()));
        }

        let range = normalize(config.range.as_deref(), last_row)?;
        let bounds = range.as_deref().map(str::parse::<RangeRef>).transpose()?;

        let path = build_path(
            Some(self.options.output_root()),
            Some(self.output_name(&config.file_name)),
            Some(sheet),
            &self.options.extension,
        )?;

        if self.options.dry_run {
            info!(sheet, path = %path.display(), "dry run, not writing");
            return Ok(SheetExport {
                key: config.key.clone(),
                workbook: workbook_path.to_path_buf(),
                worksheet: sheet.to_string(),
                range,
                path,
                rows: 0,
                bytes: 0,
            });
        }

        remove_existing(&path)?;

        // The scratch grid lives only for this export.
        let scratch = match &bounds {
            Some(bounds) => grid.copy_range(bounds),
            None => grid.populated(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(&path)?;
        let rows = scratch.write_delimited(BufWriter::new(file), self.options.delimiter)?;

        if !path.exists() {
            return Err(XlError::WriteVerification(path));
        }

        let meta = fs::metadata(&path)?;
        let modified = meta
            .modified()
            .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        info!(
            workbook = %workbook_path.display(),
            sheet,
            range = range.as_deref().unwrap_or("<all>"),
            path = %path.display(),
            bytes = meta.len(),
            modified = %modified,
            "saved worksheet as tab separated text"
        );

        Ok(SheetExport {
            key: config.key.clone(),
            workbook: workbook_path.to_path_buf(),
            worksheet: sheet.to_string(),
            range,
            path,
            rows,
            bytes: meta.len(),
        })
    }
}

/// Pick the worksheet a config names, or the first one
fn select_worksheet(
    workbook: &mut dyn Workbook,
    selector: &WorksheetSelector,
    workbook_path: &Path,
) -> XlResult<Grid> {
    let name = match selector {
        WorksheetSelector::Named(name) => name.clone(),
        _ => workbook
            .sheet_names()
            .into_iter()
            .next()
            .ok_or_else(|| XlError::WorksheetNotFound {
                worksheet: selector.to_string(),
                workbook: workbook_path.display().to_string(),
            })?,
    };

    if !workbook.sheet_names().contains(&name) {
        return Err(XlError::WorksheetNotFound {
            worksheet: name,
            workbook: workbook_path.display().to_string(),
        });
    }
    workbook.worksheet(&name)
}

/// Delete a previous output file, failing if it is still there afterwards
fn remove_existing(path: &Path) -> XlResult<()> {
    if path.exists() {
        debug!(path = %path.display(), "deleting previous output");
        fs::remove_file(path)?;
    }
    if path.exists() {
        return Err(XlError::StaleOutput(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_remove_existing_deletes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("old.Sheet1.txt");
        fs::write(&path, "stale").unwrap();
        remove_existing(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_remove_existing_missing_file_is_ok() {
        let dir = TempDir::new().unwrap();
        assert!(remove_existing(&dir.path().join("none.txt")).is_ok());
    }

    #[test]
    fn test_output_name_strips_base_folder() {
        struct NoEngine;
        impl SpreadsheetEngine for NoEngine {
            fn open(&self, path: &Path) -> XlResult<Box<dyn Workbook>> {
                Err(XlError::Workbook(path.display().to_string()))
            }
        }

        let exporter = Exporter::new(NoEngine, ExportOptions::with_folder("/data"));
        assert_eq!(exporter.output_name("/data/in/book.xlsx"), "in/book.xlsx");
        assert_eq!(exporter.output_name("/elsewhere/book.xlsx"), "/elsewhere/book.xlsx");
        assert_eq!(exporter.output_name("in/book.xlsx"), "in/book.xlsx");
    }

    #[test]
    fn test_output_root_prefers_output_dir() {
        let mut options = ExportOptions::with_folder("in");
        assert_eq!(options.output_root(), Path::new("in"));
        options.output_dir = Some(PathBuf::from("out"));
        assert_eq!(options.output_root(), Path::new("out"));
    }
}
