//! xltxt - save spreadsheet worksheets as tab separated text files
//!
//! A run is configured either from the command line (one workbook, an optional
//! worksheet and an optional range) or from a JSON settings file listing many
//! workbooks. Ranges may leave out the end row (`A2:D`); it is filled in from the
//! worksheet's last populated row.
//!
//! # Example
//!
//! ```no_run
//! use xltxt::config::resolve;
//! use xltxt::engine::CalamineEngine;
//! use xltxt::export::{ExportOptions, Exporter};
//!
//! let args = vec!["report.xlsx".to_string(), "Sheet1".to_string(), "A2:D".to_string()];
//! let configs = resolve(&args)?;
//!
//! let exporter = Exporter::new(CalamineEngine, ExportOptions::with_folder("."));
//! let summary = exporter.run(&configs)?;
//! println!("Saved {} worksheet(s)", summary.len());
//! # Ok::<(), xltxt::error::XlError>(())
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod output;
pub mod range;
pub mod types;

// Re-export commonly used types
pub use error::{XlError, XlResult};
pub use types::{ConfigMap, ExportConfig, InputMode, WorksheetSelector};
