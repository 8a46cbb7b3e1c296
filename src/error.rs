use std::path::PathBuf;
use thiserror::Error;

pub type XlResult<T> = Result<T, XlError>;

#[derive(Error, Debug)]
pub enum XlError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Worksheet '{worksheet}' not found in {workbook}")]
    WorksheetNotFound { worksheet: String, workbook: String },

    #[error("Worksheet '{0}' has no rows")]
    EmptyWorksheet(String),

    #[error("Invalid range '{range}': {reason}")]
    InvalidRange { range: String, reason: String },

    #[error("Failed to delete text file before this save: {0}")]
    StaleOutput(PathBuf),

    #[error("Failed to save text file: {0}")]
    WriteVerification(PathBuf),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl XlError {
    pub(crate) fn invalid_range(range: &str, reason: impl Into<String>) -> Self {
        XlError::InvalidRange {
            range: range.to_string(),
            reason: reason.into(),
        }
    }
}
