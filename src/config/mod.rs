//! Run configuration: command-line arguments or a JSON settings file
//!
//! Both input modes resolve to one [`ConfigMap`] so the exporter never needs to
//! know where a config came from.

mod settings;

pub use settings::{load_settings, parse_settings};

use crate::error::{XlError, XlResult};
use crate::types::{ConfigMap, ExportConfig, InputMode};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Extensions treated as workbooks in auto mode
pub const SPREADSHEET_EXTENSIONS: [&str; 7] = ["xlsx", "xlsm", "xlsb", "xls", "xla", "xlam", "ods"];

/// Resolve process arguments into a run configuration, detecting the mode
pub fn resolve(args: &[String]) -> XlResult<ConfigMap> {
    resolve_with_mode(args, InputMode::Auto)
}

/// Resolve process arguments using an explicit input mode
pub fn resolve_with_mode(args: &[String], mode: InputMode) -> XlResult<ConfigMap> {
    let Some(first) = args.first() else {
        return Err(XlError::InvalidArguments(
            "at least 1 argument is required: a json config file or a workbook path, [worksheet], [range]"
                .to_string(),
        ));
    };

    let mode = match mode {
        InputMode::Auto => detect_mode(Path::new(first)),
        explicit => explicit,
    };
    debug!(?mode, path = %first, "resolving run configuration");

    match mode {
        InputMode::File => load_settings(Path::new(first)),
        _ => from_command_line(args),
    }
}

/// Decide between a workbook path and a JSON settings file
///
/// `.json` means a settings file and a known spreadsheet extension means a
/// workbook. Anything else is a settings file only if its content starts with `{`.
pub fn detect_mode(path: &Path) -> InputMode {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());

    match ext.as_deref() {
        Some("json") => InputMode::File,
        Some(e) if SPREADSHEET_EXTENSIONS.contains(&e) => InputMode::Cli,
        _ if looks_like_json(path) => InputMode::File,
        _ => InputMode::Cli,
    }
}

fn looks_like_json(path: &Path) -> bool {
    let Ok(file) = fs::File::open(path) else {
        return false;
    };

    let mut head = Vec::with_capacity(256);
    if file.take(256).read_to_end(&mut head).is_err() {
        return false;
    }

    head.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
}

/// Build the single config of CLI mode: `<file> [worksheet] [range]`
pub fn from_command_line(args: &[String]) -> XlResult<ConfigMap> {
    let file = args
        .first()
        .filter(|f| !f.is_empty())
        .ok_or_else(|| XlError::InvalidArguments("a workbook path is required".to_string()))?;
    if args.len() > 3 {
        return Err(XlError::InvalidArguments(format!(
            "expected at most 3 arguments (workbook, worksheet, range), got {}",
            args.len()
        )));
    }

    let key = Path::new(file)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.clone());

    let mut map = ConfigMap::new();
    map.insert(ExportConfig::new(
        key,
        file.as_str(),
        args.get(1).map(String::as_str),
        args.get(2).map(String::as_str),
    )?)?;
    Ok(map)
}
