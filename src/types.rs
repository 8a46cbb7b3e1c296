use crate::error::{XlError, XlResult};
use std::fmt;
use std::str::FromStr;

//==============================================================================
// Input Mode
//==============================================================================

/// How the first positional argument of a run is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Decide from the path (extension first, then content sniffing)
    #[default]
    Auto,
    /// Positional arguments name one workbook, worksheet and range
    Cli,
    /// The first argument is a JSON run configuration
    File,
}

impl FromStr for InputMode {
    type Err = XlError;

    fn from_str(s: &str) -> XlResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(InputMode::Auto),
            "cli" => Ok(InputMode::Cli),
            "file" | "json" => Ok(InputMode::File),
            other => Err(XlError::InvalidArguments(format!(
                "unknown mode '{}', expected auto, cli or file",
                other
            ))),
        }
    }
}

//==============================================================================
// Export Configuration
//==============================================================================

/// Which worksheet(s) of a workbook to save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorksheetSelector {
    /// No worksheet given: the first one
    First,
    /// A worksheet tab name
    Named(String),
    /// The `*` wildcard: every worksheet
    All,
}

impl WorksheetSelector {
    /// Build from a raw config value; absent or empty means `First`
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => WorksheetSelector::First,
            Some("*") => WorksheetSelector::All,
            Some(name) => WorksheetSelector::Named(name.to_string()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, WorksheetSelector::All)
    }
}

impl fmt::Display for WorksheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorksheetSelector::First => write!(f, "<first>"),
            WorksheetSelector::Named(name) => write!(f, "{}", name),
            WorksheetSelector::All => write!(f, "*"),
        }
    }
}

/// One workbook to save, as resolved from the command line or a config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Unique key within a run (base file name or config member name)
    pub key: String,
    /// Workbook path, absolute or relative to the run folder
    pub file_name: String,
    pub worksheet: WorksheetSelector,
    /// Range template, `None` for the whole populated extent
    pub range: Option<String>,
}

impl ExportConfig {
    /// Create a config, normalizing empty worksheet/range values to absent
    pub fn new(
        key: impl Into<String>,
        file_name: impl Into<String>,
        worksheet: Option<&str>,
        range: Option<&str>,
    ) -> XlResult<Self> {
        let key = key.into();
        let file_name = file_name.into();
        if file_name.is_empty() {
            return Err(XlError::MissingArgument(format!(
                "workbook file name for '{}'",
                key
            )));
        }

        Ok(Self {
            key,
            file_name,
            worksheet: WorksheetSelector::from_raw(worksheet),
            range: range.filter(|r| !r.is_empty()).map(str::to_string),
        })
    }
}

//==============================================================================
// Config Map
//==============================================================================

/// Canonical run configuration: key -> ExportConfig, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMap {
    entries: Vec<ExportConfig>,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a config; a second config with the same key is rejected
    pub fn insert(&mut self, config: ExportConfig) -> XlResult<()> {
        if self.contains_key(&config.key) {
            return Err(XlError::ConfigParse(format!(
                "duplicate entry '{}'",
                config.key
            )));
        }
        self.entries.push(config);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ExportConfig> {
        self.entries.iter().find(|c| c.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|c| c.key.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExportConfig> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ConfigMap {
    type Item = &'a ExportConfig;
    type IntoIter = std::slice::Iter<'a, ExportConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
