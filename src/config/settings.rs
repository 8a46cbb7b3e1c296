//! JSON run configuration
//!
//! ```json
//! { "appSettings": {
//!     "Schedule": { "file": "Class Schedule.xlsx", "worksheet": "Week 1", "range": "A2:P" },
//!     "AllSheets": { "file": "Attendance/Report.xlsx", "worksheet": "*" }
//! } }
//! ```

use crate::error::{XlError, XlResult};
use crate::types::{ConfigMap, ExportConfig};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(rename = "appSettings")]
    app_settings: AppSettings,
}

/// One `appSettings` member
#[derive(Debug, Default, Deserialize)]
struct SettingsEntry {
    file: Option<String>,
    worksheet: Option<String>,
    range: Option<String>,
}

/// `appSettings` members in document order
#[derive(Debug)]
struct AppSettings(Vec<(String, SettingsEntry)>);

impl<'de> Deserialize<'de> for AppSettings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = AppSettings;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of named export entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<AppSettings, A::Error> {
                let mut seen = HashSet::new();
                let mut entries = Vec::new();
                while let Some((key, entry)) = map.next_entry::<String, SettingsEntry>()? {
                    if !seen.insert(key.clone()) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate entry '{}'",
                            key
                        )));
                    }
                    entries.push((key, entry));
                }
                Ok(AppSettings(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Parse a JSON run configuration document
pub fn parse_settings(content: &str) -> XlResult<ConfigMap> {
    let settings: SettingsFile = serde_json::from_str(content)
        .map_err(|e| XlError::ConfigParse(e.to_string()))?;

    if settings.app_settings.0.is_empty() {
        return Err(XlError::ConfigParse(
            "'appSettings' has no entries".to_string(),
        ));
    }

    let mut map = ConfigMap::new();
    for (key, entry) in settings.app_settings.0 {
        let file = entry
            .file
            .filter(|f| !f.is_empty())
            .ok_or_else(|| XlError::ConfigParse(format!("entry '{}' has no 'file'", key)))?;
        map.insert(ExportConfig::new(
            key,
            file,
            entry.worksheet.as_deref(),
            entry.range.as_deref(),
        )?)?;
    }

    Ok(map)
}

/// Read and parse a JSON run configuration file
pub fn load_settings(path: &Path) -> XlResult<ConfigMap> {
    let content = fs::read_to_string(path)?;
    parse_settings(&content).map_err(|e| match e {
        XlError::ConfigParse(msg) => XlError::ConfigParse(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WorksheetSelector;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "appSettings": {
            "AllSheets": { "file": "GMeet Attendance Report.xlsx", "worksheet": "*", "range": "A1:G" },
            "Company ImportCorrections": { "file": "ImportCorrections_221018-Company.xlsx" },
            "Crops ImportCorrections": { "file": "ImportCorrections_221018-Crops.xlsx", "worksheet": "", "range": "" },
            "Pathogens ImportCorrections": { "file": "ImportCorrections_221018-Pathogens_A-C.xlsx", "worksheet": "Pathogens", "range": "A1:R5000" }
        }
    }"#;

    #[test]
    fn test_parse_settings_entries() {
        let map = parse_settings(SAMPLE).unwrap();
        assert_eq!(map.len(), 4);

        let all = map.get("AllSheets").unwrap();
        assert_eq!(all.file_name, "GMeet Attendance Report.xlsx");
        assert_eq!(all.worksheet, WorksheetSelector::All);
        assert_eq!(all.range.as_deref(), Some("A1:G"));

        let company = map.get("Company ImportCorrections").unwrap();
        assert_eq!(company.worksheet, WorksheetSelector::First);
        assert_eq!(company.range, None);

        let crops = map.get("Crops ImportCorrections").unwrap();
        assert_eq!(crops.worksheet, WorksheetSelector::First);
        assert_eq!(crops.range, None);

        let pathogens = map.get("Pathogens ImportCorrections").unwrap();
        assert_eq!(
            pathogens.worksheet,
            WorksheetSelector::Named("Pathogens".to_string())
        );
        assert_eq!(pathogens.range.as_deref(), Some("A1:R5000"));
    }

    #[test]
    fn test_parse_settings_keeps_document_order() {
        let map = parse_settings(SAMPLE).unwrap();
        assert_eq!(
            map.keys().collect::<Vec<_>>(),
            vec![
                "AllSheets",
                "Company ImportCorrections",
                "Crops ImportCorrections",
                "Pathogens ImportCorrections"
            ]
        );
    }

    #[test]
    fn test_parse_settings_rejects_duplicates() {
        let json = r#"{ "appSettings": {
            "a": { "file": "one.xlsx" },
            "a": { "file": "two.xlsx" }
        } }"#;
        let err = parse_settings(json).unwrap_err();
        assert!(matches!(err, XlError::ConfigParse(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn test_parse_settings_requires_file() {
        let json = r#"{ "appSettings": { "a": { "worksheet": "Tab1" } } }"#;
        assert!(matches!(parse_settings(json), Err(XlError::ConfigParse(_))));
        let json = r#"{ "appSettings": { "a": { "file": "" } } }"#;
        assert!(matches!(parse_settings(json), Err(XlError::ConfigParse(_))));
    }

    #[test]
    fn test_parse_settings_malformed() {
        for json in [
            "not json",
            "{}",
            r#"{ "appSettings": [] }"#,
            r#"{ "appSettings": {} }"#,
        ] {
            assert!(
                matches!(parse_settings(json), Err(XlError::ConfigParse(_))),
                "expected ConfigParse for {}",
                json
            );
        }
    }
}
