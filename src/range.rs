//! Range expressions: end-row normalization and A1 parsing
//!
//! Operators usually give a start cell and an end column (`A3:L`) and let the
//! worksheet supply the real last populated row, because spreadsheet applications
//! often report an extent padded with trailing empty rows. A fully explicit range
//! (`A3:L120`) is always kept as written.

use crate::error::{XlError, XlResult};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::debug;

/// Rows in an Excel worksheet
pub const MAX_ROWS: u32 = 1_048_576;
/// Columns in an Excel worksheet (A..XFD)
pub const MAX_COLUMNS: u32 = 16_384;

/// Complete a range whose end part has no row number
///
/// - `None` stays `None` (the whole populated extent)
/// - `A3:L` with `last_populated_row = 417` becomes `A3:L417`
/// - a range whose end part already has a digit is returned unchanged
pub fn normalize(range: Option<&str>, last_populated_row: u32) -> XlResult<Option<String>> {
    let Some(range) = range else {
        return Ok(None);
    };

    let parts: Vec<&str> = range.split(':').collect();
    let [start, end] = parts.as_slice() else {
        return Err(XlError::invalid_range(
            range,
            "expected two cell references separated by ':'",
        ));
    };

    if end.chars().any(|c| c.is_ascii_digit()) {
        return Ok(Some(range.to_string()));
    }

    let normalized = format!("{}:{}{}", start, end, last_populated_row);
    debug!(from = range, to = %normalized, "modifying range");
    Ok(Some(normalized))
}

/// Convert a zero-based column index to letters (0 -> A, 25 -> Z, 26 -> AA)
pub fn column_index_to_letter(index: u32) -> String {
    let mut result = String::new();
    let mut idx = index;

    loop {
        let remainder = idx % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }

    result
}

/// Convert column letters to a zero-based index (A -> 0, AA -> 26)
pub fn column_letter_to_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }

    let mut acc = 0u32;
    for c in letters.to_ascii_uppercase().bytes() {
        if !c.is_ascii_uppercase() {
            return None;
        }
        acc = acc.checked_mul(26)?.checked_add((c - b'A') as u32 + 1)?;
    }
    acc.checked_sub(1)
}

fn cell_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\$?(?<letters>[A-Za-z]{1,3})\$?(?<numbers>[0-9]+)$")
            .expect("cell reference regex is valid")
    })
}

/// A single cell, zero-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl FromStr for CellRef {
    type Err = XlError;

    fn from_str(s: &str) -> XlResult<Self> {
        let caps = cell_regex()
            .captures(s.trim())
            .ok_or_else(|| XlError::invalid_range(s, "not a cell reference"))?;

        let col = column_letter_to_index(&caps["letters"])
            .filter(|c| *c < MAX_COLUMNS)
            .ok_or_else(|| XlError::invalid_range(s, "column past XFD"))?;
        let row = caps["numbers"]
            .parse::<u32>()
            .ok()
            .filter(|r| (1..=MAX_ROWS).contains(r))
            .ok_or_else(|| {
                XlError::invalid_range(s, format!("row must be between 1 and {}", MAX_ROWS))
            })?;

        Ok(CellRef::new(row - 1, col))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_index_to_letter(self.col), self.row + 1)
    }
}

/// A fully bounded rectangular range such as `A2:D42`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRef {
    pub start: CellRef,
    pub end: CellRef,
}

impl RangeRef {
    /// Number of rows covered
    pub fn height(&self) -> u32 {
        self.end.row - self.start.row + 1
    }
}

impl FromStr for RangeRef {
    type Err = XlError;

    fn from_str(s: &str) -> XlResult<Self> {
        let (start, end) = s
            .split_once(':')
            .ok_or_else(|| XlError::invalid_range(s, "expected 'start:end'"))?;

        let start: CellRef = start.parse().map_err(|e| cell_error(s, "start", e))?;
        let end: CellRef = end.parse().map_err(|e| cell_error(s, "end", e))?;

        if end.row < start.row || end.col < start.col {
            return Err(XlError::invalid_range(s, "end cell precedes start cell"));
        }

        Ok(RangeRef { start, end })
    }
}

fn cell_error(range: &str, which: &str, err: XlError) -> XlError {
    match err {
        XlError::InvalidRange { range: cell, reason } => {
            XlError::invalid_range(range, format!("bad {} cell '{}': {}", which, cell, reason))
        }
        other => other,
    }
}

impl fmt::Display for RangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_absent_range() {
        assert_eq!(normalize(None, 10).unwrap(), None);
    }

    #[test]
    fn test_normalize_appends_last_row() {
        assert_eq!(
            normalize(Some("A3:L"), 417).unwrap(),
            Some("A3:L417".to_string())
        );
        assert_eq!(normalize(Some("A1:G"), 1).unwrap(), Some("A1:G1".to_string()));
    }

    #[test]
    fn test_normalize_keeps_explicit_end_row() {
        for last in [1, 5, 5000, 100_000] {
            assert_eq!(
                normalize(Some("A1:R5000"), last).unwrap(),
                Some("A1:R5000".to_string())
            );
        }
    }

    #[test]
    fn test_normalize_column_only_ends_with_row() {
        for n in [1u32, 9, 10, 42, 65_536] {
            let out = normalize(Some("B2:AC"), n).unwrap().unwrap();
            assert!(out.ends_with(&format!("AC{}", n)));
        }
    }

    #[test]
    fn test_normalize_rejects_single_part() {
        assert!(matches!(
            normalize(Some("A1"), 3),
            Err(XlError::InvalidRange { .. })
        ));
        assert!(normalize(Some("A1:B2:C3"), 3).is_err());
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_index_to_letter(0), "A");
        assert_eq!(column_index_to_letter(25), "Z");
        assert_eq!(column_index_to_letter(26), "AA");
        assert_eq!(column_index_to_letter(701), "ZZ");
        assert_eq!(column_letter_to_index("A"), Some(0));
        assert_eq!(column_letter_to_index("ab"), Some(27));
        assert_eq!(column_letter_to_index("ZZ"), Some(701));
        assert_eq!(column_letter_to_index(""), None);
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!("A1".parse::<CellRef>().unwrap(), CellRef::new(0, 0));
        assert_eq!("$d$42".parse::<CellRef>().unwrap(), CellRef::new(41, 3));
        assert!("A0".parse::<CellRef>().is_err());
        assert!("42".parse::<CellRef>().is_err());
    }

    #[test]
    fn test_parse_range_ref() {
        let range: RangeRef = "A2:D42".parse().unwrap();
        assert_eq!(range.start, CellRef::new(1, 0));
        assert_eq!(range.end, CellRef::new(41, 3));
        assert_eq!(range.height(), 41);
        assert_eq!(range.to_string(), "A2:D42");
    }

    #[test]
    fn test_parse_range_ref_excel_limits() {
        let whole: RangeRef = "A1:XFD1048576".parse().unwrap();
        assert_eq!(whole.end, CellRef::new(MAX_ROWS - 1, MAX_COLUMNS - 1));
        assert_eq!(whole.height(), MAX_ROWS);

        for bad in ["A1:XFE1", "A1:A1048577", "A1:ZZZ2", "A1:B99999999999"] {
            assert!(
                matches!(bad.parse::<RangeRef>(), Err(XlError::InvalidRange { .. })),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_range_ref_rejects_reversed() {
        assert!("D42:A2".parse::<RangeRef>().is_err());
        assert!("A2:D".parse::<RangeRef>().is_err());
    }
}
