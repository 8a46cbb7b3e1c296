//! In-memory worksheet cells and the delimited text serializer

use crate::error::XlResult;
use crate::range::{CellRef, RangeRef};
use calamine::{Data, Range};
use chrono::Timelike;
use std::io::Write;

/// The cells of one worksheet (or of a range cut out of one)
///
/// Positions are absolute worksheet coordinates, so a grid cut from `B3:D9`
/// still reports row 9 as its last row.
#[derive(Debug, Clone)]
pub struct Grid {
    name: String,
    cells: Range<Data>,
    window: Option<Window>,
}

/// Extent written for a cut: every requested row, and the requested columns
/// that fall within the source's stored columns
#[derive(Debug, Clone, Copy)]
struct Window {
    range: RangeRef,
    /// One past the last column written
    col_end: u32,
}

impl Grid {
    pub fn new(name: impl Into<String>, cells: Range<Data>) -> Self {
        Self {
            name: name.into(),
            cells,
            window: None,
        }
    }

    /// Build a grid anchored at A1 from row-major values
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<Data>>) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        if height == 0 || width == 0 {
            return Self::new(name, Range::empty());
        }

        let mut cells = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                cells.set_value((r as u32, c as u32), value);
            }
        }
        Self::new(name, cells)
    }

    /// Worksheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows written, including empty ones
    pub fn height(&self) -> usize {
        match &self.window {
            Some(window) => window.range.height() as usize,
            None => self.cells.height(),
        }
    }

    /// 1-based number of the last row holding a non-empty cell, 0 if none
    pub fn last_populated_row(&self) -> u32 {
        let Some((first_row, _)) = self.cells.start() else {
            return 0;
        };

        self.cells
            .rows()
            .enumerate()
            .filter(|(_, row)| row.iter().any(|cell| !is_blank(cell)))
            .map(|(idx, _)| first_row + idx as u32 + 1)
            .last()
            .unwrap_or(0)
    }

    /// The populated extent: stored columns, rows from the first stored one down
    /// to the last populated one
    pub fn populated(&self) -> Grid {
        let last_row = self.last_populated_row();
        match (self.cells.start(), self.cells.end()) {
            (Some(start), Some(end)) if last_row > 0 => self.copy_range(&RangeRef {
                start: CellRef::new(start.0, start.1),
                end: CellRef::new(last_row - 1, end.1),
            }),
            _ => Grid::new(self.name.clone(), Range::empty()),
        }
    }

    /// Cut `range` out into a new scratch grid
    ///
    /// Only the cells overlapping the stored data are copied. Rows past the data
    /// are padded with empty cells when written; columns past the stored columns
    /// are not written.
    pub fn copy_range(&self, range: &RangeRef) -> Grid {
        let (cells, col_end) = match (self.cells.start(), self.cells.end()) {
            (Some(start), Some(end)) => {
                let top = range.start.row.max(start.0);
                let bottom = range.end.row.min(end.0);
                let left = range.start.col.max(start.1);
                let right = range.end.col.min(end.1);

                let cells = if top <= bottom && left <= right {
                    let mut scratch = Range::new((top, left), (bottom, right));
                    for row in top..=bottom {
                        for col in left..=right {
                            if let Some(value) = self.cells.get_value((row, col)) {
                                if !matches!(value, Data::Empty) {
                                    scratch.set_value((row, col), value.clone());
                                }
                            }
                        }
                    }
                    scratch
                } else {
                    Range::empty()
                };
                (cells, (right + 1).max(range.start.col))
            }
            _ => (Range::empty(), range.start.col),
        };

        Grid {
            name: self.name.clone(),
            cells,
            window: Some(Window {
                range: *range,
                col_end,
            }),
        }
    }

    /// Write one line per row, cells joined by `delimiter`. Returns the row count.
    pub fn write_delimited<W: Write>(&self, mut out: W, delimiter: char) -> XlResult<usize> {
        let mut sep = [0u8; 4];
        let sep = delimiter.encode_utf8(&mut sep).as_bytes();

        let (rows, cols) = match (&self.window, self.cells.start(), self.cells.end()) {
            (Some(window), _, _) => (
                window.range.start.row..=window.range.end.row,
                window.range.start.col..window.col_end,
            ),
            (None, Some(start), Some(end)) => (start.0..=end.0, start.1..end.1 + 1),
            _ => {
                out.flush()?;
                return Ok(0);
            }
        };

        let mut count = 0;
        for row in rows {
            for col in cols.clone() {
                if col > cols.start {
                    out.write_all(sep)?;
                }
                if let Some(cell) = self.cells.get_value((row, col)) {
                    out.write_all(format_cell(cell, delimiter).as_bytes())?;
                }
            }
            out.write_all(b"\n")?;
            count += 1;
        }
        out.flush()?;
        Ok(count)
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Render a cell as plain text
pub fn format_cell(cell: &Data, delimiter: char) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s
            .chars()
            .map(|c| {
                if c == delimiter || c == '\t' || c == '\r' || c == '\n' {
                    ' '
                } else {
                    c
                }
            })
            .collect(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                return dt.as_f64().to_string();
            }
            match dt.as_datetime() {
                Some(ndt) if ndt.num_seconds_from_midnight() == 0 => {
                    ndt.format("%Y-%m-%d").to_string()
                }
                Some(ndt) => ndt.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => dt.as_f64().to_string(),
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}
