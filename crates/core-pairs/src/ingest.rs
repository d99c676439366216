//! Spreadsheet ingestion
//!
//! Reads one named column of integers from the first worksheet of a workbook.
//! Supported formats are whatever `calamine` opens by extension (xlsx, xlsm,
//! xlsb, xls, ods). The header row is the first non-empty row of the sheet.

use crate::error::IngestError;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Column read when none is configured
pub const DEFAULT_COLUMN: &str = "Numbers";

/// Reads a column of integers out of spreadsheet files
#[derive(Debug, Clone)]
pub struct SpreadsheetIngestor {
    column: String,
}

impl Default for SpreadsheetIngestor {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMN)
    }
}

impl SpreadsheetIngestor {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Read the configured column from `path`, top to bottom
    ///
    /// Empty cells are skipped. Blocking: call from a blocking context when
    /// running inside an async runtime.
    pub fn read(&self, path: &Path) -> Result<Vec<i64>, IngestError> {
        let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| IngestError::EmptyWorkbook(path.to_path_buf()))?
            .map_err(|e| IngestError::Unreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let mut rows = range.rows();
        let header = rows.next().ok_or_else(|| IngestError::MissingColumn {
            column: self.column.clone(),
        })?;

        let position = header
            .iter()
            .position(|cell| matches!(cell, Data::String(name) if name.trim() == self.column))
            .ok_or_else(|| IngestError::MissingColumn {
                column: self.column.clone(),
            })?;

        let mut numbers = Vec::new();
        // Row numbers in errors are 1-based and count the header
        for (offset, row) in rows.enumerate() {
            let Some(cell) = row.get(position) else {
                continue;
            };
            if let Some(value) = cell_to_integer(cell).map_err(|value| IngestError::InvalidCell {
                row: offset + 2,
                value,
            })? {
                numbers.push(value);
            }
        }

        tracing::debug!(
            path = %path.display(),
            column = %self.column,
            count = numbers.len(),
            "spreadsheet column read"
        );

        Ok(numbers)
    }
}

/// `Ok(None)` for blank cells, `Err(text)` for anything that is not an integer
fn cell_to_integer(cell: &Data) -> Result<Option<i64>, String> {
    match cell {
        Data::Empty => Ok(None),
        Data::Int(value) => Ok(Some(*value)),
        Data::Float(value) => float_to_integer(*value)
            .map(Some)
            .ok_or_else(|| value.to_string()),
        Data::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                trimmed.parse::<i64>().map(Some).map_err(|_| text.clone())
            }
        }
        other => Err(other.to_string()),
    }
}

fn float_to_integer(value: f64) -> Option<i64> {
    // 2^63 itself is not representable as i64
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if value.is_finite() && value.fract() == 0.0 && value >= -LIMIT && value < LIMIT {
        Some(value as i64)
    } else {
        None
    }
}
