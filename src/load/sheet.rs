// src/load/sheet.rs
use super::{is_address_header, RawValue};
use crate::error::{BatchError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::warn;

/// Reads the first worksheet of a spreadsheet as the address column.
pub fn read_first_sheet(path: &Path) -> Result<Vec<RawValue>> {
    let spreadsheet_err = |message: String| BatchError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_err(e.to_string()))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| spreadsheet_err(e.to_string()))?,
        None => {
            warn!(path = %path.display(), "spreadsheet has no worksheet");
            return Ok(Vec::new());
        }
    };

    Ok(rows_to_values(range.rows()))
}

/// Picks the address column out of sheet rows.
///
/// A first row carrying an `address` header names the column and is dropped;
/// otherwise column 0 is used and every row is data. Fully empty rows are skipped.
pub fn rows_to_values<'a>(rows: impl IntoIterator<Item = &'a [Data]>) -> Vec<RawValue> {
    let mut rows = rows
        .into_iter()
        .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .peekable();

    let mut column = 0;
    if let Some(header) = rows.peek() {
        let named = header
            .iter()
            .position(|c| matches!(c, Data::String(s) if is_address_header(s)));
        if let Some(idx) = named {
            column = idx;
            rows.next();
        }
    }

    rows.map(|row| row.get(column).map_or(RawValue::Missing, cell_value))
        .collect()
}

fn cell_value(cell: &Data) -> RawValue {
    let kind = match cell {
        Data::String(s) => return RawValue::Text(s.clone()),
        Data::Empty => return RawValue::Missing,
        Data::Int(_) | Data::Float(_) => "number",
        Data::Bool(_) => "boolean",
        Data::Error(_) => "error",
        _ => "date",
    };
    RawValue::NonText {
        kind,
        shown: cell.to_string(),
    }
}
