// src/output.rs
use crate::error::{BatchError, Result};
use serde_json::{Map, Value};
use std::{fs, fs::File, path::Path};
use tracing::{info, warn};

/// Parsed rows exactly as the service returned them, plus the column set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutputTable {
    /// Union of row keys, in first-seen order.
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

impl OutputTable {
    pub fn from_rows(rows: Vec<Map<String, Value>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Renders one JSON cell as CSV text.
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Writes `table` to `path` with a header row, replacing any existing file.
#[tracing::instrument(level = "info", skip(table, path), fields(path = %path.display(), rows = table.len()))]
pub fn write_csv(table: &OutputTable, path: &Path) -> Result<()> {
    info!("writing output files in {}", path.display());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| BatchError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| BatchError::io(path, e))?;
    if table.columns.is_empty() {
        if !table.is_empty() {
            warn!(
                rows = table.len(),
                "every parsed row is empty; writing an empty output file"
            );
        }
        return Ok(());
    }

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(table.columns.iter().map(|c| cell_text(row.get(c))))?;
    }
    writer.flush().map_err(|e| BatchError::io(path, e))?;
    Ok(())
}
