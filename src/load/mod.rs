// src/load/mod.rs
use crate::error::{BatchError, Result};
use glob::{glob, Pattern};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub mod sheet;
pub mod text;

/// One cell of the single address column, before validation.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Text(String),
    Missing,
    /// A cell holding something other than a string; `shown` is its display form.
    NonText { kind: &'static str, shown: String },
}

/// The concatenated single-column input table, in row order.
#[derive(Debug, Default)]
pub struct RawTable {
    pub rows: Vec<RawValue>,
    /// Files that contributed rows, in the order they were read.
    pub sources: Vec<PathBuf>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn append(&mut self, path: PathBuf, rows: Vec<RawValue>) {
        self.rows.extend(rows);
        self.sources.push(path);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Lines,
    Spreadsheet,
}

impl InputKind {
    /// Dispatch by extension, case-insensitive. `None` means skip the file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(InputKind::Lines),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(InputKind::Spreadsheet),
            _ => None,
        }
    }
}

/// Regular files directly inside `dir`, sorted by path.
pub fn list_input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(BatchError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "input directory not found"),
        ));
    }
    // Directory names may hold glob metacharacters such as `[1]`.
    let pattern = format!("{}/*", Pattern::escape(&dir.to_string_lossy()));
    let entries = glob(&pattern).map_err(|e| {
        BatchError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()),
        )
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            BatchError::io(path, std::io::Error::from(e))
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Reads every supported file in `dir` and concatenates them into one table.
///
/// Fails with `NoInput` when the directory holds no files at all, and with
/// `NoRows` when the supported files yield no rows.
#[tracing::instrument(level = "info", skip(dir), fields(dir = %dir.display()))]
pub fn load_input_dir(dir: &Path) -> Result<RawTable> {
    let files = list_input_files(dir)?;
    if files.is_empty() {
        return Err(BatchError::NoInput {
            dir: dir.to_path_buf(),
        });
    }

    let mut table = RawTable::default();
    for path in files {
        let Some(kind) = InputKind::from_path(&path) else {
            info!("Skipping unsupported file {}", path.display());
            continue;
        };
        info!("Reading the file {}", path.display());
        let rows = match kind {
            InputKind::Lines => text::read_lines(&path)?,
            InputKind::Spreadsheet => sheet::read_first_sheet(&path)?,
        };
        debug!(path = %path.display(), rows = rows.len(), "file read");
        table.append(path, rows);
    }

    if table.is_empty() {
        return Err(BatchError::NoRows {
            dir: dir.to_path_buf(),
        });
    }
    info!(rows = table.len(), files = table.sources.len(), "input loaded");
    Ok(table)
}

/// True when `value` is the `address` column header rather than data.
pub(crate) fn is_address_header(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("address")
}
