// src/load/text.rs
use super::{is_address_header, RawValue};
use crate::error::{BatchError, Result};
use std::{fs, path::Path};

/// Reads a `.csv`/`.txt` file as one value per line. Commas are not separators.
pub fn read_lines(path: &Path) -> Result<Vec<RawValue>> {
    let bytes = fs::read(path).map_err(|e| BatchError::io(path, e))?;
    let content = String::from_utf8(bytes).map_err(|e| {
        BatchError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.utf8_error()),
        )
    })?;
    Ok(parse_lines(&content))
}

/// Splits `content` into address values, dropping blank lines and a
/// leading `address` header.
pub fn parse_lines(content: &str) -> Vec<RawValue> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.lines().filter(|l| !l.trim().is_empty()).peekable();

    if lines.peek().is_some_and(|first| is_address_header(first)) {
        lines.next();
    }

    lines.map(|l| RawValue::Text(l.to_string())).collect()
}
