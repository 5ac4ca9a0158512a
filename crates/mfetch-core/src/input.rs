//! Input URL list materialization.

use std::path::Path;

use crate::error::InputError;

/// Reads a newline-delimited URL file. Blank lines and `#` comments are skipped.
pub fn urls_from_file(path: &Path) -> Result<Vec<String>, InputError> {
    if !path.exists() {
        return Err(InputError::FileNotFound(path.to_path_buf()));
    }
    let data = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_url_list(&data))
}

/// Parses URL lines from `data` (handles `\n` and `\r\n`).
pub fn parse_url_list(data: &str) -> Vec<String> {
    data.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}

/// URLs for the run: the file if given, else the positional arguments (empties dropped).
pub fn resolve_urls(args: &[String], file: Option<&Path>) -> Result<Vec<String>, InputError> {
    match file {
        Some(path) => urls_from_file(path),
        None => Ok(args
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .map(String::from)
            .collect()),
    }
}
