//! Per-URL target directory naming.
//!
//! Every save point derives the directory from the requested page URL alone,
//! so the same URL always lands in the same place no matter which stage
//! produced the file.

mod sanitize;

pub use sanitize::{sanitize, truncate, MAX_DIR_NAME, SEPARATOR};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the output root that receives one URL's downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDirectory {
    pub path: PathBuf,
    pub source_url: String,
}

impl TargetDirectory {
    /// Computes the directory for `raw_url` without touching the filesystem.
    pub fn for_url(output_root: &Path, raw_url: &str) -> Self {
        let name = truncate(&sanitize(raw_url));
        Self {
            path: output_root.join(name),
            source_url: raw_url.to_string(),
        }
    }

    /// Computes the directory and makes sure it exists.
    pub fn prepare(output_root: &Path, raw_url: &str) -> Result<Self> {
        let dir = Self::for_url(output_root, raw_url);
        ensure_directory(&dir.path)?;
        Ok(dir)
    }
}

/// Creates `path` and any missing ancestors. Existing directories are fine.
pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("create dir: {}", path.display()))
}
