//! Sidecar `.info.json` records written by the extractor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use super::duration;
use crate::error::InfoError;

/// File-name suffix of sidecar metadata records.
pub const INFO_SUFFIX: &str = ".info.json";

const NO_TITLE: &str = "(no title)";
const UNKNOWN: &str = "unknown";
const NOT_AVAILABLE: &str = "(n/a)";

/// One successful acquisition as recorded in the run manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub dir: PathBuf,
    pub info_file: String,
    pub title: String,
    pub duration_seconds: Option<f64>,
    #[serde(rename = "duration")]
    pub duration_formatted: String,
    #[serde(rename = "extractor")]
    pub extractor_name: String,
    pub uploader: String,
    #[serde(rename = "id")]
    pub media_id: String,
    #[serde(rename = "ext")]
    pub file_extension: String,
    #[serde(rename = "source")]
    pub source_url: String,
    pub original_request_url: String,
}

impl ManifestEntry {
    /// Builds an entry from a parsed record, applying every field fallback.
    pub fn from_record(
        record: &Map<String, Value>,
        dir: &Path,
        info_file: &str,
        original_url: Option<&str>,
    ) -> Self {
        let secs = duration::coerce_seconds(record.get("duration"));
        Self {
            dir: dir.to_path_buf(),
            info_file: info_file.to_string(),
            title: first_text(record, &["title", "fulltitle"], NO_TITLE),
            duration_seconds: secs,
            duration_formatted: duration::format_optional(secs),
            extractor_name: first_text(record, &["extractor", "extractor_key"], UNKNOWN),
            uploader: first_text(
                record,
                &["uploader", "channel", "uploader_id", "channel_id"],
                NOT_AVAILABLE,
            ),
            media_id: first_text(record, &["id"], NOT_AVAILABLE),
            file_extension: first_text(record, &["ext"], NOT_AVAILABLE),
            source_url: first_text(record, &["webpage_url", "original_url"], NOT_AVAILABLE),
            original_request_url: original_url
                .filter(|u| !u.is_empty())
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
        }
    }
}

/// Reads and parses one sidecar file into an entry.
pub fn read_entry(path: &Path, original_url: Option<&str>) -> Result<ManifestEntry, InfoError> {
    let bytes = std::fs::read(path).map_err(|source| InfoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|source| InfoError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let record = value
        .as_object()
        .ok_or_else(|| InfoError::NotAnObject(path.to_path_buf()))?;

    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let info_file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ManifestEntry::from_record(record, dir, &info_file, original_url))
}

/// First non-empty string (or number) among `keys`, else `fallback`.
fn first_text(record: &Map<String, Value>, keys: &[&str], fallback: &str) -> String {
    keys.iter()
        .find_map(|k| match record.get(*k) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| fallback.to_string())
}
