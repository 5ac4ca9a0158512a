//! Run manifest: sidecar records gathered after each successful acquisition,
//! persisted once as `download_summary.json` in the output root.

mod duration;
mod info;

pub use duration::{coerce_seconds, format_duration, UNKNOWN_DURATION};
pub use info::{read_entry, ManifestEntry, INFO_SUFFIX};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the persisted run manifest.
pub const MANIFEST_FILE: &str = "download_summary.json";

/// Append-only, insertion-ordered record of a run's successful acquisitions.
#[derive(Debug, Clone, Default)]
pub struct RunManifest {
    items: Vec<ManifestEntry>,
}

/// On-disk shape of the run manifest.
#[derive(Debug, Serialize)]
struct ManifestDocument<'a> {
    generated_at: String,
    count: usize,
    items: &'a [ManifestEntry],
}

impl RunManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[ManifestEntry] {
        &self.items
    }

    /// Collects `directory`'s sidecar records and appends them.
    /// Returns the entries added by this call.
    pub fn record(&mut self, directory: &Path, original_url: Option<&str>) -> &[ManifestEntry] {
        let start = self.items.len();
        self.items.extend(collect(directory, original_url));
        &self.items[start..]
    }

    /// Serializes the manifest to `<output_root>/download_summary.json`.
    pub fn write(&self, output_root: &Path) -> Result<PathBuf> {
        write_manifest(output_root, self)
    }
}

/// Parses every `*.info.json` directly inside `directory` (sorted by name).
/// The suffix matches in any letter case.
///
/// Unreadable or malformed records are skipped with a warning.
pub fn collect(directory: &Path, original_url: Option<&str>) -> Vec<ManifestEntry> {
    let files = match info_files(directory) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(dir = %directory.display(), error = %e, "could not scan for .info.json");
            return Vec::new();
        }
    };
    if files.is_empty() {
        tracing::info!(dir = %directory.display(), "no .info.json found in this folder");
        return Vec::new();
    }

    files
        .iter()
        .filter_map(|path| match read_entry(path, original_url) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping metadata record");
                None
            }
        })
        .collect()
}

fn info_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let rd =
        fs::read_dir(directory).with_context(|| format!("read dir: {}", directory.display()))?;
    for dirent in rd {
        let dirent = dirent.with_context(|| format!("read dir: {}", directory.display()))?;
        let name = dirent.file_name();
        let is_info = name.to_str().is_some_and(is_info_file_name);
        if is_info && dirent.file_type().map(|t| t.is_file()).unwrap_or(false) {
            files.push(dirent.path());
        }
    }
    files.sort();
    Ok(files)
}

/// True for names ending in `.info.json`, ignoring ASCII case.
fn is_info_file_name(name: &str) -> bool {
    name.len() > INFO_SUFFIX.len()
        && name.is_char_boundary(name.len() - INFO_SUFFIX.len())
        && name[name.len() - INFO_SUFFIX.len()..].eq_ignore_ascii_case(INFO_SUFFIX)
}

/// Writes `manifest` to `<output_root>/download_summary.json` (pretty JSON).
pub fn write_manifest(output_root: &Path, manifest: &RunManifest) -> Result<PathBuf> {
    let doc = ManifestDocument {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        count: manifest.count(),
        items: manifest.items(),
    };
    fs::create_dir_all(output_root)
        .with_context(|| format!("create dir: {}", output_root.display()))?;
    let path = output_root.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(&doc).context("serialize run manifest")?;
    fs::write(&path, json).with_context(|| format!("write run manifest: {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn write_info(dir: &Path, name: &str, v: Value) {
        fs::write(dir.join(name), serde_json::to_vec(&v).unwrap()).unwrap();
    }

    #[test]
    fn collect_skips_bad_records_and_other_files() {
        let dir = tempfile::tempdir().unwrap();
        write_info(dir.path(), "b.info.json", json!({"title": "B", "duration": 45}));
        write_info(dir.path(), "a.info.json", json!({"title": "A"}));
        fs::write(dir.path().join("broken.info.json"), "{oops").unwrap();
        fs::write(dir.path().join("video.mp4"), b"\0\0").unwrap();
        fs::create_dir(dir.path().join("nested.info.json")).unwrap();

        let entries = collect(dir.path(), Some("https://page"));
        let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(entries[1].duration_formatted, "0:45");
        assert!(entries.iter().all(|e| e.original_request_url == "https://page"));
    }

    #[test]
    fn collect_matches_suffix_in_any_case() {
        let dir = tempfile::tempdir().unwrap();
        write_info(dir.path(), "clip.INFO.JSON", json!({"title": "T"}));
        write_info(dir.path(), "other.Info.Json", json!({"title": "U"}));
        fs::write(dir.path().join("clip.json"), "{}").unwrap();

        let entries = collect(dir.path(), None);
        let files: Vec<_> = entries.iter().map(|e| e.info_file.as_str()).collect();
        assert_eq!(files, vec!["clip.INFO.JSON", "other.Info.Json"]);
    }

    #[test]
    fn info_file_names() {
        assert!(is_info_file_name("a.info.json"));
        assert!(is_info_file_name("A.INFO.JSON"));
        assert!(!is_info_file_name(".info.json"));
        assert!(!is_info_file_name("a.info.json.part"));
        assert!(!is_info_file_name("a.json"));
    }

    #[test]
    fn collect_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect(&dir.path().join("absent"), None).is_empty());
    }

    #[test]
    fn record_appends_in_order() {
        let one = tempfile::tempdir().unwrap();
        let two = tempfile::tempdir().unwrap();
        write_info(one.path(), "x.info.json", json!({"title": "first"}));
        write_info(two.path(), "y.info.json", json!({"title": "second"}));

        let mut manifest = RunManifest::new();
        assert_eq!(manifest.record(one.path(), None).len(), 1);
        assert_eq!(manifest.record(two.path(), None).len(), 1);
        assert_eq!(manifest.count(), 2);
        assert_eq!(manifest.items()[0].title, "first");
        assert_eq!(manifest.items()[1].title, "second");
    }

    #[test]
    fn write_manifest_document() {
        let src = tempfile::tempdir().unwrap();
        write_info(src.path(), "x.info.json", json!({"title": "T", "duration": -3}));
        let mut manifest = RunManifest::new();
        manifest.record(src.path(), Some("https://page"));

        let out = tempfile::tempdir().unwrap();
        let path = manifest.write(out.path()).unwrap();
        assert_eq!(path, out.path().join("download_summary.json"));

        let doc: Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(doc["count"], 1);
        assert_eq!(doc["items"].as_array().unwrap().len(), 1);
        assert_eq!(doc["items"][0]["durationSeconds"], Value::Null);
        assert_eq!(doc["items"][0]["duration"], "unknown");
        let ts = doc["generated_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn write_empty_manifest() {
        let out = tempfile::tempdir().unwrap();
        let path = write_manifest(out.path(), &RunManifest::new()).unwrap();
        let doc: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(doc["count"], 0);
        assert!(doc["items"].as_array().unwrap().is_empty());
    }

    #[test]
    fn write_failure_is_error() {
        let out = tempfile::tempdir().unwrap();
        let blocker = out.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        assert!(write_manifest(&blocker, &RunManifest::new()).is_err());
    }
}
