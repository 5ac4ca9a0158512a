use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Desktop Chrome identification presented during browser discovery.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120 Safari/537.36";

/// Global configuration loaded from `~/.config/mfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Program that runs the extraction engine.
    pub extractor_program: String,
    /// Arguments placed before the per-attempt arguments (e.g. `-m yt_dlp`).
    pub extractor_args: Vec<String>,
    /// Output file template handed to the extractor; it truncates titles itself.
    pub output_template: String,
    /// Browser discovery observation window in milliseconds.
    pub discover_timeout_ms: u64,
    /// Upper bound for page navigation during discovery.
    pub navigation_timeout_ms: u64,
    /// Chromium/Chrome executable; auto-detected on PATH when unset.
    pub browser_exe: Option<PathBuf>,
    /// Skip browser discovery entirely.
    pub no_browser: bool,
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            extractor_program: "python".to_string(),
            extractor_args: vec!["-m".to_string(), "yt_dlp".to_string()],
            output_template: "%(title).250s.%(ext)s".to_string(),
            discover_timeout_ms: 15_000,
            navigation_timeout_ms: 30_000,
            browser_exe: None,
            no_browser: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            viewport_width: 1366,
            viewport_height: 768,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg: FetchConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
