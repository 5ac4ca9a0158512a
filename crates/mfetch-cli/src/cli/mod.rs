//! CLI for mfetch.

mod console;

use anyhow::Result;
use clap::Parser;
use mfetch_core::config::{self, FetchConfig};
use mfetch_core::discover::ChromiumDiscoverer;
use mfetch_core::extractor::YtDlpInvoker;
use mfetch_core::input;
use mfetch_core::resolver::{AcquisitionResolver, RunSettings};
use std::path::{Path, PathBuf};

use console::ConsoleObserver;

/// Save media from web pages: direct extraction, generic extraction, then
/// browser-discovered stream manifests.
#[derive(Debug, Parser)]
#[command(name = "mfetch")]
#[command(about = "mfetch: resolve page URLs to media and save them", long_about = None)]
pub struct Cli {
    /// Page URLs to process (ignored when --file is given).
    pub urls: Vec<String>,

    /// Newline-delimited URL file; blank lines and lines starting with '#' are skipped.
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Output root; each URL gets its own subdirectory. Defaults to the current directory.
    #[arg(short = 'o', long = "out", value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Chromium/Chrome executable used for discovery.
    #[arg(long = "browser-exe", value_name = "PATH")]
    pub browser_exe: Option<PathBuf>,

    /// Browser discovery window in milliseconds (default 15000).
    #[arg(long = "discover-timeout", value_name = "MS")]
    pub discover_timeout: Option<u64>,

    /// Skip browser-based discovery.
    #[arg(long = "no-browser")]
    pub no_browser: bool,
}

/// How a run ended when no setup error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    NoUrls,
}

impl Cli {
    pub async fn run_from_args() -> Result<RunStatus> {
        Cli::parse().run(config::load_or_init).await
    }

    /// Runs with an injected config loader. The URL list is settled first, so an
    /// empty input reports [`RunStatus::NoUrls`] even when the config is broken.
    pub async fn run<F>(self, load_config: F) -> Result<RunStatus>
    where
        F: FnOnce() -> Result<FetchConfig>,
    {
        let urls = input::resolve_urls(&self.urls, self.file.as_deref())?;
        if urls.is_empty() {
            return Ok(RunStatus::NoUrls);
        }

        let cfg = load_config()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let cwd = std::env::current_dir()?;
        let settings = self.run_settings(&cfg, &cwd);
        tracing::info!(
            urls = urls.len(),
            out = %settings.output_root.display(),
            browser = settings.browser_discovery_enabled,
            "starting run"
        );

        let resolver = AcquisitionResolver::new(
            YtDlpInvoker::from_config(&cfg),
            ChromiumDiscoverer::from_config(&cfg),
        );
        let report = resolver.run(&urls, &settings, &ConsoleObserver).await;
        console::print_report(&report);

        Ok(RunStatus::Completed)
    }

    /// Merges flags over the config file. Relative output roots resolve against `cwd`.
    pub fn run_settings(&self, cfg: &FetchConfig, cwd: &Path) -> RunSettings {
        let output_root = match &self.out {
            Some(out) if out.is_absolute() => out.clone(),
            Some(out) => cwd.join(out),
            None => cwd.to_path_buf(),
        };
        RunSettings {
            output_root,
            browser_exe: self.browser_exe.clone().or_else(|| cfg.browser_exe.clone()),
            discovery_timeout_ms: self.discover_timeout.unwrap_or(cfg.discover_timeout_ms),
            browser_discovery_enabled: !(self.no_browser || cfg.no_browser),
        }
    }
}

#[cfg(test)]
mod tests;
