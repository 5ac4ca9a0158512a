//! Typed errors for the cases callers branch on.
//!
//! Everything else flows through `anyhow` with context attached at the I/O
//! boundary.

use std::path::PathBuf;

/// Failure to materialize the input URL list. Fatal for the whole run.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure inside a browser discovery session.
///
/// Never escapes the discoverer: every variant degrades to an empty
/// candidate list.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("no Chromium/Chrome executable found (set browser_exe or --browser-exe)")]
    BrowserUnavailable,
    #[error("browser launch failed: {0}")]
    Launch(String),
    #[error("page setup failed: {0}")]
    Page(String),
}

/// A sidecar metadata record that could not be read or parsed.
#[derive(Debug, thiserror::Error)]
pub enum InfoError {
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{}: top-level value is not a JSON object", .0.display())]
    NotAnObject(PathBuf),
}
