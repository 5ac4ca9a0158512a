//! Browser-based network discovery of media-manifest URLs.
//!
//! A discoverer loads the page in a headless browser, watches outbound
//! requests and 2xx/3xx responses for a bounded window, and returns the
//! manifest URLs it saw, ranked. It never fails: any problem degrades to an
//! empty list with a warning.

mod chromium;
mod geo;

pub use chromium::{find_browser, ChromiumDiscoverer};
pub use geo::looks_geo_restricted;

use async_trait::async_trait;
use std::path::PathBuf;

use crate::candidate::CandidateUrl;

/// Number of candidates shown in the discovery preview log.
const PREVIEW_LIMIT: usize = 8;

/// Per-call discovery settings.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    pub browser_exe: Option<PathBuf>,
    pub timeout_ms: u64,
}

#[async_trait]
pub trait NetworkDiscoverer: Send + Sync {
    /// Returns ranked manifest candidates observed while loading `page_url`.
    async fn discover(&self, page_url: &str, opts: &DiscoveryOptions) -> Vec<CandidateUrl>;
}

/// Logs the first few candidates (masters first) as a preview.
pub(crate) fn log_preview(page_url: &str, candidates: &[CandidateUrl]) {
    if candidates.is_empty() {
        tracing::info!(url = page_url, "browser discovered no .m3u8 candidates");
        return;
    }
    tracing::info!(
        url = page_url,
        count = candidates.len(),
        "browser discovered .m3u8 candidates (masters first)"
    );
    for c in candidates.iter().take(PREVIEW_LIMIT) {
        tracing::info!(tier = ?c.tier, "  - {}", c.url);
    }
    if candidates.len() > PREVIEW_LIMIT {
        tracing::info!("  ...(+{} more)", candidates.len() - PREVIEW_LIMIT);
    }
}
