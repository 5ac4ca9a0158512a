//! Chromium discoverer over the DevTools protocol (chromiumoxide).

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EventRequestWillBeSent, EventResponseReceived, SetUserAgentOverrideParams,
};
use futures::StreamExt;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;

use super::{geo, log_preview, DiscoveryOptions, NetworkDiscoverer};
use crate::candidate::{CandidateSet, CandidateUrl};
use crate::config::FetchConfig;
use crate::error::DiscoveryError;

/// Executable names probed on `PATH` when no browser is configured.
const BROWSER_NAMES: [&str; 4] = ["google-chrome", "chromium", "chromium-browser", "chrome"];

/// Resolves the browser executable: the configured path, else the first match on `PATH`.
pub fn find_browser(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = configured {
        return Some(p.to_path_buf());
    }
    BROWSER_NAMES.iter().find_map(|name| which::which(name).ok())
}

/// What one observation pass produced.
#[derive(Debug, Default)]
struct Observed {
    candidates: CandidateSet,
    geo_restricted: bool,
}

impl Observed {
    /// Outbound requests are considered whatever their eventual outcome.
    fn on_request(&mut self, url: &str) {
        self.candidates.consider(url);
    }

    /// Responses count only in the 2xx-3xx range; any response may raise the geo hint.
    fn on_response(&mut self, status: i64, url: &str, headers: &Value) {
        if !self.geo_restricted && geo::looks_geo_restricted(status, headers) {
            self.geo_restricted = true;
        }
        if (200..400).contains(&status) {
            self.candidates.consider(url);
        }
    }
}

/// Launches a fresh headless Chromium per discovery call.
#[derive(Debug, Clone)]
pub struct ChromiumDiscoverer {
    user_agent: String,
    navigation_timeout: Duration,
    window: (u32, u32),
}

impl ChromiumDiscoverer {
    pub fn from_config(cfg: &FetchConfig) -> Self {
        Self {
            user_agent: cfg.user_agent.clone(),
            navigation_timeout: Duration::from_millis(cfg.navigation_timeout_ms),
            window: (cfg.viewport_width, cfg.viewport_height),
        }
    }

    async fn run_session(
        &self,
        page_url: &str,
        opts: &DiscoveryOptions,
    ) -> Result<Observed, DiscoveryError> {
        let exe = find_browser(opts.browser_exe.as_deref())
            .ok_or(DiscoveryError::BrowserUnavailable)?;
        let config = BrowserConfig::builder()
            .chrome_executable(exe)
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--mute-audio")
            .window_size(self.window.0, self.window.1)
            .build()
            .map_err(DiscoveryError::Launch)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| DiscoveryError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let observed = self.observe(&browser, page_url, opts.timeout_ms).await;

        match browser.close().await {
            Ok(_) => {
                let _ = browser.wait().await;
            }
            Err(e) => {
                tracing::debug!(error = %e, "browser close failed; killing process");
                if let Some(Err(e)) = browser.kill().await {
                    tracing::warn!(error = %e, "could not kill browser process");
                }
            }
        }
        handler_task.abort();

        observed
    }

    /// Navigates and collects candidates until the observation window closes.
    ///
    /// The window is `timeout_ms` from the start of navigation; a finished
    /// navigation keeps observing until then, a failed navigation ends it early.
    async fn observe(
        &self,
        browser: &Browser,
        page_url: &str,
        timeout_ms: u64,
    ) -> Result<Observed, DiscoveryError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| DiscoveryError::Page(e.to_string()))?;
        page.set_user_agent(SetUserAgentOverrideParams::new(self.user_agent.clone()))
            .await
            .map_err(|e| DiscoveryError::Page(e.to_string()))?;

        let mut requests = page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .map_err(|e| DiscoveryError::Page(e.to_string()))?;
        let mut responses = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(|e| DiscoveryError::Page(e.to_string()))?;

        let mut observed = Observed::default();
        let window = tokio::time::sleep_until(Instant::now() + Duration::from_millis(timeout_ms));
        let nav = tokio::time::timeout(self.navigation_timeout, page.goto(page_url));
        tokio::pin!(window);
        tokio::pin!(nav);
        let mut nav_done = false;

        loop {
            tokio::select! {
                _ = &mut window => break,
                res = &mut nav, if !nav_done => {
                    nav_done = true;
                    match res {
                        Ok(Ok(_)) => tracing::debug!(url = page_url, "navigation complete"),
                        Ok(Err(e)) => {
                            tracing::warn!(url = page_url, error = %e, "navigation error");
                            break;
                        }
                        Err(_) => {
                            tracing::warn!(url = page_url, "navigation timed out");
                            break;
                        }
                    }
                }
                Some(ev) = requests.next() => observed.on_request(&ev.request.url),
                Some(ev) = responses.next() => observed.on_response(
                    ev.response.status,
                    &ev.response.url,
                    ev.response.headers.inner(),
                ),
            }
        }

        Ok(observed)
    }
}

#[async_trait]
impl NetworkDiscoverer for ChromiumDiscoverer {
    async fn discover(&self, page_url: &str, opts: &DiscoveryOptions) -> Vec<CandidateUrl> {
        match self.run_session(page_url, opts).await {
            Ok(observed) => {
                let ranked = observed.candidates.into_ranked();
                log_preview(page_url, &ranked);
                if ranked.is_empty() && observed.geo_restricted {
                    tracing::warn!(url = page_url, "content may be geo-restricted; try a VPN");
                }
                ranked
            }
            Err(e) => {
                tracing::warn!(url = page_url, error = %e, "browser discovery unavailable");
                Vec::new()
            }
        }
    }
}
