//! Staged acquisition of one page URL.
//!
//! Per URL: direct extraction, then generic-mode extraction, then (unless
//! disabled) browser discovery followed by one attempt per ranked candidate.
//! The first success stops the sequence and records the sidecar metadata in
//! the run manifest. Exhausting every stage is a per-URL outcome, never a
//! run-level error.

use std::path::PathBuf;

use crate::candidate::CandidateUrl;
use crate::discover::{DiscoveryOptions, NetworkDiscoverer};
use crate::extractor::{generic_mode_args, referer_args, ExtractionInvoker};
use crate::manifest::{ManifestEntry, RunManifest};
use crate::target_dir::{ensure_directory, TargetDirectory};

/// Settings shared by every URL of a run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub output_root: PathBuf,
    pub browser_exe: Option<PathBuf>,
    pub discovery_timeout_ms: u64,
    pub browser_discovery_enabled: bool,
}

impl RunSettings {
    pub fn request(&self, raw_url: &str) -> AcquisitionRequest {
        AcquisitionRequest {
            raw_url: raw_url.to_string(),
            output_root: self.output_root.clone(),
            browser_exe: self.browser_exe.clone(),
            discovery_timeout_ms: self.discovery_timeout_ms,
            browser_discovery_enabled: self.browser_discovery_enabled,
        }
    }
}

/// Everything needed to acquire one page URL.
#[derive(Debug, Clone)]
pub struct AcquisitionRequest {
    pub raw_url: String,
    pub output_root: PathBuf,
    pub browser_exe: Option<PathBuf>,
    pub discovery_timeout_ms: u64,
    pub browser_discovery_enabled: bool,
}

/// One step of the fallback sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Direct,
    Generic,
    Discover,
    /// Attempt on the ranked candidate at this index.
    Candidate(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExhaustReason {
    /// Generic mode failed and browser discovery is turned off.
    BrowserDisabled,
    /// Discovery returned nothing.
    NoCandidates,
    /// Every discovered candidate failed.
    CandidatesFailed(usize),
    /// The target directory could not be created.
    TargetDirectory(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Succeeded { stage: Stage, media_url: String },
    Exhausted(ExhaustReason),
}

/// Result of acquiring one page URL.
#[derive(Debug, Clone)]
pub struct UrlOutcome {
    pub url: String,
    pub target: TargetDirectory,
    pub resolution: Resolution,
    /// Stages run, in order.
    pub attempts: Vec<Stage>,
    /// Manifest entries recorded for this URL (empty unless succeeded).
    pub entries: Vec<ManifestEntry>,
}

impl UrlOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self.resolution, Resolution::Succeeded { .. })
    }
}

/// Result of a whole run.
#[derive(Debug)]
pub struct RunReport {
    pub outcomes: Vec<UrlOutcome>,
    pub manifest: RunManifest,
    /// Where the manifest was written, or why it could not be.
    pub manifest_file: anyhow::Result<PathBuf>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Progress hooks for a run. All methods default to no-ops.
pub trait RunObserver {
    fn url_started(&self, _url: &str, _target: &TargetDirectory) {}
    fn stage_failed(&self, _url: &str, _stage: &Stage, _status: i32) {}
    fn candidates_found(&self, _url: &str, _candidates: &[CandidateUrl]) {}
    fn url_finished(&self, _outcome: &UrlOutcome) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl RunObserver for SilentObserver {}

/// Drives the fallback sequence over injected extraction and discovery engines.
pub struct AcquisitionResolver<E, D> {
    extractor: E,
    discoverer: D,
}

impl<E, D> AcquisitionResolver<E, D>
where
    E: ExtractionInvoker,
    D: NetworkDiscoverer,
{
    pub fn new(extractor: E, discoverer: D) -> Self {
        Self {
            extractor,
            discoverer,
        }
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    pub fn discoverer(&self) -> &D {
        &self.discoverer
    }

    /// Processes `urls` strictly in order, then writes the manifest once.
    pub async fn run(
        &self,
        urls: &[String],
        settings: &RunSettings,
        observer: &dyn RunObserver,
    ) -> RunReport {
        let mut manifest = RunManifest::new();
        let mut outcomes = Vec::with_capacity(urls.len());

        for url in urls {
            let req = settings.request(url);
            let outcome = self.resolve(&req, &mut manifest, observer).await;
            observer.url_finished(&outcome);
            outcomes.push(outcome);
        }

        let manifest_file = manifest.write(&settings.output_root);
        match &manifest_file {
            Ok(path) => tracing::info!(
                path = %path.display(),
                count = manifest.count(),
                "run manifest written"
            ),
            Err(e) => tracing::error!(error = %format!("{e:#}"), "could not write run manifest"),
        }

        RunReport {
            outcomes,
            manifest,
            manifest_file,
        }
    }

    /// Runs the fallback sequence for one URL, appending to `manifest` on success.
    pub async fn resolve(
        &self,
        req: &AcquisitionRequest,
        manifest: &mut RunManifest,
        observer: &dyn RunObserver,
    ) -> UrlOutcome {
        let url = req.raw_url.as_str();
        let mut attempts = Vec::new();

        let target = TargetDirectory::for_url(&req.output_root, url);
        observer.url_started(url, &target);
        if let Err(e) = ensure_directory(&target.path) {
            tracing::error!(url, error = %format!("{e:#}"), "target directory unavailable");
            let reason = ExhaustReason::TargetDirectory(format!("{e:#}"));
            return exhausted(target, url, reason, attempts);
        }
        tracing::info!(url, dir = %target.path.display(), "processing");

        for (stage, extra) in [
            (Stage::Direct, Vec::new()),
            (Stage::Generic, generic_mode_args()),
        ] {
            attempts.push(stage.clone());
            let status = self.extractor.invoke(url, &target.path, &extra).await;
            if status == 0 {
                return succeed(manifest, target, url, stage, url, attempts);
            }
            tracing::info!(url, stage = ?stage, status, "extraction failed");
            observer.stage_failed(url, &stage, status);
        }

        if !req.browser_discovery_enabled {
            tracing::info!(url, "browser discovery disabled; giving up");
            return exhausted(target, url, ExhaustReason::BrowserDisabled, attempts);
        }

        attempts.push(Stage::Discover);
        let opts = DiscoveryOptions {
            browser_exe: req.browser_exe.clone(),
            timeout_ms: req.discovery_timeout_ms,
        };
        let candidates = self.discoverer.discover(url, &opts).await;
        observer.candidates_found(url, &candidates);
        if candidates.is_empty() {
            tracing::info!(url, "no manifest candidates discovered");
            return exhausted(target, url, ExhaustReason::NoCandidates, attempts);
        }

        // Generic mode is not applied here: candidates are already direct manifests.
        let referer = referer_args(url);
        let mut target = target;
        for (i, candidate) in candidates.iter().enumerate() {
            target = match TargetDirectory::prepare(&req.output_root, url) {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!(url, error = %format!("{e:#}"), "target directory unavailable");
                    return exhausted(
                        target,
                        url,
                        ExhaustReason::TargetDirectory(format!("{e:#}")),
                        attempts,
                    );
                }
            };
            let stage = Stage::Candidate(i);
            attempts.push(stage.clone());
            tracing::info!(url, candidate = %candidate.url, "trying discovered media URL");
            let status = self
                .extractor
                .invoke(&candidate.url, &target.path, &referer)
                .await;
            if status == 0 {
                return succeed(manifest, target, url, stage, &candidate.url, attempts);
            }
            observer.stage_failed(url, &stage, status);
        }

        tracing::info!(url, tried = candidates.len(), "all discovered candidates failed");
        exhausted(
            target,
            url,
            ExhaustReason::CandidatesFailed(candidates.len()),
            attempts,
        )
    }
}

fn succeed(
    manifest: &mut RunManifest,
    target: TargetDirectory,
    url: &str,
    stage: Stage,
    media_url: &str,
    attempts: Vec<Stage>,
) -> UrlOutcome {
    tracing::info!(url, stage = ?stage, dir = %target.path.display(), "acquired");
    let entries = manifest.record(&target.path, Some(url)).to_vec();
    UrlOutcome {
        url: url.to_string(),
        target,
        resolution: Resolution::Succeeded {
            stage,
            media_url: media_url.to_string(),
        },
        attempts,
        entries,
    }
}

fn exhausted(
    target: TargetDirectory,
    url: &str,
    reason: ExhaustReason,
    attempts: Vec<Stage>,
) -> UrlOutcome {
    UrlOutcome {
        url: url.to_string(),
        target,
        resolution: Resolution::Exhausted(reason),
        attempts,
        entries: Vec::new(),
    }
}
