//! Console rendering of run progress and results.

use mfetch_core::candidate::CandidateUrl;
use mfetch_core::manifest::ManifestEntry;
use mfetch_core::resolver::{ExhaustReason, Resolution, RunObserver, RunReport, Stage, UrlOutcome};
use mfetch_core::target_dir::TargetDirectory;

const RULE_WIDTH: usize = 100;
const CANDIDATE_PREVIEW: usize = 8;

/// Prints per-URL progress to stdout.
pub struct ConsoleObserver;

impl RunObserver for ConsoleObserver {
    fn url_started(&self, url: &str, target: &TargetDirectory) {
        println!("\n{}", "-".repeat(RULE_WIDTH));
        println!("# Processing: {url}");
        println!("  target: {}", target.path.display());
    }

    fn stage_failed(&self, _url: &str, stage: &Stage, status: i32) {
        match stage {
            Stage::Direct => {
                println!("✗ Original download failed (status {status}).");
                println!("  Retrying with generic extractor ...");
            }
            Stage::Generic => println!("✗ Generic extractor failed (status {status})."),
            Stage::Discover => {}
            Stage::Candidate(_) => {
                println!("  … failed (status {status}), trying next candidate …")
            }
        }
    }

    fn candidates_found(&self, _url: &str, candidates: &[CandidateUrl]) {
        if candidates.is_empty() {
            println!("• Browser discovered no .m3u8 candidates.");
            return;
        }
        println!("• Browser discovered .m3u8 candidates (masters first):");
        for c in candidates.iter().take(CANDIDATE_PREVIEW) {
            println!("  - {}", c.url);
        }
        if candidates.len() > CANDIDATE_PREVIEW {
            println!("  ...(+{} more)", candidates.len() - CANDIDATE_PREVIEW);
        }
    }

    fn url_finished(&self, outcome: &UrlOutcome) {
        match &outcome.resolution {
            Resolution::Succeeded { stage, media_url } => {
                let via = match stage {
                    Stage::Direct => "original URL".to_string(),
                    Stage::Generic => "generic extractor".to_string(),
                    Stage::Discover | Stage::Candidate(_) => format!("discovered {media_url}"),
                };
                println!(
                    "✓ Success via {via}. Saved under: {}",
                    outcome.target.path.display()
                );
                print_entries(&outcome.entries);
            }
            Resolution::Exhausted(reason) => println!("✗ {}", exhaust_message(reason)),
        }
    }
}

pub fn exhaust_message(reason: &ExhaustReason) -> String {
    match reason {
        ExhaustReason::BrowserDisabled => {
            "All attempts failed (browser discovery skipped: --no-browser).".to_string()
        }
        ExhaustReason::NoCandidates => {
            "Download failed; no .m3u8 discovered via browser.".to_string()
        }
        ExhaustReason::CandidatesFailed(n) => {
            format!("All {n} discovered .m3u8 candidate(s) failed.")
        }
        ExhaustReason::TargetDirectory(e) => format!("Could not prepare target directory: {e}"),
    }
}

fn print_entries(entries: &[ManifestEntry]) {
    if entries.is_empty() {
        println!("  (no .info.json found in this folder)");
        return;
    }
    println!("  ─ Info from .info.json ─");
    for e in entries {
        let secs = e
            .duration_seconds
            .map(|s| format!(" ({s}s)"))
            .unwrap_or_default();
        println!("  • File: {}", e.info_file);
        println!("    Title    : {}", e.title);
        println!("    Duration : {}{}", e.duration_formatted, secs);
        println!("    Extractor: {}", e.extractor_name);
        println!("    Uploader : {}", e.uploader);
        println!("    ID / Ext : {} / {}", e.media_id, e.file_extension);
        println!("    Source   : {}", e.source_url);
    }
}

/// Final tally and manifest location.
pub fn print_report(report: &RunReport) {
    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!(
        "Done: {} succeeded, {} failed, {} manifest item(s).",
        report.succeeded(),
        report.failed(),
        report.manifest.count()
    );
    match &report.manifest_file {
        Ok(path) => println!("Summary written to {}", path.display()),
        Err(e) => eprintln!("warning: could not write summary: {e:#}"),
    }
}
