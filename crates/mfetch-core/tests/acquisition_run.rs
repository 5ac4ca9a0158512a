//! End-to-end run through the real process invoker, with `sh` standing in for
//! the extraction engine and browser discovery disabled.

#![cfg(unix)]

use mfetch_core::config::FetchConfig;
use mfetch_core::discover::ChromiumDiscoverer;
use mfetch_core::extractor::YtDlpInvoker;
use mfetch_core::manifest::MANIFEST_FILE;
use mfetch_core::resolver::{
    AcquisitionResolver, ExhaustReason, Resolution, RunSettings, SilentObserver, Stage,
};
use mfetch_core::target_dir::TargetDirectory;
use serde_json::Value;
use tempfile::tempdir;

/// Succeeds for URLs containing "ok" in any mode, and for URLs containing
/// "generic-only" only when generic mode was requested.
const FAKE_EXTRACTOR: &str = r#"
eval "url=\${$#}"
generic=no
case " $* " in *" --use-extractors generic "*) generic=yes ;; esac
case "$url" in
  *generic-only*) [ "$generic" = yes ] || exit 1 ;;
  *ok*) ;;
  *) exit 1 ;;
esac
printf '{"title":"clip","duration":61,"ext":"mp4","id":"x1","webpage_url":"%s"}' "$url" \
  > clip.info.json
: > clip.mp4
"#;

fn invoker() -> YtDlpInvoker {
    YtDlpInvoker::new(
        "sh",
        vec!["-c".to_string(), FAKE_EXTRACTOR.to_string(), "fake-extractor".to_string()],
        "%(title).250s.%(ext)s",
    )
}

#[tokio::test]
async fn run_records_successes_and_writes_summary() {
    let out = tempdir().unwrap();
    let settings = RunSettings {
        output_root: out.path().to_path_buf(),
        browser_exe: None,
        discovery_timeout_ms: 0,
        browser_discovery_enabled: false,
    };
    let urls = vec![
        "https://example.com/ok/1".to_string(),
        "https://example.com/nope".to_string(),
        "https://example.com/generic-only".to_string(),
    ];
    let resolver = AcquisitionResolver::new(
        invoker(),
        ChromiumDiscoverer::from_config(&FetchConfig::default()),
    );
    let report = resolver.run(&urls, &settings, &SilentObserver).await;

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.outcomes[0].attempts, vec![Stage::Direct]);
    assert_eq!(
        report.outcomes[1].resolution,
        Resolution::Exhausted(ExhaustReason::BrowserDisabled)
    );
    assert_eq!(report.outcomes[2].attempts, vec![Stage::Direct, Stage::Generic]);
    assert!(report.outcomes[2].succeeded());

    let first_dir = TargetDirectory::for_url(out.path(), &urls[0]).path;
    assert!(first_dir.join("clip.mp4").exists());

    let summary_path = report.manifest_file.as_ref().unwrap();
    assert_eq!(summary_path, &out.path().join(MANIFEST_FILE));
    let doc: Value = serde_json::from_slice(&std::fs::read(summary_path).unwrap()).unwrap();
    assert_eq!(doc["count"], 2);
    let items = doc["items"].as_array().unwrap();
    assert_eq!(items[0]["originalRequestUrl"], urls[0].as_str());
    assert_eq!(items[0]["duration"], "1:01");
    assert_eq!(items[1]["source"], urls[2].as_str());
}
