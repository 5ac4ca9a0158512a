//! Run status ordering: input problems are reported before config problems.

use super::parse;
use crate::cli::RunStatus;

#[tokio::test]
async fn no_urls_wins_over_broken_config() {
    let cli = parse(&["mfetch"]);
    let status = cli
        .run(|| anyhow::bail!("config.toml: invalid type"))
        .await
        .unwrap();
    assert_eq!(status, RunStatus::NoUrls);
}

#[tokio::test]
async fn blank_url_file_is_no_urls() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut f, b"\n# nothing yet\n   \n").unwrap();
    let path = f.path().to_str().unwrap().to_string();
    let status = parse(&["mfetch", "-f", &path])
        .run(|| anyhow::bail!("unreadable config"))
        .await
        .unwrap();
    assert_eq!(status, RunStatus::NoUrls);
}

#[tokio::test]
async fn missing_url_file_is_setup_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");
    let cli = parse(&["mfetch", "--file", path.to_str().unwrap()]);
    assert!(cli.run(|| Ok(Default::default())).await.is_err());
}

#[tokio::test]
async fn broken_config_with_urls_is_setup_error() {
    let cli = parse(&["mfetch", "https://example.com/v"]);
    assert!(cli.run(|| anyhow::bail!("bad config")).await.is_err());
}
