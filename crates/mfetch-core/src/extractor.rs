//! Media-extraction engine boundary.
//!
//! The resolver only sees [`ExtractionInvoker`]; the production implementation
//! spawns yt-dlp as a child process in the target directory.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;

use crate::config::FetchConfig;

/// Completion status reported when the process could not run or was killed.
pub const STATUS_NOT_RUN: i32 = -1;

/// Extra parameters forcing the generic (non site-specific) extractor.
pub fn generic_mode_args() -> Vec<String> {
    vec!["--use-extractors".to_string(), "generic".to_string()]
}

/// Extra parameters passing the requested page as referer for a discovered URL.
pub fn referer_args(page_url: &str) -> Vec<String> {
    vec!["--referer".to_string(), page_url.to_string()]
}

/// Runs the extraction engine once. Status `0` means success.
#[async_trait]
pub trait ExtractionInvoker: Send + Sync {
    async fn invoke(&self, media_url: &str, working_dir: &Path, extra: &[String]) -> i32;
}

/// yt-dlp launched as `<program> <base args> --write-info-json -o <template> <extra> <url>`.
#[derive(Debug, Clone)]
pub struct YtDlpInvoker {
    program: String,
    base_args: Vec<String>,
    output_template: String,
}

impl YtDlpInvoker {
    pub fn new(
        program: impl Into<String>,
        base_args: Vec<String>,
        output_template: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            base_args,
            output_template: output_template.into(),
        }
    }

    pub fn from_config(cfg: &FetchConfig) -> Self {
        Self::new(
            cfg.extractor_program.clone(),
            cfg.extractor_args.clone(),
            cfg.output_template.clone(),
        )
    }

    /// Full argument vector for one invocation (program excluded).
    pub fn build_args(&self, media_url: &str, extra: &[String]) -> Vec<String> {
        let mut args = self.base_args.clone();
        args.push("--write-info-json".to_string());
        args.push("-o".to_string());
        args.push(self.output_template.clone());
        args.extend(extra.iter().cloned());
        args.push(media_url.to_string());
        args
    }
}

#[async_trait]
impl ExtractionInvoker for YtDlpInvoker {
    async fn invoke(&self, media_url: &str, working_dir: &Path, extra: &[String]) -> i32 {
        let args = self.build_args(media_url, extra);
        tracing::info!(
            cwd = %working_dir.display(),
            "$ {} {}",
            self.program,
            args.join(" ")
        );

        let status = tokio::process::Command::new(&self.program)
            .args(&args)
            .current_dir(working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await;

        match status {
            Ok(s) => {
                let code = s.code().unwrap_or(STATUS_NOT_RUN);
                tracing::debug!(url = media_url, code, "extractor exited");
                code
            }
            Err(e) => {
                tracing::warn!(program = %self.program, error = %e, "could not spawn extractor");
                STATUS_NOT_RUN
            }
        }
    }
}
