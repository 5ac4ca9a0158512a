use mfetch_core::logging;

mod cli;

use crate::cli::{Cli, RunStatus};

/// No URLs resolved from the input.
const EXIT_NO_URLS: i32 = 2;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; stderr if the log file is unavailable.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }

    match Cli::run_from_args().await {
        Ok(RunStatus::Completed) => {}
        Ok(RunStatus::NoUrls) => {
            eprintln!("mfetch: no URLs given (pass URLs or --file <path>)");
            std::process::exit(EXIT_NO_URLS);
        }
        Err(err) => {
            eprintln!("mfetch error: {:#}", err);
            std::process::exit(1);
        }
    }
}
