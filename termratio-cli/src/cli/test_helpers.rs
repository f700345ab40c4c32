//! Small helpers shared across CLI tests.
//!
//! The CLI unit tests build temporary term ratios files and assert error
//! handling behaviour. These helpers keep the test cases concise.

use std::io;
use std::path::PathBuf;

use tempfile::TempDir;

use super::{Cli, CliError, CliOutcome, ExecutionSummary, SummariseOptions, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn cli_for(path: PathBuf, options: SummariseOptions) -> Cli {
    Cli {
        path: Some(path),
        options,
    }
}

pub(super) fn run_expecting_summary(cli: Cli) -> ExecutionSummary {
    match run_cli(cli, io::sink()) {
        Ok(CliOutcome::Summarised(summary)) => summary,
        Ok(CliOutcome::Usage) => panic!("expected a summary, got the usage outcome"),
        Err(err) => panic!("expected a summary, got error: {err}"),
    }
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli, io::sink()) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
