//! Command-line interface orchestration for termratio.
//!
//! The CLI takes one term ratios file, writes the per-length summary next to
//! it, and reports rows it had to skip.

mod commands;

pub use commands::{
    BucketArg, Cli, CliError, CliOutcome, ExecutionSummary, FormatArg, SummariseOptions,
    render_report, render_skipped_row, render_usage, run_cli,
};

#[cfg(test)]
mod test_helpers;
