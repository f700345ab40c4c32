//! CLI entry point for summarising term ratios files.
//!
//! Parses command-line arguments with clap, writes the per-length summary,
//! streams diagnostics to stdout, and maps errors to exit codes. Logging is
//! initialised eagerly so later operations can emit structured diagnostics via
//! `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use termratio_cli::{
    cli::{Cli, CliError, CliOutcome, render_report, render_usage, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Parse CLI arguments, execute the command, render the outcome, and flush the
/// output stream.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    let outcome = run_cli(cli, &mut writer);
    // Echoes of skipped rows must reach stdout even when the run failed.
    let flushed = writer.flush();
    let outcome = outcome.context("failed to execute command")?;
    flushed.context("failed to flush output")?;
    match outcome {
        CliOutcome::Usage => render_usage(&mut writer).context("failed to render usage")?,
        CliOutcome::Summarised(summary) => {
            render_report(&summary, &mut writer).context("failed to render report")?;
        }
    }
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let code = err
            .downcast_ref::<CliError>()
            .and_then(CliError::core_code)
            .map(|code| field::display(code.as_str()));

        let message = format!("{err:#}");
        error!(error = %message, code, "command execution failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
