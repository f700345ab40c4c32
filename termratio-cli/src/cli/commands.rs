//! Argument parsing and command execution for the termratio CLI.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, ValueEnum};
use termratio_core::{
    AggregateError, AggregateErrorCode, AggregatorBuilder, DEFAULT_KEY_COLUMN, DEFAULT_ROW_WIDTH,
    DEFAULT_VALUE_COLUMN, KeyBucketing, LengthTable, OutputFormat, SkippedRow, render_table,
    resolve_output_path,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const BINARY_NAME: &str = "termratio";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "termratio",
    version,
    about = "Average distinct-term counts per document length from a term ratios file."
)]
pub struct Cli {
    /// Term ratios file: tab separated, one header line, six fields per row.
    ///
    /// The summary is written next to it, with `.tsv` replaced by `.out`.
    pub path: Option<PathBuf>,

    /// Summary options.
    #[command(flatten)]
    pub options: SummariseOptions,
}

/// Options controlling how rows are read and how the summary is written.
#[derive(Debug, Args, Clone)]
pub struct SummariseOptions {
    /// Zero-based column holding the document length.
    #[arg(long = "key-column", default_value_t = DEFAULT_KEY_COLUMN)]
    pub key_column: usize,

    /// Zero-based column holding the distinct-term count.
    #[arg(long = "value-column", default_value_t = DEFAULT_VALUE_COLUMN)]
    pub value_column: usize,

    /// Number of fields a row must carry to be counted.
    #[arg(long = "row-width", default_value_t = DEFAULT_ROW_WIDTH)]
    pub row_width: usize,

    /// How document lengths are grouped.
    #[arg(long, value_enum, default_value_t = BucketArg::Exact)]
    pub bucket: BucketArg,

    /// Line format of the summary file.
    #[arg(long, value_enum, default_value_t = FormatArg::Averages)]
    pub format: FormatArg,

    /// Write the summary here instead of the derived `.out` path.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl Default for SummariseOptions {
    fn default() -> Self {
        Self {
            key_column: DEFAULT_KEY_COLUMN,
            value_column: DEFAULT_VALUE_COLUMN,
            row_width: DEFAULT_ROW_WIDTH,
            bucket: BucketArg::Exact,
            format: FormatArg::Averages,
            output: None,
        }
    }
}

/// Supported key groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BucketArg {
    /// One group per exact document length.
    Exact,
    /// One group per power of ten of the document length.
    Log10,
}

impl From<BucketArg> for KeyBucketing {
    fn from(value: BucketArg) -> Self {
        match value {
            BucketArg::Exact => Self::Exact,
            BucketArg::Log10 => Self::Log10,
        }
    }
}

/// Supported summary formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Length and average distinct terms with three decimals.
    Averages,
    /// Length, document count and distinct-term total.
    Totals,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Averages => Self::Averages,
            FormatArg::Totals => Self::Totals,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Open {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The summary file could not be created.
    #[error("failed to create `{path}`: {source}")]
    Create {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The summary file could not be written or flushed.
    #[error("failed to write `{path}`: {source}")]
    Write {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A skipped-row diagnostic could not be written.
    #[error("failed to write diagnostics: {source}")]
    Diagnostics {
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Aggregation failed.
    #[error(transparent)]
    Core(#[from] AggregateError),
}

impl CliError {
    /// Stable code of the underlying aggregation failure, if any.
    #[must_use]
    pub const fn core_code(&self) -> Option<AggregateErrorCode> {
        match self {
            Self::Core(err) => Some(err.code()),
            _ => None,
        }
    }
}

/// What a CLI invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliOutcome {
    /// No input path was given; only the usage text should be shown.
    Usage,
    /// A summary file was written.
    Summarised(ExecutionSummary),
}

/// Summarises a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionSummary {
    /// Term ratios file that was read.
    pub input: PathBuf,
    /// Summary file that was written.
    pub output: PathBuf,
    /// Distinct keys written to the summary.
    pub keys: usize,
    /// Data rows read after the header.
    pub rows_read: u64,
    /// Field count every counted row had.
    pub row_width: usize,
    /// Rows left out because of their width, in input order.
    pub skipped: Vec<SkippedRow>,
}

/// Executes the CLI command represented by `cli`.
///
/// Without an input path nothing is opened and [`CliOutcome::Usage`] is
/// returned. Each skipped row is echoed to `diagnostics` as soon as it is
/// read, so the echoes survive a later fatal error.
///
/// # Errors
/// Returns [`CliError`] when the input cannot be read, aggregation fails, a
/// diagnostic cannot be written, or the summary cannot be written.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use termratio_cli::cli::{Cli, CliOutcome, SummariseOptions, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let input = dir.path().join("ratios.tsv");
/// std::fs::write(&input, "h\nx\t10\t3\t-\t-\t-\nx\t10\t5\t-\t-\t-\n")?;
/// let cli = Cli {
///     path: Some(input),
///     options: SummariseOptions::default(),
/// };
/// let CliOutcome::Summarised(summary) = run_cli(cli, std::io::sink())? else {
///     panic!("a path was supplied");
/// };
/// assert_eq!(std::fs::read_to_string(summary.output)?, "10\t4.000\n");
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli, diagnostics),
    fields(command = field::Empty)
)]
pub fn run_cli(cli: Cli, mut diagnostics: impl Write) -> Result<CliOutcome, CliError> {
    let span = Span::current();
    let Some(path) = cli.path else {
        span.record("command", field::display("usage"));
        return Ok(CliOutcome::Usage);
    };
    span.record("command", field::display("summarise"));
    summarise(&path, cli.options, &mut diagnostics).map(CliOutcome::Summarised)
}

#[instrument(
    name = "cli.summarise",
    err,
    skip(options, diagnostics),
    fields(
        path = %path.display(),
        bucket = field::Empty,
        format = field::Empty,
        output = field::Empty,
    ),
)]
pub(super) fn summarise(
    path: &Path,
    options: SummariseOptions,
    diagnostics: &mut dyn Write,
) -> Result<ExecutionSummary, CliError> {
    let bucketing = KeyBucketing::from(options.bucket);
    let format = OutputFormat::from(options.format);
    let span = Span::current();
    span.record("bucket", bucketing.as_str());
    span.record("format", format.as_str());

    let aggregator = AggregatorBuilder::new()
        .with_key_column(options.key_column)
        .with_value_column(options.value_column)
        .with_row_width(options.row_width)
        .with_bucketing(bucketing)
        .build()?;

    let row_width = aggregator.layout().row_width();
    let mut echo_failure = None;
    let aggregation = aggregator.run_with(open_input(path)?, |row| {
        if echo_failure.is_none() {
            echo_failure = render_skipped_row(row, row_width, &mut *diagnostics).err();
        }
    })?;
    if let Some(source) = echo_failure {
        return Err(CliError::Diagnostics { source });
    }

    let output = resolve_output_path(path, options.output.as_deref())?;
    span.record("output", field::display(output.display()));
    write_summary(&output, &aggregation.table, format)?;

    info!(
        keys = aggregation.table.len(),
        rows_read = aggregation.rows_read,
        rows_skipped = aggregation.skipped.len(),
        "summary written"
    );
    Ok(ExecutionSummary {
        input: path.to_path_buf(),
        output,
        keys: aggregation.table.len(),
        rows_read: aggregation.rows_read,
        row_width,
        skipped: aggregation.skipped,
    })
}

#[instrument(name = "cli.open_input", err, fields(path = %path.display()))]
pub(super) fn open_input(path: &Path) -> Result<BufReader<File>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

#[instrument(
    name = "cli.write_summary",
    err,
    skip(table),
    fields(path = %path.display(), keys = table.len()),
)]
pub(super) fn write_summary(
    path: &Path,
    table: &LengthTable,
    format: OutputFormat,
) -> Result<(), CliError> {
    let file = File::create(path).map_err(|source| CliError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    render_table(table, format, &mut writer)
        .and_then(|()| writer.flush())
        .map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Renders the usage text shown when no input path is given.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_usage(mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "Usage: {BINARY_NAME} <name_of_term_ratios_file>")?;
    writeln!(writer, "Run `{BINARY_NAME} --help` for options.")
}

/// Echoes one skipped row after an `Error:` label.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use termratio_cli::cli::render_skipped_row;
/// # use termratio_core::SkippedRow;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let row = SkippedRow { line: 3, fields: vec!["a".into(), "b".into()] };
/// let mut buffer = Vec::new();
/// render_skipped_row(&row, 6, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "Error: line 3: expected 6 fields, found 2: [\"a\", \"b\"]\n"
/// );
/// # Ok(())
/// # }
/// ```
pub fn render_skipped_row(
    row: &SkippedRow,
    row_width: usize,
    mut writer: impl Write,
) -> io::Result<()> {
    writeln!(
        writer,
        "Error: line {}: expected {} fields, found {}: {:?}",
        row.line,
        row_width,
        row.field_count(),
        row.fields
    )
}

/// Renders the one-line report of a completed run.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_report(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(
        writer,
        "wrote {} keys to {} ({} rows read, {} skipped)",
        summary.keys,
        summary.output.display(),
        summary.rows_read,
        summary.skipped.len()
    )
}
