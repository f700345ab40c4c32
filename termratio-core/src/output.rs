//! Rendering of the aggregate table and placement of the output file.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::{Result, error::AggregateError, table::LengthTable};

/// Substring of the input path replaced when deriving the output path.
pub const INPUT_SUFFIX: &str = ".tsv";
/// Replacement for [`INPUT_SUFFIX`].
pub const OUTPUT_SUFFIX: &str = ".out";

/// Line format of the summary file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `<key>\t<average>` with three decimals.
    #[default]
    Averages,
    /// `<key>\t<documents>\t<distinct term total>`.
    Totals,
}

impl OutputFormat {
    /// Stable lowercase label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Averages => "averages",
            Self::Totals => "totals",
        }
    }
}

/// Writes one line per key of `table`, in first-seen order.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
///
/// # Examples
/// ```
/// use termratio_core::{LengthTable, Observation, OutputFormat, render_table};
///
/// let mut table = LengthTable::new();
/// table.record(Observation { key: 10, value: 3 }, 2)?;
/// table.record(Observation { key: 10, value: 5 }, 3)?;
/// table.record(Observation { key: 20, value: 2 }, 4)?;
/// let mut buffer = Vec::new();
/// render_table(&table, OutputFormat::Averages, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "10\t4.000\n20\t2.000\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_table(
    table: &LengthTable,
    format: OutputFormat,
    mut writer: impl Write,
) -> io::Result<()> {
    for (key, counters) in table.iter() {
        match format {
            OutputFormat::Averages => writeln!(writer, "{key}\t{:.3}", counters.average())?,
            OutputFormat::Totals => writeln!(
                writer,
                "{key}\t{}\t{}",
                counters.documents, counters.distinct_terms
            )?,
        }
    }
    Ok(())
}

/// Derives the summary path by replacing every `.tsv` in `input` with `.out`.
///
/// # Errors
/// Returns [`AggregateError::NonUtf8Path`] when `input` is not UTF-8 and
/// [`AggregateError::OutputWouldOverwriteInput`] when `input` contains no
/// `.tsv` to replace.
///
/// # Examples
/// ```
/// use std::path::{Path, PathBuf};
/// use termratio_core::derive_output_path;
///
/// let output = derive_output_path(Path::new("corpus_termRatios.tsv"))?;
/// assert_eq!(output, PathBuf::from("corpus_termRatios.out"));
/// # Ok::<(), termratio_core::AggregateError>(())
/// ```
pub fn derive_output_path(input: &Path) -> Result<PathBuf> {
    let raw = input.to_str().ok_or_else(|| AggregateError::NonUtf8Path {
        path: input.to_path_buf(),
    })?;
    let derived = PathBuf::from(raw.replace(INPUT_SUFFIX, OUTPUT_SUFFIX));
    ensure_distinct(input, derived)
}

/// Chooses the summary path: `requested` when given, otherwise the derived one.
///
/// # Errors
/// Returns [`AggregateError::OutputWouldOverwriteInput`] when the chosen path
/// equals `input`, plus the errors of [`derive_output_path`].
pub fn resolve_output_path(input: &Path, requested: Option<&Path>) -> Result<PathBuf> {
    match requested {
        Some(path) => ensure_distinct(input, path.to_path_buf()),
        None => derive_output_path(input),
    }
}

fn ensure_distinct(input: &Path, output: PathBuf) -> Result<PathBuf> {
    if output == input {
        return Err(AggregateError::OutputWouldOverwriteInput { path: output });
    }
    Ok(output)
}
