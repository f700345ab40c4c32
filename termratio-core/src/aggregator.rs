//! Streaming aggregation of term ratios rows.
//!
//! Provides [`AggregatorBuilder`] for validating the row layout and
//! [`Aggregator::run`], which consumes a header-carrying tab-separated stream
//! in one pass, line by line.

use std::io::BufRead;

use csv::StringRecord;
use tracing::{Span, debug, field, instrument, warn};

use crate::{
    Result,
    bucketing::KeyBucketing,
    error::AggregateError,
    layout::{DEFAULT_KEY_COLUMN, DEFAULT_ROW_WIDTH, DEFAULT_VALUE_COLUMN, RowLayout},
    record::{RowOutcome, SkippedRow, parse_row},
    table::LengthTable,
};

/// Configures and constructs [`Aggregator`] instances.
///
/// # Examples
/// ```
/// use termratio_core::{AggregatorBuilder, KeyBucketing};
///
/// let aggregator = AggregatorBuilder::new()
///     .with_row_width(2)
///     .with_key_column(0)
///     .with_value_column(1)
///     .with_bucketing(KeyBucketing::Log10)
///     .build()
///     .expect("layout is valid");
/// assert_eq!(aggregator.layout().row_width(), 2);
/// assert_eq!(aggregator.bucketing(), KeyBucketing::Log10);
/// ```
#[derive(Debug, Clone)]
pub struct AggregatorBuilder {
    key_column: usize,
    value_column: usize,
    row_width: usize,
    bucketing: KeyBucketing,
}

impl Default for AggregatorBuilder {
    fn default() -> Self {
        Self {
            key_column: DEFAULT_KEY_COLUMN,
            value_column: DEFAULT_VALUE_COLUMN,
            row_width: DEFAULT_ROW_WIDTH,
            bucketing: KeyBucketing::Exact,
        }
    }
}

impl AggregatorBuilder {
    /// Creates a builder for the standard six-column term ratios layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the zero-based column holding the grouping key.
    #[must_use]
    pub fn with_key_column(mut self, column: usize) -> Self {
        self.key_column = column;
        self
    }

    /// Overrides the zero-based column holding the accumulated value.
    #[must_use]
    pub fn with_value_column(mut self, column: usize) -> Self {
        self.value_column = column;
        self
    }

    /// Overrides the number of fields a row must carry to be counted.
    #[must_use]
    pub fn with_row_width(mut self, width: usize) -> Self {
        self.row_width = width;
        self
    }

    /// Selects how keys are grouped.
    #[must_use]
    pub fn with_bucketing(mut self, bucketing: KeyBucketing) -> Self {
        self.bucketing = bucketing;
        self
    }

    /// Validates the configuration and constructs an [`Aggregator`].
    ///
    /// # Errors
    /// Returns [`AggregateError::InvalidLayout`] when a column falls outside
    /// the configured row width.
    pub fn build(self) -> Result<Aggregator> {
        let layout = RowLayout::new(self.key_column, self.value_column, self.row_width)?;
        Ok(Aggregator {
            layout,
            bucketing: self.bucketing,
        })
    }
}

/// Result of one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// Per-key counters in first-seen order.
    pub table: LengthTable,
    /// Rows left out because of their width, in input order.
    pub skipped: Vec<SkippedRow>,
    /// Data rows read after the header, skipped ones included.
    pub rows_read: u64,
}

/// Single-pass aggregator over term ratios streams.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use termratio_core::AggregatorBuilder;
///
/// let input = "doc\tlength\tdistinct\ta\tb\tc\n\
///              x\t10\t3\t-\t-\t-\n\
///              x\t10\t5\t-\t-\t-\n\
///              x\t20\t2\t-\t-\t-\n";
/// let aggregation = AggregatorBuilder::new()
///     .build()?
///     .run(Cursor::new(input))?;
/// assert_eq!(aggregation.table.get(10).map(|c| c.average()), Some(4.0));
/// assert_eq!(aggregation.table.get(20).map(|c| c.average()), Some(2.0));
/// # Ok::<(), termratio_core::AggregateError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Aggregator {
    layout: RowLayout,
    bucketing: KeyBucketing,
}

impl Aggregator {
    /// Returns the validated row layout.
    #[must_use]
    pub const fn layout(&self) -> &RowLayout {
        &self.layout
    }

    /// Returns the key bucketing strategy.
    #[must_use]
    pub const fn bucketing(&self) -> KeyBucketing {
        self.bucketing
    }

    /// Consumes `reader`, discarding its first line and aggregating the rest.
    ///
    /// Every line after the header is a row. Rows are split on tabs with no
    /// quote handling, and an empty line is a row with no fields. Rows of the
    /// wrong width are collected in [`Aggregation::skipped`] and logged at
    /// `warn`. An input without any line yields an empty aggregation.
    ///
    /// # Errors
    /// Returns [`AggregateError::ReadHeader`] or [`AggregateError::ReadRow`]
    /// when the stream cannot be read or is not UTF-8, the numeric errors of
    /// [`parse_row`], and [`AggregateError::CountOverflow`].
    pub fn run<R: BufRead>(&self, reader: R) -> Result<Aggregation> {
        self.run_with(reader, |_| {})
    }

    /// Like [`Aggregator::run`], but hands each skipped row to `on_skip` as
    /// soon as it is classified.
    ///
    /// Rows reported before a fatal error are therefore visible to the caller
    /// even though no [`Aggregation`] is returned.
    ///
    /// # Errors
    /// Returns the same errors as [`Aggregator::run`].
    ///
    /// # Examples
    /// ```
    /// use std::io::Cursor;
    /// use termratio_core::AggregatorBuilder;
    ///
    /// let input = "h\nshort\trow\nx\tten\t3\t-\t-\t-\n";
    /// let mut seen = Vec::new();
    /// let result = AggregatorBuilder::new()
    ///     .build()?
    ///     .run_with(Cursor::new(input), |row| seen.push(row.line));
    /// assert!(result.is_err());
    /// assert_eq!(seen, vec![2]);
    /// # Ok::<(), termratio_core::AggregateError>(())
    /// ```
    #[instrument(
        name = "aggregate.run",
        err,
        skip(self, reader, on_skip),
        fields(
            bucketing = self.bucketing.as_str(),
            row_width = self.layout.row_width(),
            rows_read = field::Empty,
            rows_skipped = field::Empty,
            keys = field::Empty,
        ),
    )]
    pub fn run_with<R, F>(&self, mut reader: R, mut on_skip: F) -> Result<Aggregation>
    where
        R: BufRead,
        F: FnMut(&SkippedRow),
    {
        let mut header = Vec::new();
        let header_len = reader
            .read_until(b'\n', &mut header)
            .map_err(|source| AggregateError::ReadHeader { source })?;
        if header_len == 0 {
            debug!("input has no header line");
            return Ok(Aggregation::default());
        }

        let mut aggregation = Aggregation::default();
        let mut buffer = String::new();
        let mut record = StringRecord::new();
        let mut line = 1_u64;
        loop {
            line += 1;
            buffer.clear();
            let read = reader
                .read_line(&mut buffer)
                .map_err(|source| AggregateError::ReadRow { line, source })?;
            if read == 0 {
                break;
            }
            aggregation.rows_read += 1;
            split_line(&buffer, &mut record);
            match parse_row(&self.layout, self.bucketing, line, &record)? {
                RowOutcome::Accumulated(observation) => {
                    aggregation.table.record(observation, line)?;
                }
                RowOutcome::Skipped(row) => {
                    warn!(
                        line = row.line,
                        fields = row.field_count(),
                        expected = self.layout.row_width(),
                        row = ?row.fields,
                        "skipping malformed row"
                    );
                    on_skip(&row);
                    aggregation.skipped.push(row);
                }
            }
        }

        let span = Span::current();
        span.record("rows_read", aggregation.rows_read);
        span.record("rows_skipped", aggregation.skipped.len());
        span.record("keys", aggregation.table.len());
        Ok(aggregation)
    }
}

/// Splits one physical line on tabs into `record`.
///
/// The line terminator (`\n` or `\r\n`) is not part of the last field. An
/// empty line yields a record with no fields.
fn split_line(raw: &str, record: &mut StringRecord) {
    record.clear();
    let content = raw.strip_suffix('\n').unwrap_or(raw);
    let content = content.strip_suffix('\r').unwrap_or(content);
    if !content.is_empty() {
        record.extend(content.split('\t'));
    }
}
