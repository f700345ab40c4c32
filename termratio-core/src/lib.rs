//! termratio core library.
//!
//! Aggregates term ratios files, one row per document, into average
//! distinct-term counts per document length. The library works on any
//! [`std::io::BufRead`] and [`std::io::Write`]; opening files is left to the
//! caller.

mod aggregator;
mod bucketing;
mod error;
mod layout;
mod output;
mod record;
mod table;

pub use crate::{
    aggregator::{Aggregation, Aggregator, AggregatorBuilder},
    bucketing::KeyBucketing,
    error::{AggregateError, AggregateErrorCode, Result},
    layout::{DEFAULT_KEY_COLUMN, DEFAULT_ROW_WIDTH, DEFAULT_VALUE_COLUMN, RowLayout},
    output::{
        INPUT_SUFFIX, OUTPUT_SUFFIX, OutputFormat, derive_output_path, render_table,
        resolve_output_path,
    },
    record::{Observation, RowOutcome, SkippedRow, parse_row},
    table::{LengthCounters, LengthTable},
};
