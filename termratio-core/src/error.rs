//! Error types for the termratio core library.
//!
//! Defines the error enum exposed by the public API, its stable error codes,
//! and a convenient result alias.

use std::{fmt, io, num::ParseIntError, path::PathBuf};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced while configuring or running an aggregation.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AggregateError {
    /// The row layout referenced columns outside the row, or had zero width.
    #[error(
        "invalid row layout: key column {key_column} and value column {value_column} must both be below row width {row_width}"
    )]
    InvalidLayout {
        /// Zero-based index of the grouping key column.
        key_column: usize,
        /// Zero-based index of the accumulated value column.
        value_column: usize,
        /// Number of fields every data row must carry.
        row_width: usize,
    },
    /// A key or value field did not hold an integer.
    #[error("line {line}, column {column}: `{value}` is not an integer: {source}")]
    InvalidInteger {
        /// One-based physical line number, counting the header.
        line: u64,
        /// Zero-based column index of the offending field.
        column: usize,
        /// Raw field contents.
        value: String,
        /// Underlying parse failure.
        #[source]
        source: ParseIntError,
    },
    /// A key could not be bucketed on a logarithmic scale.
    #[error("line {line}, column {column}: `{value}` must be a positive finite number to bucket by log10")]
    InvalidBucketValue {
        /// One-based physical line number, counting the header.
        line: u64,
        /// Zero-based column index of the offending field.
        column: usize,
        /// Raw field contents.
        value: String,
    },
    /// An accumulator for `key` no longer fits its integer type.
    #[error("line {line}: accumulator for key {key} overflowed")]
    CountOverflow {
        /// One-based physical line number of the row that overflowed.
        line: u64,
        /// Grouping key whose counters overflowed.
        key: i64,
    },
    /// The header line could not be read.
    #[error("failed to read header line: {source}")]
    ReadHeader {
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A data row could not be read or decoded.
    #[error("line {line}: failed to read data row: {source}")]
    ReadRow {
        /// One-based physical line number, counting the header.
        line: u64,
        /// Underlying I/O or UTF-8 decoding failure.
        #[source]
        source: io::Error,
    },
    /// The input path could not be rewritten because it is not valid UTF-8.
    #[error("path `{}` is not valid UTF-8", .path.display())]
    NonUtf8Path {
        /// Path that could not be represented as UTF-8.
        path: PathBuf,
    },
    /// Writing the summary would replace the input file.
    #[error("output path `{}` is the input file; refusing to overwrite it", .path.display())]
    OutputWouldOverwriteInput {
        /// Path shared by the input and the output.
        path: PathBuf,
    },
}

define_error_codes! {
    /// Stable codes describing [`AggregateError`] variants.
    enum AggregateErrorCode for AggregateError {
        /// The row layout referenced columns outside the row.
        InvalidLayout => InvalidLayout { .. } => "AGGREGATE_INVALID_LAYOUT",
        /// A key or value field did not hold an integer.
        InvalidInteger => InvalidInteger { .. } => "AGGREGATE_INVALID_INTEGER",
        /// A key could not be bucketed on a logarithmic scale.
        InvalidBucketValue => InvalidBucketValue { .. } => "AGGREGATE_INVALID_BUCKET_VALUE",
        /// An accumulator overflowed.
        CountOverflow => CountOverflow { .. } => "AGGREGATE_COUNT_OVERFLOW",
        /// The header line could not be read.
        ReadHeader => ReadHeader { .. } => "AGGREGATE_READ_HEADER",
        /// A data row could not be read or decoded.
        ReadRow => ReadRow { .. } => "AGGREGATE_READ_ROW",
        /// The input path is not valid UTF-8.
        NonUtf8Path => NonUtf8Path { .. } => "AGGREGATE_NON_UTF8_PATH",
        /// Writing the summary would replace the input file.
        OutputWouldOverwriteInput => OutputWouldOverwriteInput { .. } => "AGGREGATE_OUTPUT_OVERWRITES_INPUT",
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, AggregateError>;
