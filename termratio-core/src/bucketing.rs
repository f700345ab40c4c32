//! Key bucketing strategies.

use crate::{Result, error::AggregateError};

/// Selects how the raw key field becomes a grouping key.
///
/// # Examples
/// ```
/// use termratio_core::KeyBucketing;
///
/// assert_eq!(KeyBucketing::Exact.bucket("250", 2, 1).expect("integer key"), 250);
/// assert_eq!(KeyBucketing::Log10.bucket("250", 2, 1).expect("positive key"), 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyBucketing {
    /// Group by the integer document length itself.
    #[default]
    Exact,
    /// Group by the order of magnitude, `floor(log10(length))`.
    Log10,
}

impl KeyBucketing {
    /// Stable lowercase label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Log10 => "log10",
        }
    }

    /// Converts the raw key field found at `line`/`column` into a grouping key.
    ///
    /// Surrounding ASCII whitespace is ignored.
    ///
    /// # Errors
    /// [`KeyBucketing::Exact`] returns [`AggregateError::InvalidInteger`] for
    /// anything that is not an `i64`. [`KeyBucketing::Log10`] returns
    /// [`AggregateError::InvalidBucketValue`] when the field is not a positive
    /// finite number.
    pub fn bucket(self, raw: &str, line: u64, column: usize) -> Result<i64> {
        match self {
            Self::Exact => parse_integer(raw, line, column),
            Self::Log10 => log10_bucket(raw, line, column),
        }
    }
}

/// Parses an integer field, reporting its position on failure.
pub(crate) fn parse_integer(raw: &str, line: u64, column: usize) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|source| AggregateError::InvalidInteger {
            line,
            column,
            value: raw.to_owned(),
            source,
        })
}

fn log10_bucket(raw: &str, line: u64, column: usize) -> Result<i64> {
    let invalid = || AggregateError::InvalidBucketValue {
        line,
        column,
        value: raw.to_owned(),
    };
    let value = raw.trim().parse::<f64>().map_err(|_| invalid())?;
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid());
    }
    // log10 of any positive finite f64 lies within [-324, 309].
    Ok(value.log10().floor() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("10", 10)]
    #[case(" 42 ", 42)]
    #[case("+7", 7)]
    #[case("-3", -3)]
    fn exact_parses_integers(#[case] raw: &str, #[case] expected: i64) {
        let key = KeyBucketing::Exact
            .bucket(raw, 2, 1)
            .expect("integer keys must parse");
        assert_eq!(key, expected);
    }

    #[rstest]
    #[case("")]
    #[case("ten")]
    #[case("4.5")]
    #[case("99999999999999999999")]
    fn exact_rejects_non_integers(#[case] raw: &str) {
        let err = KeyBucketing::Exact
            .bucket(raw, 5, 1)
            .expect_err("non-integer keys must fail");
        match err {
            AggregateError::InvalidInteger {
                line,
                column,
                value,
                ..
            } => {
                assert_eq!(line, 5);
                assert_eq!(column, 1);
                assert_eq!(value, raw);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    #[case("1", 0)]
    #[case("9", 0)]
    #[case("10", 1)]
    #[case("99", 1)]
    #[case("100", 2)]
    #[case("12.5", 1)]
    #[case("0.5", -1)]
    fn log10_groups_by_magnitude(#[case] raw: &str, #[case] expected: i64) {
        let key = KeyBucketing::Log10
            .bucket(raw, 2, 1)
            .expect("positive keys must bucket");
        assert_eq!(key, expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-10")]
    #[case("inf")]
    #[case("NaN")]
    #[case("many")]
    fn log10_rejects_non_positive_or_non_finite(#[case] raw: &str) {
        let err = KeyBucketing::Log10
            .bucket(raw, 8, 1)
            .expect_err("invalid magnitude must fail");
        assert!(matches!(
            err,
            AggregateError::InvalidBucketValue { line: 8, column: 1, .. }
        ));
    }
}
