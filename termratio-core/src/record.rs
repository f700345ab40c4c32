//! Classification of individual data rows.
//!
//! Every split row either contributes an [`Observation`] to the aggregate or
//! is skipped with a [`SkippedRow`] diagnostic. Numeric failures are not
//! recoverable and surface as errors instead.

use csv::StringRecord;

use crate::{Result, bucketing::KeyBucketing, bucketing::parse_integer, layout::RowLayout};

/// A grouping key and the value it contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// Grouping key, normally the document length.
    pub key: i64,
    /// Distinct-term count contributed by the row.
    pub value: i64,
}

/// A row that was skipped because it had the wrong number of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// One-based physical line number, counting the header.
    pub line: u64,
    /// Fields exactly as split from the row.
    pub fields: Vec<String>,
}

impl SkippedRow {
    /// Returns how many fields the row carried.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Outcome of classifying one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// The row was well formed and produced an observation.
    Accumulated(Observation),
    /// The row had the wrong width and was left out.
    Skipped(SkippedRow),
}

/// Classifies the row read from physical line `line`.
///
/// # Errors
/// Returns [`crate::AggregateError::InvalidInteger`] when the value field, or
/// the key field under [`KeyBucketing::Exact`], is not an integer, and
/// [`crate::AggregateError::InvalidBucketValue`] when a log10 key is not a
/// positive number.
///
/// # Examples
/// ```
/// use csv::StringRecord;
/// use termratio_core::{KeyBucketing, Observation, RowLayout, RowOutcome, parse_row};
///
/// let row = StringRecord::from(vec!["doc", "10", "3", "-", "-", "-"]);
/// let outcome = parse_row(&RowLayout::default(), KeyBucketing::Exact, 2, &row)
///     .expect("row is numeric");
/// assert_eq!(outcome, RowOutcome::Accumulated(Observation { key: 10, value: 3 }));
/// ```
pub fn parse_row(
    layout: &RowLayout,
    bucketing: KeyBucketing,
    line: u64,
    record: &StringRecord,
) -> Result<RowOutcome> {
    let fields = (record.len() == layout.row_width())
        .then(|| record.get(layout.key_column()).zip(record.get(layout.value_column())))
        .flatten();
    let Some((raw_key, raw_value)) = fields else {
        return Ok(RowOutcome::Skipped(SkippedRow {
            line,
            fields: record.iter().map(ToOwned::to_owned).collect(),
        }));
    };

    let key = bucketing.bucket(raw_key, line, layout.key_column())?;
    let value = parse_integer(raw_value, line, layout.value_column())?;
    Ok(RowOutcome::Accumulated(Observation { key, value }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::error::AggregateError;

    fn row(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[rstest]
    #[case::too_few(&["x", "10", "3", "-", "-"])]
    #[case::too_many(&["x", "10", "3", "-", "-", "-", "-"])]
    #[case::single_field(&["x 10 3"])]
    fn wrong_width_rows_are_skipped(#[case] fields: &[&str]) {
        let outcome = parse_row(&RowLayout::default(), KeyBucketing::Exact, 7, &row(fields))
            .expect("width mismatches must not fail");
        let RowOutcome::Skipped(skipped) = outcome else {
            panic!("expected a skipped row");
        };
        assert_eq!(skipped.line, 7);
        assert_eq!(skipped.field_count(), fields.len());
        assert_eq!(skipped.fields, fields);
    }

    #[test]
    fn width_check_precedes_numeric_parsing() {
        let outcome = parse_row(
            &RowLayout::default(),
            KeyBucketing::Exact,
            3,
            &row(&["x", "ten", "three"]),
        )
        .expect("short rows are skipped before parsing");
        assert!(matches!(outcome, RowOutcome::Skipped(_)));
    }

    #[test]
    fn custom_layout_reads_configured_columns() {
        let layout = RowLayout::new(0, 1, 2).expect("layout is valid");
        let outcome = parse_row(&layout, KeyBucketing::Exact, 2, &row(&["250", "97"]))
            .expect("row is numeric");
        assert_eq!(
            outcome,
            RowOutcome::Accumulated(Observation {
                key: 250,
                value: 97
            })
        );
    }

    #[rstest]
    #[case::bad_key(&["x", "ten", "3", "-", "-", "-"], 1)]
    #[case::bad_value(&["x", "10", "three", "-", "-", "-"], 2)]
    fn non_integer_fields_fail(#[case] fields: &[&str], #[case] expected_column: usize) {
        let err = parse_row(&RowLayout::default(), KeyBucketing::Exact, 4, &row(fields))
            .expect_err("non-integer fields must fail");
        assert!(matches!(
            err,
            AggregateError::InvalidInteger { line: 4, column, .. } if column == expected_column
        ));
    }

    #[test]
    fn log10_bucketing_applies_to_key_only() {
        let outcome = parse_row(
            &RowLayout::default(),
            KeyBucketing::Log10,
            2,
            &row(&["x", "1234", "345", "-", "-", "-"]),
        )
        .expect("row is numeric");
        assert_eq!(
            outcome,
            RowOutcome::Accumulated(Observation { key: 3, value: 345 })
        );
    }
}
