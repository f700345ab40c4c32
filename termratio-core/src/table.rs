//! Insertion-ordered aggregate table keyed by document length.

use indexmap::IndexMap;

use crate::{Result, error::AggregateError, record::Observation};

/// Paired accumulators for one grouping key.
///
/// Both counters live in one value so a key can never carry one without the
/// other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LengthCounters {
    /// Number of rows observed with this key.
    pub documents: u64,
    /// Sum of distinct-term counts across those rows.
    pub distinct_terms: i64,
}

impl LengthCounters {
    /// Mean distinct-term count across the documents of this key.
    ///
    /// Both counters are converted to `f64` before dividing, so the result is
    /// exact only while each stays within 2^53 in magnitude. Beyond that the
    /// operands are rounded before the division is.
    ///
    /// # Examples
    /// ```
    /// use termratio_core::LengthCounters;
    ///
    /// let counters = LengthCounters { documents: 2, distinct_terms: 8 };
    /// assert_eq!(counters.average(), 4.0);
    /// ```
    #[must_use]
    pub fn average(&self) -> f64 {
        self.distinct_terms as f64 / self.documents as f64
    }
}

/// Per-key counters in the order keys were first observed.
///
/// # Examples
/// ```
/// use termratio_core::{LengthTable, Observation};
///
/// let mut table = LengthTable::new();
/// table.record(Observation { key: 20, value: 2 }, 2)?;
/// table.record(Observation { key: 10, value: 3 }, 3)?;
/// table.record(Observation { key: 20, value: 4 }, 4)?;
/// let keys: Vec<i64> = table.iter().map(|(key, _)| key).collect();
/// assert_eq!(keys, vec![20, 10]);
/// # Ok::<(), termratio_core::AggregateError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LengthTable {
    rows: IndexMap<i64, LengthCounters>,
}

impl LengthTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one document to the counters of `observation.key`.
    ///
    /// `line` identifies the source row in overflow errors. Existing keys keep
    /// their original position.
    ///
    /// # Errors
    /// Returns [`AggregateError::CountOverflow`] when either counter would
    /// overflow; the table is left unchanged in that case.
    pub fn record(&mut self, observation: Observation, line: u64) -> Result<()> {
        let Observation { key, value } = observation;
        let current = self.rows.get(&key).copied().unwrap_or_default();
        let overflow = || AggregateError::CountOverflow { line, key };
        let updated = LengthCounters {
            documents: current.documents.checked_add(1).ok_or_else(overflow)?,
            distinct_terms: current
                .distinct_terms
                .checked_add(value)
                .ok_or_else(overflow)?,
        };
        self.rows.insert(key, updated);
        Ok(())
    }

    /// Returns the counters recorded for `key`.
    #[must_use]
    pub fn get(&self, key: i64) -> Option<&LengthCounters> {
        self.rows.get(&key)
    }

    /// Iterates keys and counters in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &LengthCounters)> + '_ {
        self.rows.iter().map(|(key, counters)| (*key, counters))
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when no row has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of documents recorded across all keys.
    #[must_use]
    pub fn total_documents(&self) -> u64 {
        self.rows.values().map(|counters| counters.documents).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn observation(key: i64, value: i64) -> Observation {
        Observation { key, value }
    }

    #[rstest]
    #[case::exact(3, 10, 10.0 / 3.0)]
    #[case::at_float_limit(1, 1 << 53, 9_007_199_254_740_992.0)]
    #[case::operand_rounded(1, (1 << 53) + 1, 9_007_199_254_740_992.0)]
    fn average_converts_operands_before_dividing(
        #[case] documents: u64,
        #[case] distinct_terms: i64,
        #[case] expected: f64,
    ) {
        let counters = LengthCounters {
            documents,
            distinct_terms,
        };
        assert_eq!(counters.average(), expected);
    }

    #[test]
    fn record_accumulates_per_key() {
        let mut table = LengthTable::new();
        for (line, (key, value)) in [(10, 3), (10, 5), (20, 2)].into_iter().enumerate() {
            table
                .record(observation(key, value), line as u64 + 2)
                .expect("small counters must not overflow");
        }
        assert_eq!(
            table.get(10),
            Some(&LengthCounters {
                documents: 2,
                distinct_terms: 8
            })
        );
        assert_eq!(
            table.get(20),
            Some(&LengthCounters {
                documents: 1,
                distinct_terms: 2
            })
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.total_documents(), 3);
    }

    #[test]
    fn overflow_leaves_table_unchanged() {
        let mut table = LengthTable::new();
        table
            .record(observation(5, i64::MAX), 2)
            .expect("first value fits");
        let err = table
            .record(observation(5, 1), 3)
            .expect_err("sum beyond i64::MAX must fail");
        assert!(matches!(
            err,
            AggregateError::CountOverflow { line: 3, key: 5 }
        ));
        assert_eq!(
            table.get(5),
            Some(&LengthCounters {
                documents: 1,
                distinct_terms: i64::MAX
            })
        );
    }

    #[rstest]
    #[case(2, 8, 4.0)]
    #[case(3, 10, 10.0 / 3.0)]
    #[case(4, -2, -0.5)]
    fn average_divides_total_by_documents(
        #[case] documents: u64,
        #[case] distinct_terms: i64,
        #[case] expected: f64,
    ) {
        let counters = LengthCounters {
            documents,
            distinct_terms,
        };
        assert_eq!(counters.average(), expected);
    }

    #[test]
    fn empty_table_reports_empty() {
        let table = LengthTable::new();
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
        assert_eq!(table.total_documents(), 0);
    }
}
