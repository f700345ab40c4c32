//! Column layout of a term ratios row.
//!
//! A term ratios file carries one document per row. The default layout reads
//! the document length from column 1 and the distinct-term count from column 2
//! of a six-column row.

use crate::{Result, error::AggregateError};

/// Default zero-based column holding the document length.
pub const DEFAULT_KEY_COLUMN: usize = 1;
/// Default zero-based column holding the distinct-term count.
pub const DEFAULT_VALUE_COLUMN: usize = 2;
/// Default number of fields in every data row.
pub const DEFAULT_ROW_WIDTH: usize = 6;

/// Describes which fields of a row are consumed and how wide rows must be.
///
/// # Examples
/// ```
/// use termratio_core::RowLayout;
///
/// let layout = RowLayout::default();
/// assert_eq!(layout.key_column(), 1);
/// assert_eq!(layout.value_column(), 2);
/// assert_eq!(layout.row_width(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    key_column: usize,
    value_column: usize,
    row_width: usize,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self {
            key_column: DEFAULT_KEY_COLUMN,
            value_column: DEFAULT_VALUE_COLUMN,
            row_width: DEFAULT_ROW_WIDTH,
        }
    }
}

impl RowLayout {
    /// Validates and builds a layout.
    ///
    /// Both columns must fall inside the row, which also rules out a zero
    /// width. The key and value may share a column.
    ///
    /// # Errors
    /// Returns [`AggregateError::InvalidLayout`] when either column is not
    /// below `row_width`.
    ///
    /// # Examples
    /// ```
    /// use termratio_core::RowLayout;
    ///
    /// let layout = RowLayout::new(0, 1, 2).expect("layout is valid");
    /// assert_eq!(layout.row_width(), 2);
    /// assert!(RowLayout::new(0, 2, 2).is_err());
    /// ```
    pub fn new(key_column: usize, value_column: usize, row_width: usize) -> Result<Self> {
        if key_column >= row_width || value_column >= row_width {
            return Err(AggregateError::InvalidLayout {
                key_column,
                value_column,
                row_width,
            });
        }
        Ok(Self {
            key_column,
            value_column,
            row_width,
        })
    }

    /// Returns the zero-based column holding the grouping key.
    #[must_use]
    pub const fn key_column(&self) -> usize {
        self.key_column
    }

    /// Returns the zero-based column holding the accumulated value.
    #[must_use]
    pub const fn value_column(&self) -> usize {
        self.value_column
    }

    /// Returns the number of fields a row needs to be counted.
    #[must_use]
    pub const fn row_width(&self) -> usize {
        self.row_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::defaults(1, 2, 6)]
    #[case::two_column_file(0, 1, 2)]
    #[case::shared_column(3, 3, 4)]
    fn new_accepts_columns_inside_row(
        #[case] key_column: usize,
        #[case] value_column: usize,
        #[case] row_width: usize,
    ) {
        let layout = RowLayout::new(key_column, value_column, row_width)
            .expect("columns inside the row must be accepted");
        assert_eq!(layout.key_column(), key_column);
        assert_eq!(layout.value_column(), value_column);
        assert_eq!(layout.row_width(), row_width);
    }

    #[rstest]
    #[case::zero_width(0, 0, 0)]
    #[case::key_outside(6, 2, 6)]
    #[case::value_outside(1, 9, 6)]
    fn new_rejects_columns_outside_row(
        #[case] key_column: usize,
        #[case] value_column: usize,
        #[case] row_width: usize,
    ) {
        let err = RowLayout::new(key_column, value_column, row_width)
            .expect_err("columns outside the row must be rejected");
        assert!(matches!(
            err,
            AggregateError::InvalidLayout { row_width: width, .. } if width == row_width
        ));
    }
}
