//! Builders for term ratios inputs.
//!
//! Tests across the workspace need small header-carrying TSV files. The
//! builder here renders them in the six-column layout the aggregator reads by
//! default, and can also emit arbitrary raw rows for malformed-input cases.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Header written by [`TermRatiosFile::new`].
pub const DEFAULT_HEADER: &str = "#DocNum\tDocLength\tDistinctWords\tRatio\tFirstTerm\tLastTerm";

/// In-memory term ratios file.
///
/// # Examples
/// ```
/// use termratio_test_support::fixtures::TermRatiosFile;
///
/// let contents = TermRatiosFile::with_header("h")
///     .document(10, 3)
///     .raw_row(&["short", "row"])
///     .contents();
/// assert_eq!(contents, "h\ndoc0\t10\t3\t0.300\t-\t-\nshort\trow\n");
/// ```
#[derive(Debug, Clone)]
pub struct TermRatiosFile {
    lines: Vec<String>,
    documents: usize,
}

impl Default for TermRatiosFile {
    fn default() -> Self {
        Self::new()
    }
}

impl TermRatiosFile {
    /// Starts a file with [`DEFAULT_HEADER`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_header(DEFAULT_HEADER)
    }

    /// Starts a file with a custom header line.
    #[must_use]
    pub fn with_header(header: &str) -> Self {
        Self {
            lines: vec![header.to_owned()],
            documents: 0,
        }
    }

    /// Appends a well-formed six-column row for one document.
    #[must_use]
    pub fn document(mut self, length: i64, distinct_terms: i64) -> Self {
        let ratio = if length == 0 {
            0.0
        } else {
            distinct_terms as f64 / length as f64
        };
        self.lines.push(format!(
            "doc{}\t{length}\t{distinct_terms}\t{ratio:.3}\t-\t-",
            self.documents
        ));
        self.documents += 1;
        self
    }

    /// Appends `fields` joined by tabs, exactly as given.
    #[must_use]
    pub fn raw_row(mut self, fields: &[&str]) -> Self {
        self.lines.push(fields.join("\t"));
        self
    }

    /// Renders the file with a trailing newline after every line.
    #[must_use]
    pub fn contents(&self) -> String {
        self.lines.iter().map(|line| format!("{line}\n")).collect()
    }

    /// Writes the file to `dir/name` and returns the full path.
    ///
    /// # Errors
    /// Returns [`io::Error`] when the file cannot be written.
    pub fn write_to(&self, dir: &Path, name: &str) -> io::Result<PathBuf> {
        let path = dir.join(name);
        fs::write(&path, self.contents())?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case(0, 0, "doc0\t0\t0\t0.000\t-\t-")]
    #[case(8, 6, "doc0\t8\t6\t0.750\t-\t-")]
    fn document_rows_have_six_fields(
        #[case] length: i64,
        #[case] distinct_terms: i64,
        #[case] expected: &str,
    ) {
        let contents = TermRatiosFile::with_header("h")
            .document(length, distinct_terms)
            .contents();
        let row = contents.lines().nth(1).expect("row follows header");
        assert_eq!(row, expected);
        assert_eq!(row.split('\t').count(), 6);
    }

    #[test]
    fn write_to_persists_contents() -> io::Result<()> {
        let dir = TempDir::new()?;
        let file = TermRatiosFile::new().document(10, 3);
        let path = file.write_to(dir.path(), "ratios.tsv")?;
        assert_eq!(fs::read_to_string(path)?, file.contents());
        Ok(())
    }
}
