//! Property tests checking aggregation against a straightforward model.

use std::collections::HashMap;
use std::io::Cursor;

use proptest::prelude::*;
use termratio_core::{AggregatorBuilder, OutputFormat, render_table};
use termratio_test_support::fixtures::TermRatiosFile;

#[derive(Debug, Clone)]
enum RowSpec {
    Valid { key: i64, value: i64 },
    Malformed { width: usize },
}

fn row_strategy() -> impl Strategy<Value = RowSpec> {
    prop_oneof![
        4 => (0_i64..25, 0_i64..500).prop_map(|(key, value)| RowSpec::Valid { key, value }),
        1 => (0_usize..10)
            .prop_filter("six fields is a valid row", |width| *width != 6)
            .prop_map(|width| RowSpec::Malformed { width }),
    ]
}

fn build_input(rows: &[RowSpec]) -> String {
    let mut file = TermRatiosFile::new();
    for row in rows {
        file = match row {
            RowSpec::Valid { key, value } => file.document(*key, *value),
            RowSpec::Malformed { width } => file.raw_row(&vec!["7"; *width]),
        };
    }
    file.contents()
}

/// Keys in first-seen order with their document count and value total.
fn model(rows: &[RowSpec]) -> Vec<(i64, u64, i64)> {
    let mut order = Vec::new();
    let mut totals: HashMap<i64, (u64, i64)> = HashMap::new();
    for row in rows {
        if let RowSpec::Valid { key, value } = row {
            let entry = totals.entry(*key).or_insert_with(|| {
                order.push(*key);
                (0, 0)
            });
            entry.0 += 1;
            entry.1 += value;
        }
    }
    order
        .into_iter()
        .map(|key| {
            let (documents, total) = totals[&key];
            (key, documents, total)
        })
        .collect()
}

fn summarise(input: &str) -> String {
    let aggregation = AggregatorBuilder::new()
        .build()
        .expect("default layout is valid")
        .run(Cursor::new(input.to_owned()))
        .expect("generated input is valid");
    let mut buffer = Vec::new();
    render_table(&aggregation.table, OutputFormat::Averages, &mut buffer)
        .expect("writing to a Vec cannot fail");
    String::from_utf8(buffer).expect("output is UTF-8")
}

proptest! {
    #[test]
    fn counters_match_model(rows in prop::collection::vec(row_strategy(), 0..64)) {
        let aggregation = AggregatorBuilder::new()
            .build()
            .expect("default layout is valid")
            .run(Cursor::new(build_input(&rows)))
            .expect("generated input is valid");

        let expected = model(&rows);
        let actual: Vec<(i64, u64, i64)> = aggregation
            .table
            .iter()
            .map(|(key, counters)| (key, counters.documents, counters.distinct_terms))
            .collect();
        prop_assert_eq!(actual, expected);

        let malformed = rows
            .iter()
            .filter(|row| matches!(row, RowSpec::Malformed { .. }))
            .count();
        prop_assert_eq!(aggregation.skipped.len(), malformed);
        prop_assert_eq!(aggregation.rows_read, rows.len() as u64);
    }

    #[test]
    fn averages_match_float_division(rows in prop::collection::vec(row_strategy(), 0..64)) {
        let expected: String = model(&rows)
            .into_iter()
            .map(|(key, documents, total)| {
                format!("{key}\t{:.3}\n", total as f64 / documents as f64)
            })
            .collect();
        prop_assert_eq!(summarise(&build_input(&rows)), expected);
    }

    #[test]
    fn summaries_are_deterministic(rows in prop::collection::vec(row_strategy(), 0..64)) {
        let input = build_input(&rows);
        prop_assert_eq!(summarise(&input), summarise(&input));
    }
}

#[test]
fn documented_scenario_produces_expected_summary() {
    let input = TermRatiosFile::new()
        .document(10, 3)
        .document(10, 5)
        .document(20, 2)
        .contents();
    assert_eq!(summarise(&input), "10\t4.000\n20\t2.000\n");
}

#[test]
fn short_row_does_not_disturb_later_rows() {
    let input = TermRatiosFile::new()
        .document(10, 3)
        .raw_row(&["x", "10", "100", "-", "-"])
        .document(10, 5)
        .document(20, 2)
        .contents();
    assert_eq!(summarise(&input), "10\t4.000\n20\t2.000\n");
}
