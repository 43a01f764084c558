use crate::domain::diff_result::DiffResult;
use crate::domain::summary::{MissingCountPolicy, SummaryCounters};
use crate::domain::verdict::RowClass;

/// Reduce a `DiffResult` to its headline counters.
///
/// `only_left_count` inspects MISSING_RIGHT cells and `only_right_count`
/// MISSING_LEFT cells: a row counts as "only left" when the left side holds
/// data the right side lacks. A row missing values on both sides is counted
/// in both. `policy` decides whether mismatched rows are inspected too.
///
/// Pure: the same result always yields the same counters.
pub fn summarize(result: &DiffResult, policy: MissingCountPolicy) -> SummaryCounters {
    let mut counters = SummaryCounters {
        total_rows: result.len(),
        no_diff_count: 0,
        data_diff_count: 0,
        only_left_count: 0,
        only_right_count: 0,
        data_quality_rows: 0,
        invalid_cells: 0,
        policy,
        columns: result.column_stats().to_vec(),
    };

    for row in result.rows() {
        let verdict = &row.verdict;

        match verdict.class {
            RowClass::NoDifference => counters.no_diff_count += 1,
            RowClass::HasMismatch => counters.data_diff_count += 1,
            RowClass::OnlyLeftMissing
            | RowClass::OnlyRightMissing
            | RowClass::MissingBothSides
            | RowClass::DataQuality => {}
        }

        let inspected = match policy {
            MissingCountPolicy::ExcludeMismatched => {
                verdict.class.is_difference() && verdict.class != RowClass::HasMismatch
            }
            MissingCountPolicy::AllDiffering => verdict.class.is_difference(),
        };
        if inspected {
            if verdict.has_missing_right() {
                counters.only_left_count += 1;
            }
            if verdict.has_missing_left() {
                counters.only_right_count += 1;
            }
        }

        let invalid = verdict.cells.iter().filter(|c| c.verdict.is_invalid()).count();
        if invalid > 0 {
            counters.data_quality_rows += 1;
            counters.invalid_cells += invalid;
        }
    }

    counters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::diff::diff;
    use crate::domain::table::{CellValue, Table, TableRow, TableSchema};
    use crate::domain::value_objects::{Column, ColumnName};

    fn columns() -> Vec<Column> {
        vec![
            Column::numeric("Coupon Rate (%)"),
            Column::numeric("Price"),
            Column::categorical("Credit Rating"),
        ]
    }

    fn bond(ticker: &str, coupon: f64, price: f64, rating: &str) -> TableRow {
        TableRow::new(ticker)
            .with("Coupon Rate (%)", CellValue::Float(coupon))
            .with("Price", CellValue::Float(price))
            .with("Credit Rating", CellValue::Text(rating.into()))
    }

    fn run(left: Vec<TableRow>, right: Vec<TableRow>) -> DiffResult {
        let schema = TableSchema::new("Ticker", columns());
        let l = Table::new("left", schema.clone()).with_rows(left);
        let r = Table::new("right", schema).with_rows(right);
        diff(&l, &r, &ColumnName("Ticker".into()), &columns()).unwrap()
    }

    #[test]
    fn missing_right_counts_as_only_left() {
        let result = run(
            vec![bond("T1", 4.5, 100.0, "AA"), bond("T2", 3.0, 99.0, "A")],
            vec![
                bond("T1", 4.5, 100.0, "AA").without("Coupon Rate (%)"),
                bond("T2", 3.0, 99.0, "A"),
            ],
        );
        let s = summarize(&result, MissingCountPolicy::default());
        assert_eq!(s.only_left_count, 1);
        assert_eq!(s.only_right_count, 0);
        assert_eq!(s.no_diff_count, 1);
        assert_eq!(s.data_diff_count, 0);
    }

    #[test]
    fn mismatched_row_with_missing_cell_is_data_diff_only() {
        let result = run(
            vec![bond("T1", 4.5, 100.0, "AA")],
            vec![bond("T1", 4.5, 101.0, "AA").without("Credit Rating")],
        );
        let strict = summarize(&result, MissingCountPolicy::ExcludeMismatched);
        assert_eq!(strict.data_diff_count, 1);
        assert_eq!(strict.only_left_count, 0);
        assert_eq!(strict.only_right_count, 0);

        let overlapping = summarize(&result, MissingCountPolicy::AllDiffering);
        assert_eq!(overlapping.data_diff_count, 1);
        assert_eq!(overlapping.only_left_count, 1);
    }

    #[test]
    fn row_missing_both_sides_counts_twice() {
        let result = run(
            vec![bond("T1", 4.5, 100.0, "AA").without("Price")],
            vec![bond("T1", 4.5, 100.0, "AA").without("Credit Rating")],
        );
        let s = summarize(&result, MissingCountPolicy::default());
        assert_eq!(s.only_left_count, 1);
        assert_eq!(s.only_right_count, 1);
        assert_eq!(s.differing_rows(), 1);
    }

    #[test]
    fn one_sided_rows_scenario() {
        let result = run(
            vec![
                bond("A", 1.0, 100.0, "AA"),
                bond("B", 2.0, 100.0, "AA"),
                bond("C", 3.0, 100.0, "AA"),
            ],
            vec![
                bond("B", 2.0, 100.0, "AA"),
                bond("C", 3.0, 100.0, "AA"),
                bond("D", 4.0, 100.0, "AA"),
            ],
        );
        let s = summarize(&result, MissingCountPolicy::default());
        assert_eq!(s.total_rows, 4);
        assert_eq!(s.no_diff_count, 2);
        assert_eq!(s.only_left_count, 1);
        assert_eq!(s.only_right_count, 1);
        assert_eq!(s.columns[0].missing_right, 1);
        assert_eq!(s.columns[0].missing_left, 1);
    }

    #[test]
    fn invalid_cells_are_a_separate_count() {
        let result = run(
            vec![bond("T1", 4.5, 100.0, "AA").with("Price", CellValue::Text("N.A.".into()))],
            vec![bond("T1", 4.5, 100.0, "AA")],
        );
        let s = summarize(&result, MissingCountPolicy::default());
        assert_eq!(s.data_quality_rows, 1);
        assert_eq!(s.invalid_cells, 1);
        assert_eq!(s.data_diff_count, 0);
        assert_eq!(s.columns[1].invalid, 1);
        assert_eq!(s.columns[1].mismatch, 0);
        assert_eq!(s.no_diff_count, 0);
        assert_eq!(s.differing_rows(), 1);
        assert!(!s.is_clean());
        assert_eq!(result.matching_rows().count(), 0);
    }

    #[test]
    fn unreadable_left_against_absent_right_counts_as_only_left() {
        let result = run(
            vec![bond("T1", 4.5, 100.0, "AA").with("Price", CellValue::Text("#REF!".into()))],
            vec![bond("T1", 4.5, 100.0, "AA").without("Price")],
        );
        assert_eq!(result.row("T1").unwrap().class(), RowClass::OnlyRightMissing);

        let s = summarize(&result, MissingCountPolicy::default());
        assert_eq!(s.no_diff_count, 0);
        assert_eq!(s.only_left_count, 1);
        assert_eq!(s.only_right_count, 0);
        assert_eq!(s.data_quality_rows, 1);
        assert_eq!(s.invalid_cells, 1);
    }

    #[test]
    fn summarize_is_idempotent() {
        let result = run(
            vec![bond("T1", 4.5, 100.0, "AA"), bond("T2", 1.0, 1.0, "B")],
            vec![bond("T1", 4.0, 100.0, "AA"), bond("T3", 1.0, 1.0, "B")],
        );
        let first = summarize(&result, MissingCountPolicy::default());
        let second = summarize(&result, MissingCountPolicy::default());
        assert_eq!(first, second);
    }
}
