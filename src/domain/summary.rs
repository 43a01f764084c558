use serde::{Deserialize, Serialize};

use crate::domain::diff_result::ColumnStats;

/// Which differing rows the `only_left` / `only_right` counters inspect.
///
/// The two counters overlap with each other by definition (a row can miss
/// values on both sides). Whether they also overlap with the mismatch
/// bucket is a reporting choice, kept explicit here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingCountPolicy {
    /// Rows classified `HasMismatch` are never counted as missing-data rows.
    #[default]
    ExcludeMismatched,
    /// Every differing row is inspected, mismatched ones included.
    AllDiffering,
}

/// Headline numbers of a comparison run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCounters {
    pub total_rows: usize,
    pub no_diff_count: usize,
    pub data_diff_count: usize,
    /// Differing rows where the right side lacks a value the left side has.
    pub only_left_count: usize,
    /// Differing rows where the left side lacks a value the right side has.
    pub only_right_count: usize,
    /// Rows with at least one cell that failed type coercion.
    pub data_quality_rows: usize,
    pub invalid_cells: usize,
    pub policy: MissingCountPolicy,
    pub columns: Vec<ColumnStats>,
}

impl SummaryCounters {
    pub fn differing_rows(&self) -> usize {
        self.total_rows - self.no_diff_count
    }

    /// The four headline lines shown to users, in display order.
    pub fn headline(&self) -> [(&'static str, usize); 4] {
        [
            ("Rows with no differences", self.no_diff_count),
            ("Rows with data differences", self.data_diff_count),
            ("Rows with only data in left source", self.only_left_count),
            ("Rows with only data in right source", self.only_right_count),
        ]
    }

    pub fn is_clean(&self) -> bool {
        self.no_diff_count == self.total_rows && self.invalid_cells == 0
    }
}
