use serde::Serialize;

use crate::domain::value_objects::{Column, ColumnName, RowKey};
use crate::domain::verdict::{CellVerdict, RowClass, RowVerdict};

/// Which tables a key was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Both,
    LeftOnly,
    RightOnly,
}

/// One row of the result: key, where it was found, and its verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowEntry {
    pub key: RowKey,
    pub presence: Presence,
    pub verdict: RowVerdict,
}

impl RowEntry {
    pub fn class(&self) -> RowClass {
        self.verdict.class
    }
}

/// Per-column counters accumulated over all rows of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnStats {
    pub column: ColumnName,
    pub mismatch: usize,
    pub missing_left: usize,
    pub missing_right: usize,
    pub invalid: usize,
}

impl ColumnStats {
    pub fn new(column: ColumnName) -> Self {
        Self {
            column,
            mismatch: 0,
            missing_left: 0,
            missing_right: 0,
            invalid: 0,
        }
    }

    pub fn record(&mut self, verdict: CellVerdict) {
        match verdict {
            CellVerdict::Equal => {}
            CellVerdict::Mismatch => self.mismatch += 1,
            CellVerdict::MissingLeft => self.missing_left += 1,
            CellVerdict::MissingRight => self.missing_right += 1,
            CellVerdict::Invalid(_) => self.invalid += 1,
        }
    }

    pub fn merge(&mut self, other: &ColumnStats) {
        self.mismatch += other.mismatch;
        self.missing_left += other.missing_left;
        self.missing_right += other.missing_right;
        self.invalid += other.invalid;
    }

    /// Cells of this column that were not equal, data-quality issues excluded.
    pub fn differences(&self) -> usize {
        self.mismatch + self.missing_left + self.missing_right
    }
}

/// The complete, ordered outcome of one comparison run.
///
/// Row order is the left table's order followed by right-only rows in the
/// right table's order. The value is immutable once the engine returns it:
/// fields are only reachable through read accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffResult {
    key_column: ColumnName,
    columns: Vec<Column>,
    rows: Vec<RowEntry>,
    column_stats: Vec<ColumnStats>,
}

impl DiffResult {
    pub(crate) fn new(
        key_column: ColumnName,
        columns: Vec<Column>,
        rows: Vec<RowEntry>,
        column_stats: Vec<ColumnStats>,
    ) -> Self {
        Self {
            key_column,
            columns,
            rows,
            column_stats,
        }
    }

    pub fn key_column(&self) -> &ColumnName {
        &self.key_column
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[RowEntry] {
        &self.rows
    }

    /// Per-column counters, in compared-column order.
    pub fn column_stats(&self) -> &[ColumnStats] {
        &self.column_stats
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, key: &str) -> Option<&RowEntry> {
        self.rows.iter().find(|r| r.key.0 == key)
    }

    /// Rows whose class is anything but `NoDifference`, in result order.
    pub fn differing_rows(&self) -> impl Iterator<Item = &RowEntry> {
        self.rows.iter().filter(|r| r.class().is_difference())
    }

    pub fn matching_rows(&self) -> impl Iterator<Item = &RowEntry> {
        self.rows.iter().filter(|r| !r.class().is_difference())
    }
}
