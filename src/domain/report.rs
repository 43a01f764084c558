use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::diff_result::DiffResult;
use crate::domain::summary::SummaryCounters;
use crate::domain::value_objects::{Column, ColumnName, Fingerprint};

/// Everything a writer needs about one run: metadata, the diff and its summary.
#[derive(Debug, Serialize, Clone)]
pub struct ComparisonReport {
    pub report_id: String,
    pub created_at: String,
    pub left_source: String,
    pub right_source: String,
    pub key_column: ColumnName,
    pub columns: Vec<Column>,
    pub left_rows: usize,
    pub right_rows: usize,
    pub left_fingerprint: Fingerprint,
    pub right_fingerprint: Fingerprint,
    pub summary: SummaryCounters,
    pub result: DiffResult,
}

/// Input side metadata, gathered before the report is assembled.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub name: String,
    pub rows: usize,
    pub fingerprint: Fingerprint,
}

impl ComparisonReport {
    pub fn new(
        left: SourceInfo,
        right: SourceInfo,
        result: DiffResult,
        summary: SummaryCounters,
    ) -> Self {
        ComparisonReport {
            report_id: format!(
                "rr_{}_{}",
                Utc::now().format("%Y%m%d_%H%M%S"),
                Uuid::new_v4().simple()
            ),
            created_at: Utc::now().to_rfc3339(),
            left_source: left.name,
            right_source: right.name,
            key_column: result.key_column().clone(),
            columns: result.columns().to_vec(),
            left_rows: left.rows,
            right_rows: right.rows,
            left_fingerprint: left.fingerprint,
            right_fingerprint: right.fingerprint,
            summary,
            result,
        }
    }

    /// True when both sources carry identical content for every compared column.
    pub fn is_clean(&self) -> bool {
        self.summary.is_clean()
    }
}
