use anyhow::Result;
use serde::Serialize;

use crate::domain::{
    diff_result::{Presence, RowEntry},
    ports::OutputWriter,
    report::ComparisonReport,
    summary::SummaryCounters,
    value_objects::{Column, ColumnName, Fingerprint, RowKey},
    verdict::{CellResult, RowClass},
};

// ─── Serialisation view types ─────────────────────────────────────────────────
//
// These mirror the domain structs but add a `differing_columns` field to each
// row. They are presentation-only: the domain types are never modified.

#[derive(Serialize)]
struct JsonReport<'a> {
    report_id: &'a str,
    created_at: &'a str,
    left: JsonSource<'a>,
    right: JsonSource<'a>,
    key_column: &'a ColumnName,
    columns: &'a [Column],
    summary: &'a SummaryCounters,
    rows: Vec<JsonRow<'a>>,
}

#[derive(Serialize)]
struct JsonSource<'a> {
    name: &'a str,
    rows: usize,
    fingerprint: &'a Fingerprint,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    key: &'a RowKey,
    presence: Presence,
    class: RowClass,
    differing_columns: Vec<&'a str>,
    cells: &'a [CellResult],
}

fn build_row(row: &RowEntry) -> JsonRow<'_> {
    JsonRow {
        key: &row.key,
        presence: row.presence,
        class: row.verdict.class,
        differing_columns: row
            .verdict
            .cells
            .iter()
            .filter(|c| !c.verdict.is_equal())
            .map(|c| c.column.as_str())
            .collect(),
        cells: &row.verdict.cells,
    }
}

// ─── Writer ───────────────────────────────────────────────────────────────────

pub struct JsonWriter;

impl OutputWriter for JsonWriter {
    fn format(&self, report: &ComparisonReport) -> Result<String> {
        let view = JsonReport {
            report_id: &report.report_id,
            created_at: &report.created_at,
            left: JsonSource {
                name: &report.left_source,
                rows: report.left_rows,
                fingerprint: &report.left_fingerprint,
            },
            right: JsonSource {
                name: &report.right_source,
                rows: report.right_rows,
                fingerprint: &report.right_fingerprint,
            },
            key_column: &report.key_column,
            columns: &report.columns,
            summary: &report.summary,
            rows: report.result.rows().iter().map(build_row).collect(),
        };

        Ok(serde_json::to_string_pretty(&view)?)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
