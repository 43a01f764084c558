use anyhow::{Context, Result};

use crate::domain::{
    diff_result::RowEntry, ports::OutputWriter, report::ComparisonReport, table::CellValue,
    verdict::RowClass,
};

/// Which rows a side-by-side CSV contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowScope {
    All,
    Differences,
    Matches,
}

/// Side-by-side comparison: the key, then `<col> (Left)` / `<col> (Right)`
/// pairs, then the row status and the columns that differ.
pub struct ComparisonCsvWriter {
    scope: RowScope,
}

impl ComparisonCsvWriter {
    pub fn new(scope: RowScope) -> Self {
        Self { scope }
    }

    fn includes(&self, row: &RowEntry) -> bool {
        match self.scope {
            RowScope::All => true,
            RowScope::Differences => row.class().is_difference(),
            RowScope::Matches => !row.class().is_difference(),
        }
    }
}

fn cell_text(value: Option<&CellValue>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn into_string(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

impl OutputWriter for ComparisonCsvWriter {
    fn format(&self, report: &ComparisonReport) -> Result<String> {
        let mut out = csv::Writer::from_writer(Vec::new());

        let mut header = vec![report.key_column.0.clone()];
        for col in &report.columns {
            header.push(format!("{} (Left)", col.name));
            header.push(format!("{} (Right)", col.name));
        }
        header.push("Status".to_string());
        header.push("Differing Columns".to_string());
        out.write_record(&header)?;

        for row in report.result.rows().iter().filter(|r| self.includes(r)) {
            let mut record = vec![row.key.0.clone()];
            for cell in &row.verdict.cells {
                record.push(cell_text(cell.left.as_ref()));
                record.push(cell_text(cell.right.as_ref()));
            }
            record.push(row.class().label().to_string());
            record.push(
                row.verdict
                    .cells
                    .iter()
                    .filter(|c| !c.verdict.is_equal())
                    .map(|c| c.column.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            );
            out.write_record(&record)?;
        }

        into_string(out)
    }

    fn extension(&self) -> &'static str {
        match self.scope {
            RowScope::All => "comparison.csv",
            RowScope::Differences => "differences.csv",
            RowScope::Matches => "matches.csv",
        }
    }
}

/// One line per compared column with its mismatch and missing counts.
pub struct ColumnSummaryWriter;

impl OutputWriter for ColumnSummaryWriter {
    fn format(&self, report: &ComparisonReport) -> Result<String> {
        let mut out = csv::Writer::from_writer(Vec::new());
        out.write_record([
            "Column",
            "Type",
            "Mismatch Count",
            "Missing Left",
            "Missing Right",
            "Invalid",
        ])?;

        for (col, stats) in report.columns.iter().zip(&report.summary.columns) {
            out.write_record([
                col.name.0.clone(),
                col.ty.to_string(),
                stats.mismatch.to_string(),
                stats.missing_left.to_string(),
                stats.missing_right.to_string(),
                stats.invalid.to_string(),
            ])?;
        }

        into_string(out)
    }

    fn extension(&self) -> &'static str {
        "columns.csv"
    }
}

/// Headline counts as `Description,Count,Status`. `Status` names the row
/// status carrying each kind of difference in `comparison.csv`.
pub struct SummaryCsvWriter;

impl OutputWriter for SummaryCsvWriter {
    fn format(&self, report: &ComparisonReport) -> Result<String> {
        let s = &report.summary;
        let mut out = csv::Writer::from_writer(Vec::new());
        out.write_record(["Description", "Count", "Status"])?;

        let statuses = [
            RowClass::NoDifference.label(),
            RowClass::HasMismatch.label(),
            RowClass::OnlyRightMissing.label(),
            RowClass::OnlyLeftMissing.label(),
        ];
        for ((description, count), status) in s.headline().into_iter().zip(statuses) {
            out.write_record([description, count.to_string().as_str(), status])?;
        }
        out.write_record([
            "Rows with unreadable values",
            s.data_quality_rows.to_string().as_str(),
            RowClass::DataQuality.label(),
        ])?;
        out.write_record(["Total rows", s.total_rows.to_string().as_str(), ""])?;

        into_string(out)
    }

    fn extension(&self) -> &'static str {
        "summary.csv"
    }
}
