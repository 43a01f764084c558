use crate::domain::{ports::OutputWriter, report::ComparisonReport};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use self::{
    csv_writer::{ColumnSummaryWriter, ComparisonCsvWriter, RowScope, SummaryCsvWriter},
    json::JsonWriter,
};

pub mod csv_writer;
pub mod json;

/// Register available writers - OCP: add new ones without touching main.rs
pub fn all_writers() -> Vec<Box<dyn OutputWriter>> {
    vec![
        Box::new(JsonWriter),
        Box::new(ComparisonCsvWriter::new(RowScope::All)),
        Box::new(ComparisonCsvWriter::new(RowScope::Differences)),
        Box::new(ComparisonCsvWriter::new(RowScope::Matches)),
        Box::new(ColumnSummaryWriter),
        Box::new(SummaryCsvWriter),
    ]
}

pub fn writer_for(format: &str) -> Option<Box<dyn OutputWriter>> {
    match format {
        "json" => Some(Box::new(JsonWriter)),
        "csv" | "comparison" => Some(Box::new(ComparisonCsvWriter::new(RowScope::All))),
        "differences" => Some(Box::new(ComparisonCsvWriter::new(RowScope::Differences))),
        "matches" => Some(Box::new(ComparisonCsvWriter::new(RowScope::Matches))),
        "columns" => Some(Box::new(ColumnSummaryWriter)),
        "summary" => Some(Box::new(SummaryCsvWriter)),
        _ => None,
    }
}

/// Writes the report to disk via the chosen writer and returns the file path.
pub fn write_to_file(
    writer: &dyn OutputWriter,
    report: &ComparisonReport,
    dir: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let content = writer.format(report)?;
    let path = dir.join(format!("{}.{}", report.report_id, writer.extension()));
    fs::write(&path, &content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
