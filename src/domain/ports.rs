use crate::domain::{
    diff_result::DiffResult,
    error::DiffError,
    report::ComparisonReport,
    table::Table,
    value_objects::{Column, ColumnName},
};
use anyhow::Result;

/// Port: supplies one side of the comparison (implemented by CsvTableSource)
pub trait TableSource: Send + Sync {
    /// Load the table, tagging the `columns` it contains with their declared type.
    fn load(&self, key: &ColumnName, columns: &[Column]) -> Result<Table>;
    /// Human-readable name of the source, used in logs and reports.
    fn name(&self) -> &str;
}

/// Port: table comparison algorithm (implemented by TableDiffer)
pub trait Differ: Send + Sync {
    fn diff_tables(
        &self,
        left: &Table,
        right: &Table,
        key_column: &ColumnName,
        columns: &[Column],
    ) -> Result<DiffResult, DiffError>;
}

/// Port: output formatting (implemented by JsonWriter and the CSV writers)
pub trait OutputWriter: Send + Sync {
    /// Serializes the report to a string (JSON, CSV, etc.)
    fn format(&self, report: &ComparisonReport) -> Result<String>;
    /// Suffix of the produced file (e.g. "json", "comparison.csv")
    fn extension(&self) -> &'static str;
}
