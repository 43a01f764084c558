use anyhow::Result;
use std::sync::Arc;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// ─── Log level ────────────────────────────────────────────────────────────────

/// Controls the verbosity of tabrecon's internal tracing output.
///
/// Pass to [`init_tracing`] before calling any entry point.
///
/// | Variant | `tracing` level | When to use                              |
/// |---------|-----------------|------------------------------------------|
/// | `Error` | `error`         | `--quiet` / CI scripting                 |
/// | `Info`  | `info`          | Default: shows load and diff timings     |
/// | `Debug` | `debug`         | `--verbose`: shows chunking and parsing  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    #[default]
    Info,
    Debug,
}

/// Initialise the global `tracing` subscriber for tabrecon.
///
/// This is a convenience wrapper around `tracing_subscriber`. It respects
/// `RUST_LOG` when set, falling back to `level` otherwise.
///
/// Call this **once** at application startup. Library consumers who manage
/// their own subscriber should skip this and configure tracing themselves.
///
/// Only available when the `cli` feature is enabled (pulls in
/// `tracing-subscriber`).
#[cfg(feature = "cli")]
pub fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;

    let default_filter = match level {
        LogLevel::Error => "tabrecon=error",
        LogLevel::Info => "tabrecon=info",
        LogLevel::Debug => "tabrecon=debug",
    };

    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

// ─── Public API Facade ───

pub use application::classify::classify;
pub use application::compare::compare;
pub use application::diff::{diff, EngineOptions, ReconService, TableDiffer};
pub use application::monitoring::PerfReport;
pub use application::summary::summarize;
pub use domain::diff_result::{ColumnStats, DiffResult, Presence, RowEntry};
pub use domain::error::{DiffError, SchemaMismatch};
pub use domain::fingerprint::fingerprint;
pub use domain::ports::{Differ, OutputWriter, TableSource};
pub use domain::report::ComparisonReport;
pub use domain::summary::{MissingCountPolicy, SummaryCounters};
pub use domain::table::{CellValue, RowMap, RowPair, Table, TableRow, TableSchema};
pub use domain::value_objects::{Column, ColumnName, ColumnType, Fingerprint, RowKey, Side};
pub use domain::verdict::{CellResult, CellVerdict, RowClass, RowVerdict};
pub use infrastructure::config::{
    AppConfig, CompareConfig, EngineConfig, LoaderConfig, OutputConfig, SourceConfig,
};
pub use infrastructure::csv_source::CsvTableSource;

use crate::application::monitoring::{MonitoringDiffer, MonitoringTableSource};

// ─── Public entry points ───

/// Load both configured sources, compare them and summarise the result.
///
/// Use [`run_with_timing`] if you also want a performance report, or
/// [`compare_tables`] when the tables are already in memory.
pub fn run(cfg: &AppConfig) -> Result<ComparisonReport> {
    let (report, _) = run_with_timing(cfg)?;
    Ok(report)
}

/// Same as [`run`], plus a [`PerfReport`] with per-source load and diff timings.
pub fn run_with_timing(cfg: &AppConfig) -> Result<(ComparisonReport, PerfReport)> {
    let perf = PerfReport::new();

    let left = monitored_source(&cfg.left, &cfg.loader, Arc::clone(&perf));
    let right = monitored_source(&cfg.right, &cfg.loader, Arc::clone(&perf));
    let differ = Arc::new(MonitoringDiffer::new(
        Arc::new(TableDiffer::with_options(cfg.engine.options())),
        Arc::clone(&perf),
    ));

    let service = ReconService::new(left, right, differ);
    let report = service.run(
        &cfg.compare.key_column(),
        &cfg.compare.columns,
        cfg.compare.missing_count_policy,
    )?;

    Ok((report, PerfReport::snapshot(&perf)))
}

/// Compare two in-memory tables and summarise the result in one call.
pub fn compare_tables(
    left: &Table,
    right: &Table,
    key_column: &ColumnName,
    columns: &[Column],
    policy: MissingCountPolicy,
) -> std::result::Result<(DiffResult, SummaryCounters), DiffError> {
    let result = diff(left, right, key_column, columns)?;
    let summary = summarize(&result, policy);
    Ok((result, summary))
}

// ─── Private helpers ───────────────────────────────────────────────────────────

/// Build a CSV source and wrap it in the monitoring decorator.
///
/// The shared `report` accumulates timings from both sides of the run.
fn monitored_source(
    cfg: &SourceConfig,
    loader: &LoaderConfig,
    report: Arc<std::sync::Mutex<PerfReport>>,
) -> Arc<dyn TableSource> {
    let source = Arc::new(CsvTableSource::from_config(cfg, loader));
    Arc::new(MonitoringTableSource::new(source, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &std::path::Path, name: &str, content: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn run_end_to_end_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let left = write(
            dir.path(),
            "left.csv",
            "Ticker,Maturity Date,Coupon Rate,Credit Rating\n\
             A,2030-01-01,4.5,AA\n\
             B,2031-05-20,3.25,A\n\
             C,2029-12-31,5,BBB\n",
        );
        let right = write(
            dir.path(),
            "right.csv",
            "Ticker,Maturity Date,Coupon Rate,Credit Rating\n\
             B,2031-05-20,3.25,A\n\
             C,2029-12-31,5.0,BB\n\
             D,2035-07-01,,AAA\n",
        );

        let cfg = AppConfig::from_toml(&format!(
            r#"
            [left]
            path = {left:?}
            [right]
            path = {right:?}
            [compare]
            key = "Ticker"
            columns = [
                {{ name = "Maturity Date", type = "date" }},
                {{ name = "Coupon Rate", type = "numeric" }},
                {{ name = "Credit Rating", type = "categorical" }},
            ]
            [output]
            dir = "unused"
            "#
        ))
        .unwrap();

        let (report, perf) = run_with_timing(&cfg).unwrap();

        let keys: Vec<&str> = report.result.rows().iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["A", "B", "C", "D"]);
        assert_eq!(report.left_source, "left");
        assert_eq!(report.summary.no_diff_count, 1);
        assert_eq!(report.summary.data_diff_count, 1);
        assert_eq!(report.summary.only_left_count, 1);
        assert_eq!(report.summary.only_right_count, 1);
        assert_eq!(perf.timings.len(), 3);
    }

    #[test]
    fn compare_tables_rejects_duplicate_keys() {
        let schema = TableSchema::new("Ticker", vec![Column::numeric("Price")]);
        let row = TableRow::new("A").with("Price", CellValue::Int(1));
        let left = Table::new("l", schema.clone()).with_rows(vec![row.clone(), row.clone()]);
        let right = Table::new("r", schema).with_rows(vec![row]);
        let err = compare_tables(
            &left,
            &right,
            &ColumnName("Ticker".into()),
            &[Column::numeric("Price")],
            MissingCountPolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DiffError::DuplicateKey { side: Side::Left, .. }));
    }
}
