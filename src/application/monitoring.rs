use crate::domain::ports::{Differ, TableSource};
use crate::domain::{
    diff_result::DiffResult,
    error::DiffError,
    table::Table,
    value_objects::{Column, ColumnName},
};
use anyhow::Result;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{info, instrument, warn};

// ─── PerfReport ──────────────────────────────────────────────────────────────

/// A single timed operation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OpTiming {
    /// Operation name: "load_table" or "diff_tables".
    pub operation: &'static str,
    /// Source (or `left ⇄ right` pair) this operation was performed on.
    pub target: String,
    /// Elapsed wall time in milliseconds.
    pub duration_ms: u128,
    /// Number of rows involved (loaded or compared).
    pub rows: usize,
}

/// Accumulated performance timings for a single comparison run.
///
/// Shared across all decorator instances for one run via `Arc<Mutex<_>>`.
/// After the run, pass to [`crate::presentation::cli_summary::print_perf_summary`]
/// to render a human-readable table.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct PerfReport {
    pub timings: Vec<OpTiming>,
    pub total_rows_loaded: usize,
    pub total_ms: u128,
}

impl PerfReport {
    pub fn new() -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::default()))
    }

    fn record(report: &Arc<Mutex<Self>>, timing: OpTiming) {
        if let Ok(mut r) = report.lock() {
            r.total_ms += timing.duration_ms;
            if timing.operation == "load_table" {
                r.total_rows_loaded += timing.rows;
            }
            r.timings.push(timing);
        }
    }

    /// Copy of the current state, or an empty report if the lock is poisoned.
    pub fn snapshot(report: &Arc<Mutex<Self>>) -> Self {
        report.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

// ─── MonitoringTableSource ───────────────────────────────────────────────────

/// Decorator: wraps any `TableSource`, measures wall time per `load`
/// call, and appends the result to the shared `PerfReport`.
pub struct MonitoringTableSource {
    inner: Arc<dyn TableSource>,
    report: Arc<Mutex<PerfReport>>,
}

impl MonitoringTableSource {
    pub fn new(inner: Arc<dyn TableSource>, report: Arc<Mutex<PerfReport>>) -> Self {
        Self { inner, report }
    }
}

impl TableSource for MonitoringTableSource {
    #[instrument(
        name = "load_table",
        skip(self, key, columns),
        fields(source = %self.inner.name(), key = %key),
        level = "info"
    )]
    fn load(&self, key: &ColumnName, columns: &[Column]) -> Result<Table> {
        let start = Instant::now();
        let table = self.inner.load(key, columns)?;
        let duration_ms = start.elapsed().as_millis();

        info!(source = %table.name, rows = table.len(), duration_ms, "load_table completed");

        PerfReport::record(
            &self.report,
            OpTiming {
                operation: "load_table",
                target: table.name.clone(),
                duration_ms,
                rows: table.len(),
            },
        );

        Ok(table)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

// ─── MonitoringDiffer ────────────────────────────────────────────────────────

/// Decorator: wraps any `Differ`, measures wall time per `diff_tables` call,
/// and appends the result to the shared `PerfReport`.
pub struct MonitoringDiffer {
    inner: Arc<dyn Differ>,
    report: Arc<Mutex<PerfReport>>,
}

impl MonitoringDiffer {
    pub fn new(inner: Arc<dyn Differ>, report: Arc<Mutex<PerfReport>>) -> Self {
        Self { inner, report }
    }
}

impl Differ for MonitoringDiffer {
    #[instrument(
        name = "diff_tables",
        skip(self, left, right, key_column, columns),
        fields(
            left.name = %left.name,
            left.rows = left.len(),
            right.name = %right.name,
            right.rows = right.len(),
            columns = columns.len(),
        ),
        level = "info"
    )]
    fn diff_tables(
        &self,
        left: &Table,
        right: &Table,
        key_column: &ColumnName,
        columns: &[Column],
    ) -> Result<DiffResult, DiffError> {
        let start = Instant::now();
        let result = self.inner.diff_tables(left, right, key_column, columns);
        let duration_ms = start.elapsed().as_millis();

        let result = match result {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, duration_ms, "diff_tables rejected input");
                return Err(err);
            }
        };

        let differing = result.differing_rows().count();
        info!(rows = result.len(), differing, duration_ms, "diff_tables completed");

        PerfReport::record(
            &self.report,
            OpTiming {
                operation: "diff_tables",
                target: format!("{} ⇄ {}", left.name, right.name),
                duration_ms,
                rows: result.len(),
            },
        );

        Ok(result)
    }
}
