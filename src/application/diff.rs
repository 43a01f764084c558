use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::classify::{classify, presence_of};
use crate::application::summary::summarize;
use crate::domain::{
    diff_result::{ColumnStats, DiffResult, RowEntry},
    error::{DiffError, SchemaMismatch},
    fingerprint::fingerprint,
    ports::{Differ, TableSource},
    report::{ComparisonReport, SourceInfo},
    summary::MissingCountPolicy,
    table::{RowPair, Table, TableRow},
    value_objects::{Column, ColumnName, RowKey, Side},
};

// ─── Recon Service ───

pub struct ReconService {
    left_source: Arc<dyn TableSource>,
    right_source: Arc<dyn TableSource>,
    differ: Arc<dyn Differ>,
}

impl ReconService {
    pub fn new(
        left_source: Arc<dyn TableSource>,
        right_source: Arc<dyn TableSource>,
        differ: Arc<dyn Differ>,
    ) -> Self {
        Self {
            left_source,
            right_source,
            differ,
        }
    }

    /// Load both sides concurrently, compare them and assemble the report.
    pub fn run(
        &self,
        key_column: &ColumnName,
        columns: &[Column],
        policy: MissingCountPolicy,
    ) -> Result<ComparisonReport> {
        let (left, right) = rayon::join(
            || self.left_source.load(key_column, columns),
            || self.right_source.load(key_column, columns),
        );
        let left = left.with_context(|| format!("Failed to load {}", self.left_source.name()))?;
        let right =
            right.with_context(|| format!("Failed to load {}", self.right_source.name()))?;

        let result = self
            .differ
            .diff_tables(&left, &right, key_column, columns)
            .with_context(|| format!("Cannot compare {} with {}", left.name, right.name))?;
        let summary = summarize(&result, policy);

        info!(
            left = %left.name,
            right = %right.name,
            rows = summary.total_rows,
            no_diff = summary.no_diff_count,
            data_diff = summary.data_diff_count,
            "comparison finished"
        );

        Ok(ComparisonReport::new(
            source_info(&left)?,
            source_info(&right)?,
            result,
            summary,
        ))
    }
}

fn source_info(table: &Table) -> Result<SourceInfo> {
    Ok(SourceInfo {
        name: table.name.clone(),
        rows: table.len(),
        fingerprint: fingerprint(table)
            .with_context(|| format!("Failed to fingerprint {}", table.name))?,
    })
}

// ─── Table Differ (implementation of the port) ───

/// Tuning knobs of the diff engine. Results do not depend on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Classify row chunks on the rayon pool.
    pub parallel: bool,
    /// Rows per chunk; tables no larger than one chunk run sequentially.
    pub chunk_size: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            chunk_size: 1024,
        }
    }
}

#[derive(Default)]
pub struct TableDiffer {
    options: EngineOptions,
}

impl TableDiffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self { options }
    }
}

impl Differ for TableDiffer {
    fn diff_tables(
        &self,
        left: &Table,
        right: &Table,
        key_column: &ColumnName,
        columns: &[Column],
    ) -> Result<DiffResult, DiffError> {
        check_schemas(left, right, key_column, columns)?;

        let left_index = index_rows(left, Side::Left)?;
        let right_index = index_rows(right, Side::Right)?;

        let pairs = align(left, right, &left_index, &right_index);
        let chunk_size = self.options.chunk_size.max(1);

        let partials: Vec<Partial> = if self.options.parallel && pairs.len() > chunk_size {
            debug!(rows = pairs.len(), chunk_size, "classifying rows in parallel");
            pairs
                .par_chunks(chunk_size)
                .map(|chunk| classify_chunk(chunk, columns))
                .collect()
        } else {
            vec![classify_chunk(&pairs, columns)]
        };

        let mut rows = Vec::with_capacity(pairs.len());
        let mut stats = empty_stats(columns);
        for partial in partials {
            rows.extend(partial.rows);
            for (total, part) in stats.iter_mut().zip(&partial.stats) {
                total.merge(part);
            }
        }

        Ok(DiffResult::new(
            key_column.clone(),
            columns.to_vec(),
            rows,
            stats,
        ))
    }
}

/// Compare two tables with the default engine options.
pub fn diff(
    left: &Table,
    right: &Table,
    key_column: &ColumnName,
    columns: &[Column],
) -> Result<DiffResult, DiffError> {
    TableDiffer::new().diff_tables(left, right, key_column, columns)
}

// ─── Preconditions ───

fn check_schemas(
    left: &Table,
    right: &Table,
    key_column: &ColumnName,
    columns: &[Column],
) -> Result<(), SchemaMismatch> {
    if columns.is_empty() {
        return Err(SchemaMismatch::NoComparedColumns);
    }

    let mut seen = BTreeSet::new();
    for col in columns {
        if !seen.insert(&col.name) {
            return Err(SchemaMismatch::DuplicateColumn {
                column: col.name.clone(),
            });
        }
    }

    for (side, table) in [(Side::Left, left), (Side::Right, right)] {
        if &table.schema.key != key_column {
            return Err(SchemaMismatch::KeyColumn {
                side,
                expected: key_column.clone(),
                found: table.schema.key.clone(),
            });
        }

        for col in columns {
            match table.schema.column_type(&col.name) {
                None => {
                    return Err(SchemaMismatch::MissingColumn {
                        side,
                        column: col.name.clone(),
                    })
                }
                Some(found) if found != col.ty => {
                    return Err(SchemaMismatch::ColumnType {
                        side,
                        column: col.name.clone(),
                        expected: col.ty,
                        found,
                    })
                }
                Some(_) => {}
            }
        }
    }

    Ok(())
}

fn index_rows(table: &Table, side: Side) -> Result<BTreeMap<&RowKey, &TableRow>, DiffError> {
    let mut index = BTreeMap::new();
    for row in &table.rows {
        if index.insert(&row.key, row).is_some() {
            return Err(DiffError::DuplicateKey {
                side,
                key: row.key.clone(),
            });
        }
    }
    Ok(index)
}

// ─── Row alignment & classification ───

/// Left rows in left order, then right-only rows in right order.
fn align<'a>(
    left: &'a Table,
    right: &'a Table,
    left_index: &BTreeMap<&'a RowKey, &'a TableRow>,
    right_index: &BTreeMap<&'a RowKey, &'a TableRow>,
) -> Vec<RowPair<'a>> {
    let mut pairs: Vec<RowPair<'a>> = left
        .rows
        .iter()
        .map(|row| RowPair {
            key: &row.key,
            left: Some(row),
            right: right_index.get(&row.key).copied(),
        })
        .collect();

    pairs.extend(
        right
            .rows
            .iter()
            .filter(|row| !left_index.contains_key(&row.key))
            .map(|row| RowPair {
                key: &row.key,
                left: None,
                right: Some(row),
            }),
    );

    pairs
}

/// Result of classifying one contiguous run of row pairs. Owned by the
/// worker that produced it until the final merge.
struct Partial {
    rows: Vec<RowEntry>,
    stats: Vec<ColumnStats>,
}

fn empty_stats(columns: &[Column]) -> Vec<ColumnStats> {
    columns
        .iter()
        .map(|c| ColumnStats::new(c.name.clone()))
        .collect()
}

fn classify_chunk(pairs: &[RowPair<'_>], columns: &[Column]) -> Partial {
    let mut stats = empty_stats(columns);
    let rows = pairs
        .iter()
        .map(|pair| {
            let verdict = classify(pair, columns);
            for (stat, cell) in stats.iter_mut().zip(&verdict.cells) {
                stat.record(cell.verdict);
            }
            RowEntry {
                key: pair.key.clone(),
                presence: presence_of(pair),
                verdict,
            }
        })
        .collect();
    Partial { rows, stats }
}
