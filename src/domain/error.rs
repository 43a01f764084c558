use crate::domain::value_objects::{ColumnName, ColumnType, RowKey, Side};

/// Fatal preconditions of a comparison run.
///
/// Both kinds abort the run before any row is classified, so a caller gets
/// either a complete `DiffResult` or exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    #[error("schema mismatch: {0}")]
    SchemaMismatch(#[from] SchemaMismatch),
    #[error("duplicate key '{key}' in {side} table")]
    DuplicateKey { side: Side, key: RowKey },
}

/// Why the two tables cannot be compared column for column.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaMismatch {
    #[error("no columns to compare")]
    NoComparedColumns,
    #[error("column '{column}' is listed more than once")]
    DuplicateColumn { column: ColumnName },
    #[error("{side} table is keyed by '{found}', expected '{expected}'")]
    KeyColumn {
        side: Side,
        expected: ColumnName,
        found: ColumnName,
    },
    #[error("{side} table has no column '{column}'")]
    MissingColumn { side: Side, column: ColumnName },
    #[error("column '{column}' is {found} in {side} table, expected {expected}")]
    ColumnType {
        side: Side,
        column: ColumnName,
        expected: ColumnType,
        found: ColumnType,
    },
}
