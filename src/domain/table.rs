use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::value_objects::{Column, ColumnName, ColumnType, RowKey};

/// A single stored cell value.
///
/// Values are kept as the loader produced them; interpreting a value as its
/// column's declared type happens in the cell comparator, so a value that
/// does not fit its column surfaces as a data-quality verdict instead of
/// being coerced away at load time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(x) => write!(f, "{x}"),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<NaiveDate> for CellValue {
    fn from(v: NaiveDate) -> Self {
        CellValue::Date(v)
    }
}

/// Cells of one row keyed by column name. A column with no entry is absent/null.
pub type RowMap = BTreeMap<String, CellValue>;

/// One record of a table: its key plus the non-null cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub key: RowKey,
    pub values: RowMap,
}

impl TableRow {
    pub fn new(key: impl Into<RowKey>) -> Self {
        Self {
            key: key.into(),
            values: RowMap::new(),
        }
    }

    /// Builder-style setter.
    pub fn with(mut self, column: &str, value: CellValue) -> Self {
        self.values.insert(column.to_string(), value);
        self
    }

    /// Builder-style removal, leaving the cell absent.
    pub fn without(mut self, column: &str) -> Self {
        self.values.remove(column);
        self
    }

    pub fn get(&self, column: &ColumnName) -> Option<&CellValue> {
        self.values.get(&column.0)
    }
}

/// Declared shape of a table: the key column and the typed data columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSchema {
    pub key: ColumnName,
    pub columns: Vec<Column>,
}

impl TableSchema {
    pub fn new(key: &str, columns: Vec<Column>) -> Self {
        Self {
            key: ColumnName(key.to_string()),
            columns,
        }
    }

    pub fn column_type(&self, name: &ColumnName) -> Option<ColumnType> {
        self.columns.iter().find(|c| &c.name == name).map(|c| c.ty)
    }
}

/// A loaded dataset, rows kept in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    /// Display name of the source (file stem, feed name…).
    pub name: String,
    pub schema: TableSchema,
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn new(name: &str, schema: TableSchema) -> Self {
        Self {
            name: name.to_string(),
            schema,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(mut self, rows: Vec<TableRow>) -> Self {
        self.rows = rows;
        self
    }

    pub fn push(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Left and right rows sharing one key; either side may be absent.
#[derive(Debug, Clone, Copy)]
pub struct RowPair<'a> {
    pub key: &'a RowKey,
    pub left: Option<&'a TableRow>,
    pub right: Option<&'a TableRow>,
}
