use serde::Serialize;

use crate::domain::table::CellValue;
use crate::domain::value_objects::{ColumnName, Side};

/// Relationship between the left and right value of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "side")]
pub enum CellVerdict {
    /// Both values equal, or both absent.
    Equal,
    /// Both present, different.
    Mismatch,
    /// Absent on the left, present on the right.
    MissingLeft,
    /// Present on the left, absent on the right.
    MissingRight,
    /// The value on `Side` cannot be read as the column's declared type.
    Invalid(Side),
}

impl CellVerdict {
    pub fn is_equal(&self) -> bool {
        matches!(self, CellVerdict::Equal)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, CellVerdict::Invalid(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            CellVerdict::Equal => "equal",
            CellVerdict::Mismatch => "mismatch",
            CellVerdict::MissingLeft => "missing_left",
            CellVerdict::MissingRight => "missing_right",
            CellVerdict::Invalid(_) => "invalid",
        }
    }
}

/// Row-level classification.
/// Severity: mismatch > missing > data quality > no difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowClass {
    NoDifference,
    HasMismatch,
    /// Some cells are missing on the left, none on the right.
    OnlyLeftMissing,
    /// Some cells are missing on the right, none on the left.
    OnlyRightMissing,
    /// Cells are missing on both sides (in different columns).
    MissingBothSides,
    /// Nothing differs or is missing, but some value could not be read.
    DataQuality,
}

impl RowClass {
    pub fn is_difference(&self) -> bool {
        !matches!(self, RowClass::NoDifference)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RowClass::NoDifference => "no_difference",
            RowClass::HasMismatch => "has_mismatch",
            RowClass::OnlyLeftMissing => "only_left_missing",
            RowClass::OnlyRightMissing => "only_right_missing",
            RowClass::MissingBothSides => "missing_both_sides",
            RowClass::DataQuality => "data_quality",
        }
    }
}

/// One compared cell, with both raw values kept for renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellResult {
    pub column: ColumnName,
    pub verdict: CellVerdict,
    pub left: Option<CellValue>,
    pub right: Option<CellValue>,
}

/// Classification of one row plus every cell result that produced it,
/// in compared-column order.
///
/// `missing_left` / `missing_right` record absent values per side, including
/// an absent value facing an unreadable one, whose cell reads `Invalid`.
/// They are kept even when a mismatch decides the class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowVerdict {
    pub class: RowClass,
    pub missing_left: bool,
    pub missing_right: bool,
    pub cells: Vec<CellResult>,
}

impl RowVerdict {
    pub fn has_missing_left(&self) -> bool {
        self.missing_left
    }

    pub fn has_missing_right(&self) -> bool {
        self.missing_right
    }

    pub fn has_invalid(&self) -> bool {
        self.cells.iter().any(|c| c.verdict.is_invalid())
    }

    pub fn cell(&self, column: &str) -> Option<&CellResult> {
        self.cells.iter().find(|c| c.column.0 == column)
    }
}
