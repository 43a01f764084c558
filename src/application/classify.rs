use crate::application::compare::{compare, is_absent};
use crate::domain::diff_result::Presence;
use crate::domain::table::RowPair;
use crate::domain::value_objects::{Column, Side};
use crate::domain::verdict::{CellResult, CellVerdict, RowClass, RowVerdict};

/// Classify one row pair over `columns`, in the given order.
///
/// A mismatch anywhere dominates missing cells elsewhere in the row, and
/// missing cells dominate unreadable ones. A row whose only problem is an
/// unreadable value is `DataQuality`, never `NoDifference`. An unreadable
/// value facing an absent one still counts as missing on the absent side.
///
/// When the key exists on one side only, every cell is reported missing on
/// the other side regardless of the values present.
pub fn classify(pair: &RowPair<'_>, columns: &[Column]) -> RowVerdict {
    let presence = presence_of(pair);

    let mut any_mismatch = false;
    let mut any_missing_left = false;
    let mut any_missing_right = false;
    let mut any_invalid = false;

    let cells: Vec<CellResult> = columns
        .iter()
        .map(|col| {
            let left = pair.left.and_then(|r| r.get(&col.name));
            let right = pair.right.and_then(|r| r.get(&col.name));

            let verdict = match presence {
                Presence::LeftOnly => CellVerdict::MissingRight,
                Presence::RightOnly => CellVerdict::MissingLeft,
                Presence::Both => compare(left, right, col.ty),
            };

            match verdict {
                CellVerdict::Mismatch => any_mismatch = true,
                CellVerdict::MissingLeft => any_missing_left = true,
                CellVerdict::MissingRight => any_missing_right = true,
                CellVerdict::Invalid(side) => {
                    any_invalid = true;
                    match side {
                        Side::Left if is_absent(right, col.ty) => any_missing_right = true,
                        Side::Right if is_absent(left, col.ty) => any_missing_left = true,
                        _ => {}
                    }
                }
                CellVerdict::Equal => {}
            }

            CellResult {
                column: col.name.clone(),
                verdict,
                left: left.cloned(),
                right: right.cloned(),
            }
        })
        .collect();

    let class = match (any_mismatch, any_missing_left, any_missing_right) {
        (true, _, _) => RowClass::HasMismatch,
        (false, true, true) => RowClass::MissingBothSides,
        (false, true, false) => RowClass::OnlyLeftMissing,
        (false, false, true) => RowClass::OnlyRightMissing,
        (false, false, false) if any_invalid => RowClass::DataQuality,
        (false, false, false) => RowClass::NoDifference,
    };

    RowVerdict {
        class,
        missing_left: any_missing_left,
        missing_right: any_missing_right,
        cells,
    }
}

pub fn presence_of(pair: &RowPair<'_>) -> Presence {
    match (pair.left.is_some(), pair.right.is_some()) {
        (true, false) => Presence::LeftOnly,
        (false, true) => Presence::RightOnly,
        _ => Presence::Both,
    }
}
