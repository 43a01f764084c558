use sha2::{Digest, Sha256};

use crate::domain::table::Table;
use crate::domain::value_objects::Fingerprint;

/// Compute a SHA-256 fingerprint of a table's row content.
///
/// Algorithm:
/// 1. Each row is serialised to a **canonical** JSON string (cells sorted by
///    column name, already guaranteed by `RowMap`).
/// 2. Rows are sorted lexicographically by their JSON representation so the
///    fingerprint is stable regardless of the order rows appear in the source.
/// 3. All row strings are joined with `\n` and hashed with SHA-256.
///
/// Two sources with the same fingerprint hold the same records, so a report
/// reader can tell "nothing changed" from "changed and changed back".
pub fn fingerprint(table: &Table) -> serde_json::Result<Fingerprint> {
    let mut row_strings = table
        .rows
        .iter()
        .map(serde_json::to_string)
        .collect::<serde_json::Result<Vec<String>>>()?;

    row_strings.sort_unstable();

    let content = row_strings.join("\n");
    let hash = Sha256::digest(content.as_bytes());
    Ok(Fingerprint(format!("{:x}", hash)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::{CellValue, TableRow, TableSchema};
    use crate::domain::value_objects::Column;

    fn table(rows: Vec<TableRow>) -> Table {
        Table::new("t", TableSchema::new("Ticker", vec![Column::numeric("Price")])).with_rows(rows)
    }

    fn row(key: &str, price: f64) -> TableRow {
        TableRow::new(key).with("Price", CellValue::Float(price))
    }

    #[test]
    fn same_rows_same_fingerprint() {
        let t = table(vec![row("A", 1.0), row("B", 2.0)]);
        assert_eq!(fingerprint(&t).unwrap(), fingerprint(&t.clone()).unwrap());
    }

    #[test]
    fn different_rows_different_fingerprint() {
        let a = table(vec![row("A", 1.0)]);
        let b = table(vec![row("A", 1.5)]);
        assert_ne!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn order_independent() {
        let a = table(vec![row("A", 1.0), row("B", 2.0)]);
        let b = table(vec![row("B", 2.0), row("A", 1.0)]);
        assert_eq!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn empty_table_is_deterministic() {
        assert_eq!(
            fingerprint(&table(vec![])).unwrap(),
            fingerprint(&table(vec![])).unwrap()
        );
    }

    #[test]
    fn nan_cells_still_fingerprint() {
        let t = table(vec![row("A", f64::NAN)]);
        assert_eq!(fingerprint(&t).unwrap(), fingerprint(&t).unwrap());
        assert_ne!(
            fingerprint(&t).unwrap(),
            fingerprint(&table(vec![row("A", 1.0)])).unwrap()
        );
    }
}
