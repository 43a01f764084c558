use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::domain::ports::TableSource;
use crate::domain::table::{CellValue, Table, TableRow, TableSchema};
use crate::domain::value_objects::{Column, ColumnName, ColumnType};
use crate::infrastructure::config::{LoaderConfig, SourceConfig};

/// Reads one side of the comparison from a CSV file with a header row.
pub struct CsvTableSource {
    name: String,
    path: PathBuf,
    options: LoaderConfig,
}

impl CsvTableSource {
    pub fn new(name: &str, path: impl Into<PathBuf>, options: LoaderConfig) -> Self {
        Self {
            name: name.to_string(),
            path: path.into(),
            options,
        }
    }

    pub fn from_config(cfg: &SourceConfig, options: &LoaderConfig) -> Self {
        Self::new(&cfg.display_name(), &cfg.path, options.clone())
    }
}

impl TableSource for CsvTableSource {
    fn load(&self, key: &ColumnName, columns: &[Column]) -> Result<Table> {
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        read_table(&self.name, file, key, columns, &self.options)
            .with_context(|| format!("Failed to read {}", self.path.display()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Parse CSV content into a `Table`.
///
/// The schema holds the configured `columns` found in the header, in
/// configured order; configured columns absent from the header are left
/// out so the engine reports the mismatch. Header columns not configured
/// are ignored.
pub fn read_table<R: Read>(
    name: &str,
    reader: R,
    key: &ColumnName,
    columns: &[Column],
    options: &LoaderConfig,
) -> Result<Table> {
    let delimiter = match u8::try_from(options.delimiter) {
        Ok(b) if b.is_ascii() => b,
        _ => bail!(
            "delimiter must be a single ASCII character, got {:?}",
            options.delimiter
        ),
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let key_idx = match headers.iter().position(|h| h == key.as_str()) {
        Some(idx) => idx,
        None => bail!("key column '{}' not found in header", key),
    };

    let mut present = Vec::new();
    for col in columns {
        match headers.iter().position(|h| h == col.name.as_str()) {
            Some(idx) => present.push((idx, col.clone())),
            None => warn!(source = name, column = %col.name, "configured column missing from file"),
        }
    }

    let schema = TableSchema {
        key: key.clone(),
        columns: present.iter().map(|(_, c)| c.clone()).collect(),
    };
    let mut table = Table::new(name, schema);
    let mut unparsed: BTreeMap<&str, usize> = BTreeMap::new();

    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed CSV record {}", line + 1))?;

        let key_value = record.get(key_idx).unwrap_or("").trim();
        if key_value.is_empty() {
            bail!("record {} has an empty key column '{}'", line + 1, key);
        }

        let mut row = TableRow::new(key_value);
        for (idx, col) in &present {
            let raw = record.get(*idx).unwrap_or("");
            if is_null(raw, options) {
                continue;
            }
            let value = parse_cell(raw, col.ty, &options.date_format);
            if matches!(value, CellValue::Text(_))
                && matches!(col.ty, ColumnType::Numeric | ColumnType::Date)
            {
                *unparsed.entry(col.name.as_str()).or_default() += 1;
            }
            row.values.insert(col.name.0.clone(), value);
        }
        table.push(row);
    }

    for (column, count) in unparsed {
        debug!(source = name, column, count, "cells kept as text for the comparator to flag");
    }

    Ok(table)
}

fn is_null(raw: &str, options: &LoaderConfig) -> bool {
    let trimmed = raw.trim();
    options.null_values.iter().any(|n| n == trimmed)
}

/// Read a raw CSV cell as the column type; unparseable cells stay `Text`.
fn parse_cell(raw: &str, ty: ColumnType, date_format: &str) -> CellValue {
    let trimmed = raw.trim();
    match ty {
        ColumnType::Numeric => {
            if let Ok(i) = trimmed.parse::<i64>() {
                CellValue::Int(i)
            } else if let Ok(f) = trimmed.parse::<f64>() {
                CellValue::Float(f)
            } else {
                CellValue::Text(raw.to_string())
            }
        }
        ColumnType::Date => match NaiveDate::parse_from_str(trimmed, date_format) {
            Ok(d) => CellValue::Date(d),
            Err(_) => CellValue::Text(raw.to_string()),
        },
        ColumnType::Text | ColumnType::Categorical => CellValue::Text(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn columns() -> Vec<Column> {
        vec![
            Column::date("Issue Date"),
            Column::numeric("Price"),
            Column::numeric("Volume"),
            Column::categorical("Credit Rating"),
        ]
    }

    fn key() -> ColumnName {
        ColumnName("Ticker".into())
    }

    fn load(csv: &str) -> Result<Table> {
        read_table("left", csv.as_bytes(), &key(), &columns(), &LoaderConfig::default())
    }

    #[test]
    fn loads_typed_cells() {
        let csv = "\
Ticker,Issue Date,Price,Volume,Credit Rating
TICKER1,2004-03-17,101.25,4200,AA
TICKER2,2011-11-02,98.5,1000,BBB
";
        let table = load(csv).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.schema.columns, columns());

        let row = &table.rows[0];
        assert_eq!(row.key.as_str(), "TICKER1");
        assert_eq!(
            row.values["Issue Date"],
            CellValue::Date(NaiveDate::from_ymd_opt(2004, 3, 17).unwrap())
        );
        assert_eq!(row.values["Price"], CellValue::Float(101.25));
        assert_eq!(row.values["Volume"], CellValue::Int(4200));
        assert_eq!(row.values["Credit Rating"], CellValue::Text("AA".into()));
    }

    #[test]
    fn null_tokens_are_absent() {
        let csv = "\
Ticker,Issue Date,Price,Volume,Credit Rating
TICKER1,,NaN,NA,
";
        let table = load(csv).unwrap();
        assert!(table.rows[0].values.is_empty());
    }

    #[test]
    fn unparseable_cells_stay_text() {
        let csv = "\
Ticker,Issue Date,Price,Volume,Credit Rating
TICKER1,17/03/2004,#VALUE!,4200,AA
";
        let table = load(csv).unwrap();
        let row = &table.rows[0];
        assert_eq!(row.values["Issue Date"], CellValue::Text("17/03/2004".into()));
        assert_eq!(row.values["Price"], CellValue::Text("#VALUE!".into()));
    }

    #[test]
    fn missing_configured_column_is_left_out_of_schema() {
        let csv = "\
Ticker,Price
TICKER1,100
";
        let table = load(csv).unwrap();
        assert_eq!(table.schema.columns, vec![Column::numeric("Price")]);
    }

    #[test]
    fn missing_key_column_fails() {
        let csv = "ISIN,Price\nXS123,100\n";
        let err = load(csv).unwrap_err();
        assert!(err.to_string().contains("key column 'Ticker'"));
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        for delimiter in ['§', 'é', '\u{012C}'] {
            let options = LoaderConfig {
                delimiter,
                ..LoaderConfig::default()
            };
            let err = read_table(
                "t",
                "Ticker,Price\nT1,100\n".as_bytes(),
                &ColumnName("Ticker".into()),
                &[Column::numeric("Price")],
                &options,
            )
            .unwrap_err();
            assert!(err.to_string().contains("single ASCII character"));
        }
    }

    #[test]
    fn empty_key_fails() {
        let csv = "Ticker,Price\n,100\n";
        assert!(load(csv).is_err());
    }

    #[test]
    fn honours_delimiter_and_date_format() {
        let csv = "Ticker;Issue Date\nT1;17.03.2004\n";
        let options = LoaderConfig {
            delimiter: ';',
            date_format: "%d.%m.%Y".into(),
            ..LoaderConfig::default()
        };
        let table = read_table(
            "left",
            csv.as_bytes(),
            &key(),
            &[Column::date("Issue Date")],
            &options,
        )
        .unwrap();
        assert_eq!(
            table.rows[0].values["Issue Date"],
            CellValue::Date(NaiveDate::from_ymd_opt(2004, 3, 17).unwrap())
        );
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Ticker,Price").unwrap();
        writeln!(file, "T1,100").unwrap();

        let source = CsvTableSource::new("vendor_a", file.path(), LoaderConfig::default());
        let table = source.load(&key(), &[Column::numeric("Price")]).unwrap();
        assert_eq!(table.name, "vendor_a");
        assert_eq!(table.rows[0].values["Price"], CellValue::Int(100));
    }

    #[test]
    fn missing_file_has_context() {
        let source = CsvTableSource::new("x", "/no/such/file.csv", LoaderConfig::default());
        let err = source.load(&key(), &columns()).unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }
}
