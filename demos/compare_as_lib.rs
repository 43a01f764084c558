//! # tabrecon library usage example
//!
//! Shows three common patterns for consuming tabrecon as a Rust library:
//!
//! 1. **From a config file**: simplest, mirrors the CLI
//! 2. **In-memory tables**: build `Table`s in code, no CSV or TOML needed
//! 3. **Inspect the result**: traverse the row verdicts for custom logic
//!
//! Run with a config file:
//!   cargo run --example compare_as_lib -- demos/tabrecon.toml
//!
//! Run with the built-in in-memory tables:
//!   cargo run --example compare_as_lib

use anyhow::Result;
use chrono::NaiveDate;
use tabrecon::{
    compare_tables,
    presentation::writers::{all_writers, write_to_file},
    AppConfig, CellValue, CellVerdict, Column, ColumnName, DiffResult, MissingCountPolicy,
    SummaryCounters, Table, TableRow, TableSchema,
};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some(path) => from_config_file(path),
        None => in_memory_tables(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pattern 1: load config from a TOML file (same as the CLI does internally)
// ─────────────────────────────────────────────────────────────────────────────
fn from_config_file(path: &str) -> Result<()> {
    println!("=== Pattern 1: from config file ({path}) ===\n");

    let cfg = AppConfig::load(path)?;
    let report = tabrecon::run(&cfg)?;

    let dir = std::path::Path::new(&cfg.output.dir);
    for writer in all_writers() {
        let written = write_to_file(&*writer, &report, dir)?;
        println!("Written: {}", written.display());
    }

    print_summary(&report.summary);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Pattern 2: build both tables in code.
// Useful when the data already lives in memory (a query result, a feed parser…).
// ─────────────────────────────────────────────────────────────────────────────
fn in_memory_tables() -> Result<()> {
    println!("=== Pattern 2: in-memory tables ===\n");

    let columns = vec![
        Column::date("Maturity Date"),
        Column::numeric("Coupon Rate (%)"),
        Column::categorical("Credit Rating"),
        Column::numeric("Price"),
    ];
    let schema = TableSchema::new("Ticker", columns.clone());

    let bond = |ticker: &str, maturity: (i32, u32, u32), coupon: f64, rating: &str, price: f64| {
        let (y, m, d) = maturity;
        let mut row = TableRow::new(ticker)
            .with("Coupon Rate (%)", CellValue::Float(coupon))
            .with("Credit Rating", CellValue::Text(rating.into()))
            .with("Price", CellValue::Float(price));
        if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
            row = row.with("Maturity Date", CellValue::Date(date));
        }
        row
    };

    let left = Table::new("vendor_a", schema.clone()).with_rows(vec![
        bond("TICKER1", (2030, 3, 15), 4.5, "AA", 101.25),
        bond("TICKER2", (2028, 9, 1), 3.1, "BBB", 97.8),
        bond("TICKER3", (2041, 1, 31), 5.0, "A", 110.0),
    ]);
    let right = Table::new("vendor_b", schema).with_rows(vec![
        bond("TICKER1", (2030, 3, 15), 4.5, "AA", 101.25),
        bond("TICKER2", (2028, 9, 1), 3.1, "BB", 97.8).without("Price"),
        bond("TICKER4", (2033, 6, 30), 2.75, "AAA", 99.9),
    ]);

    let (result, summary) = compare_tables(
        &left,
        &right,
        &ColumnName("Ticker".into()),
        &columns,
        MissingCountPolicy::default(),
    )?;

    // Hand off to pattern 3
    inspect_result(&result);
    print_summary(&summary);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Pattern 3: inspect the DiffResult directly for custom logic.
// The DiffResult is plain serialisable Rust data: no magic, no callbacks.
// ─────────────────────────────────────────────────────────────────────────────
fn inspect_result(result: &DiffResult) {
    println!("=== Pattern 3: inspecting the result ===\n");

    for row in result.differing_rows() {
        println!("━━ {} ({}) ━━", row.key, row.class().label());
        for cell in &row.verdict.cells {
            let show = |v: &Option<CellValue>| {
                v.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "∅".into())
            };
            match cell.verdict {
                CellVerdict::Equal => {}
                CellVerdict::Mismatch => println!(
                    "  ≠ {}: {} → {}",
                    cell.column,
                    show(&cell.left),
                    show(&cell.right)
                ),
                CellVerdict::MissingLeft => println!("  ◀ {} missing on the left", cell.column),
                CellVerdict::MissingRight => println!("  ▶ {} missing on the right", cell.column),
                CellVerdict::Invalid(side) => {
                    println!("  ! {} unreadable on the {} side", cell.column, side)
                }
            }
        }
        println!();
    }

    // Example: serialise to JSON and send to a webhook / write to a log
    let json = serde_json::to_string_pretty(result).expect("DiffResult is always serialisable");
    println!("Full result: {} bytes of JSON", json.len());
}

fn print_summary(summary: &SummaryCounters) {
    println!("\n── summary ──────────────────────");
    println!("  no differences : {}", summary.no_diff_count);
    println!("  data diffs     : {}", summary.data_diff_count);
    println!("  only left      : {}", summary.only_left_count);
    println!("  only right     : {}", summary.only_right_count);
    println!("  unreadable     : {}", summary.data_quality_rows);
}
