use crate::application::monitoring::PerfReport;
use crate::domain::report::ComparisonReport;
use colored::*;
use tabled::settings::{object::Columns, Alignment, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct SummaryRow {
    description: String,
    count: String,
}

#[derive(Tabled)]
struct ColumnRow {
    column: String,
    #[tabled(rename = "type")]
    ty: String,
    mismatch: String,
    #[tabled(rename = "missing left")]
    missing_left: String,
    #[tabled(rename = "missing right")]
    missing_right: String,
    invalid: String,
}

pub fn print_summary(report: &ComparisonReport) {
    println!();

    println!("{}", "TABRECON COMPARISON SUMMARY".bold().cyan());
    println!(
        "{} ⇄ {}  (key: {})",
        report.left_source.blue(),
        report.right_source.green(),
        report.key_column.to_string().bold()
    );
    println!("Report: {}", report.report_id.bright_yellow());
    println!();

    let s = &report.summary;
    if s.total_rows == 0 {
        println!("{}", "Both sources are empty.".italic());
        return;
    }

    let [no_diff, data_diff, only_left, only_right] = s.headline();
    let mut summary_rows = vec![
        SummaryRow {
            description: no_diff.0.into(),
            count: no_diff.1.to_string().green().to_string(),
        },
        SummaryRow {
            description: data_diff.0.into(),
            count: data_diff.1.to_string().truecolor(255, 165, 0).to_string(),
        },
        SummaryRow {
            description: only_left.0.into(),
            count: only_left.1.to_string().yellow().to_string(),
        },
        SummaryRow {
            description: only_right.0.into(),
            count: only_right.1.to_string().magenta().to_string(),
        },
    ];
    if s.invalid_cells > 0 {
        summary_rows.push(SummaryRow {
            description: "Rows with unreadable values".into(),
            count: s.data_quality_rows.to_string().red().to_string(),
        });
    }
    summary_rows.push(SummaryRow {
        description: "Total rows".into(),
        count: s.total_rows.to_string().bold().to_string(),
    });

    let summary_table = Table::new(summary_rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..=1)).with(Alignment::right()))
        .to_string();
    println!("{summary_table}");

    if s.differing_rows() == 0 && s.invalid_cells == 0 {
        println!();
        println!("{}", "No differences detected.".italic());
        println!();
        return;
    }

    let rows: Vec<ColumnRow> = report
        .columns
        .iter()
        .zip(&s.columns)
        .filter(|(_, st)| st.differences() + st.invalid > 0)
        .map(|(col, st)| ColumnRow {
            column: col.name.to_string().bold().to_string(),
            ty: col.ty.to_string().dimmed().to_string(),
            mismatch: st.mismatch.to_string().truecolor(255, 165, 0).to_string(),
            missing_left: st.missing_left.to_string().yellow().to_string(),
            missing_right: st.missing_right.to_string().magenta().to_string(),
            invalid: st.invalid.to_string().red().to_string(),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..=5)).with(Alignment::right()))
        .to_string();

    println!();
    println!("{table}");
    println!();
}

// ─── Performance summary ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PerfRow {
    operation: String,
    target: String,
    #[tabled(rename = "rows")]
    rows: String,
    #[tabled(rename = "time (ms)")]
    duration_ms: String,
}

/// Print a performance timing table to stdout.
pub fn print_perf_summary(report: &PerfReport) {
    if report.timings.is_empty() {
        return;
    }

    println!("{}", "PERFORMANCE".bold().cyan());

    let rows: Vec<PerfRow> = report
        .timings
        .iter()
        .map(|t| PerfRow {
            operation: t.operation.dimmed().to_string(),
            target: t.target.bold().to_string(),
            rows: t.rows.to_string(),
            duration_ms: format_duration(t.duration_ms),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..=3)).with(Alignment::right()))
        .to_string();

    println!("{table}");

    println!(
        "  Total: {} row(s) loaded  ·  {} ms elapsed",
        report.total_rows_loaded.to_string().bold(),
        format_duration(report.total_ms),
    );
    println!();
}

fn format_duration(ms: u128) -> String {
    if ms >= 1_000 {
        format!("{:.1}s", ms as f64 / 1_000.0).yellow().to_string()
    } else if ms >= 100 {
        ms.to_string().yellow().to_string()
    } else {
        ms.to_string().green().to_string()
    }
}
