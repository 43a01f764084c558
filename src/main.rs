use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tabrecon::presentation::cli_summary::{print_perf_summary, print_summary};
use tabrecon::presentation::writers::{all_writers, write_to_file, writer_for};
use tabrecon::{AppConfig, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "tabrecon",
    about = "Reconcile two versions of a dataset, row by row and cell by cell."
)]
struct Cli {
    #[arg(short, long, default_value = "tabrecon.toml")]
    config: String,

    /// Print the summary without writing any report file.
    #[arg(long)]
    dry_run: bool,

    /// all, json, csv, differences, matches, columns or summary.
    #[arg(short, long, default_value = "all")]
    format: String,

    /// Print load and diff timings.
    #[arg(long)]
    perf: bool,

    /// Exit with status 1 when any difference or unreadable value is found.
    #[arg(long)]
    fail_on_diff: bool,

    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LogLevel::Debug
    } else if cli.quiet {
        LogLevel::Error
    } else {
        LogLevel::Info
    };
    tabrecon::init_tracing(level);

    let cfg = AppConfig::load(&cli.config)?;
    let (report, perf) = tabrecon::run_with_timing(&cfg)?;

    print_summary(&report);
    if cli.perf {
        print_perf_summary(&perf);
    }

    if !cli.dry_run {
        // --- one subdirectory per report ---
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let output_subdir =
            Path::new(&cfg.output.dir).join(format!("{}_{}", timestamp, report.report_id));

        let writers = match cli.format.as_str() {
            "all" => all_writers(),
            fmt => vec![writer_for(fmt).ok_or_else(|| anyhow::anyhow!("Unknown format: {}", fmt))?],
        };
        for writer in writers {
            write_to_file(&*writer, &report, &output_subdir)?;
        }

        println!("Report written to {}", output_subdir.display());
    }

    if cli.fail_on_diff && !report.is_clean() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
