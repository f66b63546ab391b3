//! Sieve CLI - clean a raw listings artifact and publish it as a new version.

mod cli;
mod logging;

use std::io::{self, IsTerminal};

use clap::Parser;
use colored::Colorize;
use tracing::error;

use cli::Cli;
use logging::LogConfig;
use sieve::{CleaningPipeline, CleaningReport, JsonRunTracker, LocalArtifactStore, SieveError};

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_format(cli.log_format)
        .with_ansi(io::stderr().is_terminal());
    if let Err(e) = logging::init_logging(&log_config) {
        eprintln!("Warning: failed to initialise logging: {}", e);
    }

    match run(&cli) {
        Ok(report) => print_summary(&report),
        Err(e) => {
            error!(error = %e, "basic cleaning failed");
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(exit_code(&e));
        }
    }
}

fn run(cli: &Cli) -> sieve::Result<CleaningReport> {
    let store = LocalArtifactStore::new(&cli.artifact_root);
    let tracker = JsonRunTracker::new(cli.runs_directory());
    CleaningPipeline::new(store, tracker).run(&cli.cleaning_config())
}

/// Process exit status for a failed run.
fn exit_code(error: &SieveError) -> i32 {
    match error {
        SieveError::Configuration(_) => 2,
        SieveError::MalformedInput { .. } => 3,
        SieveError::StoreUnavailable(_) | SieveError::ArtifactNotFound(_) => 4,
        SieveError::Io { .. } | SieveError::Csv(_) | SieveError::Json(_) => 1,
    }
}

fn print_summary(report: &CleaningReport) {
    println!(
        "{} {}",
        "Published".green().bold(),
        report.artifact.id().to_string().white().bold()
    );
    println!("  Run:     {}", report.run_id);
    println!("  Type:    {}", report.artifact.artifact_type);
    println!("  Digest:  {}", report.artifact.digest.dimmed());
    println!("  Lineage: {}", lineage(report));
    println!();

    for stage in &report.stages {
        let mut line = format!(
            "  {:<20} {:>8} -> {:<8}",
            stage.stage, stage.rows_in, stage.rows_out
        );
        if stage.rows_dropped() > 0 {
            line.push_str(&format!(" ({} dropped)", stage.rows_dropped()));
        }
        if stage.values_nulled > 0 {
            line.push_str(&format!(" ({} nulled)", stage.values_nulled));
        }
        println!("{}", line);
    }

    println!();
    println!(
        "Rows: {} in, {} out",
        report.rows_in.to_string().cyan(),
        report.rows_out.to_string().cyan().bold()
    );
}

fn lineage(report: &CleaningReport) -> String {
    if report.artifact.lineage.is_empty() {
        return "-".to_string();
    }
    report
        .artifact
        .lineage
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
