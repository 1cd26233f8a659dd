//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Validates the file list
//! 2. Runs an independent analysis pass per file
//! 3. Builds a report, keeping open failures as empty entries
//! 4. Prints the report as text or JSON

use super::models::{AnalyzeArgs, OutputFormat};
use crate::aggregator::analyze_file;
use crate::output::{render_json, render_text, FileReport, Report};
use anyhow::{Context, Result};
use log::{error, info};
use std::time::Instant;

/// Execute the analyze command and print the summary
///
/// **Public** - main entry point called from main.rs
///
/// A file that cannot be opened is reported and skipped; the remaining
/// files are still analyzed.
pub fn execute_analyze(args: &AnalyzeArgs) -> Result<Report> {
    validate_args(args)?;

    let start_time = Instant::now();
    let report = build_report(args);

    let rendered = match args.format {
        OutputFormat::Text => render_text(&report, args.show_diagnostics),
        OutputFormat::Json => render_json(&report).context("Failed to render JSON summary")?,
    };
    println!("{}", rendered);

    info!(
        "Analyzed {} file(s) in {:.2}s ({} failed)",
        report.files.len(),
        start_time.elapsed().as_secs_f64(),
        report.failed_files()
    );

    Ok(report)
}

/// Analyze every file without printing anything
///
/// **Public** - also used directly by tests
pub fn build_report(args: &AnalyzeArgs) -> Report {
    let files = args
        .files
        .iter()
        .map(|path| {
            let label = path.display().to_string();
            match analyze_file(path, args.options) {
                Ok(analysis) => FileReport::from_analysis(label, &analysis),
                Err(e) => {
                    error!("{}", e);
                    FileReport::failed(label, &e)
                }
            }
        })
        .collect();

    Report::new(args.stack_mode_label(), files)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.files.is_empty() {
        anyhow::bail!("At least one log file is required");
    }

    if let Some(empty) = args.files.iter().find(|p| p.as_os_str().is_empty()) {
        anyhow::bail!("Empty file path in argument list: {:?}", empty);
    }

    Ok(())
}
