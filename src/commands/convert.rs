//! Convert command implementation.

use super::models::ConvertArgs;
use crate::converter::{convert_file, perfume_path, ConversionStats};
use anyhow::Result;
use log::{error, info};
use std::path::PathBuf;

/// Outcome of converting one file
#[derive(Debug)]
pub struct ConvertedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    /// `None` when the file was skipped
    pub stats: Option<ConversionStats>,
}

/// Execute the convert command
///
/// **Public** - main entry point called from main.rs
///
/// Each file is converted independently; failures are logged and the
/// remaining files still run.
pub fn execute_convert(args: &ConvertArgs) -> Result<Vec<ConvertedFile>> {
    if args.files.is_empty() {
        anyhow::bail!("At least one log file is required");
    }

    let results = args
        .files
        .iter()
        .map(|input| {
            let output = perfume_path(input, args.output_dir.as_deref());
            let stats = match convert_file(input, &output) {
                Ok(stats) => {
                    info!(
                        "✓ {} records written to {} ({} malformed lines skipped)",
                        stats.records_written,
                        output.display(),
                        stats.malformed_lines
                    );
                    Some(stats)
                }
                Err(e) => {
                    error!("{}", e);
                    None
                }
            };
            ConvertedFile {
                input: input.clone(),
                output,
                stats,
            }
        })
        .collect();

    Ok(results)
}
