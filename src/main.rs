//! Trace Timing CLI
//!
//! Summarizes function running times and lock hold times from
//! timing logs, and converts logs for the Perfume tool.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use std::path::PathBuf;

use trace_timing::aggregator::{AnalysisOptions, StackMode};
use trace_timing::commands::{
    display_version, execute_analyze, execute_convert, AnalyzeArgs, ConvertArgs, OutputFormat,
};

/// Trace Timing - function and lock timing from instrumentation logs
#[derive(Parser, Debug)]
#[command(name = "trace-timing")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize function and lock timing for one or more log files
    Analyze {
        /// Log files to process
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// How entrances are matched to exits
        #[arg(long, value_enum, default_value_t = StackModeArg::PerThread, env = "TRACE_TIMING_STACK_MODE")]
        stack_mode: StackModeArg,

        /// Summary format
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,

        /// List every diagnostic instead of only counts
        #[arg(long)]
        show_diagnostics: bool,
    },

    /// Convert log files to Perfume input
    Convert {
        /// Log files to convert
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory for .perfume files (default: next to each input)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StackModeArg {
    /// One stack per thread id
    PerThread,
    /// One stack for the whole file
    Global,
}

impl From<StackModeArg> for StackMode {
    fn from(arg: StackModeArg) -> Self {
        match arg {
            StackModeArg::PerThread => StackMode::PerThread,
            StackModeArg::Global => StackMode::Global,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            files,
            stack_mode,
            format,
            show_diagnostics,
        } => {
            let args = AnalyzeArgs {
                files,
                options: AnalysisOptions {
                    stack_mode: stack_mode.into(),
                },
                format: format.into(),
                show_diagnostics,
            };
            execute_analyze(&args)?;
        }

        Commands::Convert { files, output_dir } => {
            execute_convert(&ConvertArgs { files, output_dir })?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
