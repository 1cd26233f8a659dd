use crate::aggregator::{AnalysisOptions, StackMode};
use std::path::PathBuf;

/// How the analyze command prints its summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Log files to analyze, each independently
    pub files: Vec<PathBuf>,

    /// Engine options applied to every file
    pub options: AnalysisOptions,

    /// Summary format on stdout
    pub format: OutputFormat,

    /// List every diagnostic, not just counts
    pub show_diagnostics: bool,
}

impl AnalyzeArgs {
    /// Label for the stack mode, as shown in reports
    pub fn stack_mode_label(&self) -> &'static str {
        match self.options.stack_mode {
            StackMode::PerThread => "per-thread",
            StackMode::Global => "global",
        }
    }
}

/// Arguments for the convert command
#[derive(Debug, Clone, Default)]
pub struct ConvertArgs {
    /// Log files to convert
    pub files: Vec<PathBuf>,

    /// Directory for `.perfume` files (default: next to each input)
    pub output_dir: Option<PathBuf>,
}
