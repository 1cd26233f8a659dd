//! Summary views handed to the renderers.
//!
//! Averages are `None` when nothing was counted; the text renderer prints
//! them as `n/a` and JSON as `null`.

use crate::aggregator::{FileAnalysis, FunctionStat, LockStat};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::AnalysisError;
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;

/// Top-level summary of one run over one or more files
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// Stack reconciliation mode used for every file
    pub stack_mode: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// One entry per input file, in command-line order
    pub files: Vec<FileReport>,
}

impl Report {
    pub fn new(stack_mode: impl Into<String>, files: Vec<FileReport>) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            stack_mode: stack_mode.into(),
            generated_at: Utc::now().to_rfc3339(),
            files,
        }
    }

    /// Files that could not be analyzed
    pub fn failed_files(&self) -> usize {
        self.files.iter().filter(|f| f.error.is_some()).count()
    }
}

/// Summary of a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,

    /// Set when the file could not be opened or read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub lines_read: usize,
    pub events_read: usize,

    /// Sorted by total time, largest first
    pub functions: Vec<FunctionSummary>,

    /// Sorted by total hold time, largest first
    pub locks: Vec<LockSummary>,

    pub diagnostic_counts: BTreeMap<&'static str, usize>,

    /// Rendered diagnostic messages in detection order
    pub diagnostics: Vec<String>,
}

impl FileReport {
    /// Build the view of a successfully analyzed file
    pub fn from_analysis(file: impl Into<String>, analysis: &FileAnalysis) -> Self {
        let mut functions: Vec<FunctionSummary> = analysis
            .functions
            .iter()
            .map(|(name, stat)| FunctionSummary::new(name, stat))
            .collect();
        functions.sort_by(|a, b| {
            b.total_duration_ticks
                .cmp(&a.total_duration_ticks)
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut locks: Vec<(u64, LockSummary)> = analysis
            .locks
            .iter()
            .map(|(name, stat)| (stat.time_held, LockSummary::new(name, stat)))
            .collect();
        locks.sort_by(|(held_a, a), (held_b, b)| held_b.cmp(held_a).then_with(|| a.name.cmp(&b.name)));

        Self {
            file: file.into(),
            error: None,
            lines_read: analysis.lines_read,
            events_read: analysis.events_read,
            functions,
            locks: locks.into_iter().map(|(_, summary)| summary).collect(),
            diagnostic_counts: analysis
                .diagnostic_counts()
                .into_iter()
                .map(|(kind, count)| (kind.as_str(), count))
                .collect(),
            diagnostics: analysis.diagnostics.iter().map(ToString::to_string).collect(),
        }
    }

    /// Build the empty view of a file that could not be processed
    pub fn failed(file: impl Into<String>, error: &AnalysisError) -> Self {
        Self {
            file: file.into(),
            error: Some(error.to_string()),
            lines_read: 0,
            events_read: 0,
            functions: Vec::new(),
            locks: Vec::new(),
            diagnostic_counts: BTreeMap::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn function(&self, name: &str) -> Option<&FunctionSummary> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn lock(&self, name: &str) -> Option<&LockSummary> {
        self.locks.iter().find(|l| l.name == name)
    }
}

/// Per-function line of the summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionSummary {
    pub name: String,
    pub call_count: u64,
    pub total_duration_ticks: u64,
    pub average_duration_ticks: Option<f64>,
}

impl FunctionSummary {
    pub fn new(name: &str, stat: &FunctionStat) -> Self {
        Self {
            name: name.to_string(),
            call_count: stat.call_count,
            total_duration_ticks: stat.total_duration_ticks,
            average_duration_ticks: stat.average_duration(),
        }
    }
}

/// Per-lock line of the summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockSummary {
    pub name: String,
    pub num_acquire: u64,
    pub num_trylock: u64,
    pub num_release: u64,
    pub average_acquire_ticks: Option<f64>,
    pub average_trylock_ticks: Option<f64>,
    pub average_release_ticks: Option<f64>,
    pub average_held_ticks: Option<f64>,
    /// Still held when the file ended
    pub held_at_end: bool,
}

impl LockSummary {
    pub fn new(name: &str, stat: &LockStat) -> Self {
        Self {
            name: name.to_string(),
            num_acquire: stat.num_acquire,
            num_trylock: stat.num_trylock,
            num_release: stat.num_release,
            average_acquire_ticks: stat.average_acquire(),
            average_trylock_ticks: stat.average_trylock(),
            average_release_ticks: stat.average_release(),
            average_held_ticks: stat.average_held(),
            held_at_end: stat.pending.is_some(),
        }
    }
}
