//! Reconciliation of timing events into per-function and per-lock statistics.
//!
//! This module transforms parsed log events into:
//! - Matched call intervals (entry/exit pairs)
//! - Call counts and cumulative running time per function
//! - Acquire/try-lock/release counts and hold time per lock
//! - A list of structured diagnostics for everything that did not line up

pub mod analyzer;
pub mod diagnostics;
pub mod function_stats;
pub mod lock_classifier;
pub mod lock_tracker;
pub mod matcher;

// Re-export main types and functions
pub use analyzer::{
    analyze_file, analyze_lines, analyze_reader, AnalysisOptions, FileAnalysis, TraceAnalyzer,
};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use function_stats::{FunctionStat, FunctionStats};
pub use lock_classifier::{classify, looks_like_lock, LockOp};
pub use lock_tracker::{LockAnomaly, LockRecord, LockStat, LockTracker};
pub use matcher::{CallInterval, CallStackMatcher, MatchOutcome, StackMode};
