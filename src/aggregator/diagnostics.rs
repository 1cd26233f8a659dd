//! Structured, non-fatal findings collected while analyzing one file.

use super::lock_tracker::{LockAnomaly, LockRecord};
use crate::utils::error::ParseError;
use std::fmt;

/// Category of a diagnostic, for counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    MalformedLine,
    UnmatchedExit,
    DiscardedEntry,
    TimestampRegression,
    MissingLockName,
    DoubleAcquire,
    TryLockOwnerMismatch,
    ReleaseWithoutAcquire,
    UnclosedEntry,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedLine => "malformed_line",
            Self::UnmatchedExit => "unmatched_exit",
            Self::DiscardedEntry => "discarded_entry",
            Self::TimestampRegression => "timestamp_regression",
            Self::MissingLockName => "missing_lock_name",
            Self::DoubleAcquire => "double_acquire",
            Self::TryLockOwnerMismatch => "trylock_owner_mismatch",
            Self::ReleaseWithoutAcquire => "release_without_acquire",
            Self::UnclosedEntry => "unclosed_entry",
        }
    }

    /// True for lock-sequencing anomalies
    pub fn is_lock_anomaly(self) -> bool {
        matches!(
            self,
            Self::DoubleAcquire | Self::TryLockOwnerMismatch | Self::ReleaseWithoutAcquire
        )
    }
}

/// A detected inconsistency; `line` is 1-based
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    MalformedLine {
        line: usize,
        text: String,
        reason: ParseError,
    },
    UnmatchedExit {
        line: usize,
        function: String,
        thread_id: u64,
    },
    DiscardedEntry {
        line: usize,
        function: String,
        thread_id: u64,
        timestamp: u64,
    },
    TimestampRegression {
        line: usize,
        function: String,
        entry: u64,
        exit: u64,
    },
    MissingLockName {
        line: usize,
        function: String,
    },
    DoubleAcquire {
        line: usize,
        lock: String,
        outstanding: LockRecord,
        incoming: LockRecord,
    },
    TryLockOwnerMismatch {
        line: usize,
        lock: String,
        outstanding: LockRecord,
        incoming: LockRecord,
    },
    ReleaseWithoutAcquire {
        line: usize,
        lock: String,
        function: String,
        thread_id: u64,
    },
    UnclosedEntry {
        function: String,
        thread_id: u64,
        timestamp: u64,
    },
}

impl Diagnostic {
    /// Wrap a lock tracker anomaly with its location
    pub fn from_lock_anomaly(line: usize, lock: &str, anomaly: LockAnomaly) -> Self {
        let lock = lock.to_string();
        match anomaly {
            LockAnomaly::DoubleAcquire { outstanding, incoming } => Self::DoubleAcquire {
                line,
                lock,
                outstanding,
                incoming,
            },
            LockAnomaly::TryLockOwnerMismatch { outstanding, incoming } => {
                Self::TryLockOwnerMismatch {
                    line,
                    lock,
                    outstanding,
                    incoming,
                }
            }
            LockAnomaly::ReleaseWithoutAcquire { function_name, thread_id } => {
                Self::ReleaseWithoutAcquire {
                    line,
                    lock,
                    function: function_name,
                    thread_id,
                }
            }
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::MalformedLine { .. } => DiagnosticKind::MalformedLine,
            Self::UnmatchedExit { .. } => DiagnosticKind::UnmatchedExit,
            Self::DiscardedEntry { .. } => DiagnosticKind::DiscardedEntry,
            Self::TimestampRegression { .. } => DiagnosticKind::TimestampRegression,
            Self::MissingLockName { .. } => DiagnosticKind::MissingLockName,
            Self::DoubleAcquire { .. } => DiagnosticKind::DoubleAcquire,
            Self::TryLockOwnerMismatch { .. } => DiagnosticKind::TryLockOwnerMismatch,
            Self::ReleaseWithoutAcquire { .. } => DiagnosticKind::ReleaseWithoutAcquire,
            Self::UnclosedEntry { .. } => DiagnosticKind::UnclosedEntry,
        }
    }

    /// Line the diagnostic was raised on, if it has one
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedLine { line, .. }
            | Self::UnmatchedExit { line, .. }
            | Self::DiscardedEntry { line, .. }
            | Self::TimestampRegression { line, .. }
            | Self::MissingLockName { line, .. }
            | Self::DoubleAcquire { line, .. }
            | Self::TryLockOwnerMismatch { line, .. }
            | Self::ReleaseWithoutAcquire { line, .. } => Some(*line),
            Self::UnclosedEntry { .. } => None,
        }
    }
}

fn fmt_record(record: &LockRecord) -> String {
    format!(
        "{} by {} on thread {} at {}",
        record.lock_name, record.function_name, record.thread_id, record.time_acquired
    )
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedLine { line, text, reason } => {
                write!(f, "line {}: could not parse '{}': {}", line, text, reason)
            }
            Self::UnmatchedExit { line, function, thread_id } => write!(
                f,
                "line {}: no matching entrance for exit of {} on thread {}",
                line, function, thread_id
            ),
            Self::DiscardedEntry { line, function, thread_id, timestamp } => write!(
                f,
                "line {}: {} entered at {} on thread {} never exited",
                line, function, timestamp, thread_id
            ),
            Self::TimestampRegression { line, function, entry, exit } => write!(
                f,
                "line {}: exit of {} at {} precedes its entrance at {}",
                line, function, exit, entry
            ),
            Self::MissingLockName { line, function } => write!(
                f,
                "line {}: lock function {} carries no lock name",
                line, function
            ),
            Self::DoubleAcquire { line, lock, outstanding, incoming } => write!(
                f,
                "line {}: unexpected second acquire of {} while one is outstanding: held [{}], new [{}]",
                line,
                lock,
                fmt_record(outstanding),
                fmt_record(incoming)
            ),
            Self::TryLockOwnerMismatch { line, lock, outstanding, incoming } => write!(
                f,
                "line {}: trylock of {} does not match outstanding owner: held [{}], new [{}]",
                line,
                lock,
                fmt_record(outstanding),
                fmt_record(incoming)
            ),
            Self::ReleaseWithoutAcquire { line, lock, function, thread_id } => write!(
                f,
                "line {}: no matching acquire found for release of {} by {} on thread {}",
                line, lock, function, thread_id
            ),
            Self::UnclosedEntry { function, thread_id, timestamp } => write!(
                f,
                "{} entered at {} on thread {} has no exit before end of file",
                function, timestamp, thread_id
            ),
        }
    }
}
