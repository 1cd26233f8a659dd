//! Per-file analysis pass.
//!
//! Feeds log lines through the parser and matcher, records every matched
//! call in the function stats, routes lock-named calls to the lock tracker
//! and collects diagnostics along the way. All state is owned by one
//! `TraceAnalyzer` and handed back as a `FileAnalysis` when the file ends.

use super::diagnostics::{Diagnostic, DiagnosticKind};
use super::function_stats::{FunctionStat, FunctionStats};
use super::lock_classifier::{classify, LockOp};
use super::lock_tracker::{LockStat, LockTracker};
use super::matcher::{CallStackMatcher, StackMode};
use crate::parser::{parse_line, Event, EventKind};
use crate::utils::error::AnalysisError;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Knobs for one analysis pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub stack_mode: StackMode,
}

/// Everything learned from one log file
#[derive(Debug, Clone, Default)]
pub struct FileAnalysis {
    pub functions: HashMap<String, FunctionStat>,
    pub locks: HashMap<String, LockStat>,
    /// In the order they were detected
    pub diagnostics: Vec<Diagnostic>,
    pub lines_read: usize,
    pub events_read: usize,
}

impl FileAnalysis {
    /// Number of diagnostics of one kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind() == kind).count()
    }

    /// Diagnostic totals by kind, omitting kinds that never occurred
    pub fn diagnostic_counts(&self) -> BTreeMap<DiagnosticKind, usize> {
        let mut counts = BTreeMap::new();
        for diagnostic in &self.diagnostics {
            *counts.entry(diagnostic.kind()).or_insert(0) += 1;
        }
        counts
    }
}

/// Streaming analyzer for a single file
#[derive(Debug)]
pub struct TraceAnalyzer {
    source: String,
    matcher: CallStackMatcher,
    functions: FunctionStats,
    locks: LockTracker,
    diagnostics: Vec<Diagnostic>,
    lines_read: usize,
    events_read: usize,
}

impl TraceAnalyzer {
    pub fn new(options: AnalysisOptions) -> Self {
        Self {
            source: "<input>".to_string(),
            matcher: CallStackMatcher::new(options.stack_mode),
            functions: FunctionStats::new(),
            locks: LockTracker::new(),
            diagnostics: Vec::new(),
            lines_read: 0,
            events_read: 0,
        }
    }

    /// Label used in log messages (usually the file path)
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Consume the next raw line
    pub fn feed_line(&mut self, line: &str) {
        self.lines_read += 1;
        let line_no = self.lines_read;

        match parse_line(line) {
            Ok(Some(event)) => self.feed_event(line_no, event),
            Ok(None) => {}
            Err(reason) => self.report(Diagnostic::MalformedLine {
                line: line_no,
                text: line.trim_end().to_string(),
                reason,
            }),
        }
    }

    /// Consume an already parsed event found on `line_no`
    pub fn feed_event(&mut self, line_no: usize, event: Event) {
        self.events_read += 1;
        match event.kind {
            EventKind::Enter => self.matcher.enter(event),
            EventKind::Exit => self.handle_exit(line_no, &event),
        }
    }

    /// End the pass and hand back the collected state
    pub fn finish(mut self) -> FileAnalysis {
        for frame in self.matcher.drain_unclosed() {
            self.report(Diagnostic::UnclosedEntry {
                function: frame.function_name,
                thread_id: frame.thread_id,
                timestamp: frame.timestamp,
            });
        }

        info!(
            "{}: {} lines, {} events, {} functions, {} locks, {} diagnostics",
            self.source,
            self.lines_read,
            self.events_read,
            self.functions.len(),
            self.locks.len(),
            self.diagnostics.len()
        );

        FileAnalysis {
            functions: self.functions.into_inner(),
            locks: self.locks.into_inner(),
            diagnostics: self.diagnostics,
            lines_read: self.lines_read,
            events_read: self.events_read,
        }
    }

    fn handle_exit(&mut self, line_no: usize, exit: &Event) {
        let outcome = self.matcher.exit(exit);

        for frame in outcome.discarded {
            self.report(Diagnostic::DiscardedEntry {
                line: line_no,
                function: frame.function_name,
                thread_id: frame.thread_id,
                timestamp: frame.timestamp,
            });
        }

        let Some(interval) = outcome.interval else {
            self.report(Diagnostic::UnmatchedExit {
                line: line_no,
                function: exit.function_name.clone(),
                thread_id: exit.thread_id,
            });
            return;
        };

        if interval.is_regressed() {
            self.report(Diagnostic::TimestampRegression {
                line: line_no,
                function: interval.function_name.clone(),
                entry: interval.entry_timestamp,
                exit: interval.exit_timestamp,
            });
        }

        self.functions.record(&interval.function_name, interval.duration_ticks);

        let op = classify(&interval.function_name);
        if op == LockOp::NotLock {
            return;
        }

        let Some(lock_name) = interval.lock_name.as_deref() else {
            self.report(Diagnostic::MissingLockName {
                line: line_no,
                function: interval.function_name.clone(),
            });
            return;
        };

        debug!("{:?} on '{}' took {} ticks", op, lock_name, interval.duration_ticks);
        if let Some(anomaly) = self.locks.record(op, lock_name, &interval) {
            self.report(Diagnostic::from_lock_anomaly(line_no, lock_name, anomaly));
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{}: {}", self.source, diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

/// Analyze an in-memory sequence of lines
pub fn analyze_lines<I, S>(lines: I, options: AnalysisOptions) -> FileAnalysis
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut analyzer = TraceAnalyzer::new(options);
    for line in lines {
        analyzer.feed_line(line.as_ref());
    }
    analyzer.finish()
}

/// Analyze every line a reader yields
///
/// Invalid UTF-8 is replaced rather than treated as a read error, so one
/// corrupt record only costs that line.
pub fn analyze_reader<R: BufRead>(
    mut reader: R,
    source: &str,
    options: AnalysisOptions,
) -> io::Result<FileAnalysis> {
    let mut analyzer = TraceAnalyzer::new(options).with_source(source);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        analyzer.feed_line(line.trim_end_matches(['\n', '\r']));
    }

    Ok(analyzer.finish())
}

/// Open and analyze one log file
///
/// # Errors
/// * `AnalysisError::OpenFailed` - the file could not be opened
/// * `AnalysisError::ReadFailed` - an I/O error interrupted reading
pub fn analyze_file(path: impl AsRef<Path>, options: AnalysisOptions) -> Result<FileAnalysis, AnalysisError> {
    let path = path.as_ref();
    info!("Parsing file {}", path.display());

    let file = File::open(path).map_err(|source| AnalysisError::OpenFailed {
        path: path.to_path_buf(),
        source,
    })?;

    analyze_reader(BufReader::new(file), &path.display().to_string(), options).map_err(|source| {
        AnalysisError::ReadFailed {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_and_events_counted() {
        let analysis = analyze_lines(
            ["--> foo 1 100", "garbage", "", "<-- foo 1 250"],
            AnalysisOptions::default(),
        );
        assert_eq!(analysis.lines_read, 4);
        assert_eq!(analysis.events_read, 2);
        assert!(analysis.diagnostics.is_empty());
    }

    #[test]
    fn test_malformed_line_keeps_text_and_line_number() {
        let analysis = analyze_lines(["--> foo 1 100", "--> bar x 5  "], AnalysisOptions::default());
        match &analysis.diagnostics[0] {
            Diagnostic::MalformedLine { line, text, .. } => {
                assert_eq!(*line, 2);
                assert_eq!(text, "--> bar x 5");
            }
            other => panic!("unexpected diagnostic {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_entries_reported_at_finish() {
        let analysis = analyze_lines(["--> foo 1 100"], AnalysisOptions::default());
        assert_eq!(analysis.count(DiagnosticKind::UnclosedEntry), 1);
        assert!(analysis.functions.is_empty());
    }

    #[test]
    fn test_reader_tolerates_crlf_and_invalid_utf8() {
        let bytes: &[u8] = b"--> foo 1 100\r\n\xff\xfe junk\n<-- foo 1 130\r\n";
        let analysis = analyze_reader(bytes, "mem", AnalysisOptions::default()).unwrap();
        assert_eq!(analysis.functions["foo"].total_duration_ticks, 30);
        assert_eq!(analysis.lines_read, 3);
    }

    #[test]
    fn test_lock_function_without_name() {
        let analysis = analyze_lines(["--> spin_lock 1 0", "<-- spin_lock 1 4"], AnalysisOptions::default());
        assert_eq!(analysis.functions["spin_lock"].call_count, 1);
        assert!(analysis.locks.is_empty());
        assert_eq!(analysis.count(DiagnosticKind::MissingLockName), 1);
    }
}
