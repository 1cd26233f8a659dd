//! Typed records parsed from timing log lines.
//!
//! The instrumented program writes one record per line. Function entry and
//! exit records drive the analyzer; bracketed event markers are only carried
//! through by the Perfume converter.

use std::fmt;

/// Whether a record marks a function entrance or exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Enter,
    Exit,
}

impl EventKind {
    /// Word used for this kind in converted output
    pub fn label(self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Exit => "exit",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A function entry or exit record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub function_name: String,
    pub thread_id: u64,
    /// Monotonic clock reading, treated as nanoseconds
    pub timestamp: u64,
    /// Words following the timestamp (the lock identifier for lock functions)
    pub extra_tokens: Vec<String>,
}

impl Event {
    pub fn new(
        kind: EventKind,
        function_name: impl Into<String>,
        thread_id: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            kind,
            function_name: function_name.into(),
            thread_id,
            timestamp,
            extra_tokens: Vec::new(),
        }
    }

    /// Attach trailing tokens
    pub fn with_extra_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Reconstruct the free-form lock name from the trailing tokens
    ///
    /// Returns `None` when the record carried nothing after the timestamp.
    pub fn lock_name(&self) -> Option<String> {
        if self.extra_tokens.is_empty() {
            None
        } else {
            Some(self.extra_tokens.join(" "))
        }
    }
}

/// A named point event: `* [event name] thread time`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Bracketed name, brackets included
    pub name: String,
    pub thread_id: u64,
    pub timestamp: u64,
}

/// Result of reading one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine {
    Event(Event),
    Marker(Marker),
    /// Blank line or unknown leading token
    Ignored,
}
