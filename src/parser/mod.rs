//! Timing log parsing.
//!
//! This module handles:
//! - Splitting raw log lines into typed entry/exit events
//! - Rejecting malformed lines with a reason
//! - Recognising bracketed event markers for the converter

pub mod event;
pub mod log_line;

// Re-export main types
pub use event::{Event, EventKind, LogLine, Marker};
pub use log_line::{parse_line, parse_record};
