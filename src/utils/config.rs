//! Configuration and constants for the analyzer and converter.

/// Current summary schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Line markers written by the timing instrumentation
pub const ENTER_MARKER: &str = "-->";
pub const EXIT_MARKER: &str = "<--";
pub const EVENT_MARKER: &str = "*";

/// Marker, function name, thread id and timestamp
pub const MIN_EVENT_FIELDS: usize = 4;

/// Marker, at least one name token, thread id and timestamp
pub const MIN_MARKER_FIELDS: usize = 4;

// Substrings used to recognise lock operations by function name.
// Checked in this order: release, then trylock, then acquire.
pub const RELEASE_PATTERNS: &[&str] = &["release", "unlock"];
pub const TRYLOCK_PATTERNS: &[&str] = &["trylock"];
pub const ACQUIRE_PATTERNS: &[&str] = &["acquire", "lock"];

/// Extension appended to converted log files
pub const PERFUME_EXTENSION: &str = "perfume";

/// Unit label for timestamps in the text summary
pub const TICK_UNIT: &str = "ns";
