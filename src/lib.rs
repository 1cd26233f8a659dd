//! Trace Timing
//!
//! Function timing and lock-contention analysis for logs written by
//! timing-instrumented programs.
//!
//! Each log line records a function entrance (`-->`) or exit (`<--`)
//! with a thread id and a monotonic timestamp. The analyzer pairs
//! entrances with exits, accumulates call counts and running time per
//! function, and for lock-named functions tracks how long each lock was
//! held.
//!
//! ## Getting Started
//!
//! ```bash
//! trace-timing analyze timing.log
//! trace-timing convert timing.log --output-dir perfume/
//! ```

pub mod aggregator;
pub mod commands;
pub mod converter;
pub mod output;
pub mod parser;
pub mod utils;
