//! Renderers and writers for analysis results.
//!
//! This module handles:
//! - Summary views built from per-file analysis
//! - Text tables and JSON on stdout
//! - Output file creation for the converter

pub mod json;
pub mod schema;
pub mod text;
pub mod writer;

// Re-export main functions
pub use json::render_json;
pub use schema::{FileReport, FunctionSummary, LockSummary, Report};
pub use text::{format_average, render_text};
pub use writer::create_output_file;
