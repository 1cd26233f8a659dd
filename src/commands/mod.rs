//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyze;
pub mod convert;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use analyze::{build_report, execute_analyze, validate_args};
pub use convert::{execute_convert, ConvertedFile};
pub use models::{AnalyzeArgs, ConvertArgs, OutputFormat};
pub use utils::display_version;
