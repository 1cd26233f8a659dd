use crate::utils::config::SCHEMA_VERSION;

/// Display version information
pub fn display_version() {
    println!("Trace Timing v{}", env!("CARGO_PKG_VERSION"));
    println!("Summary Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Function timing and lock-contention analysis for instrumented timing logs.");
}
