//! Log format conversion.
//!
//! Turns timing logs into input for the Perfume performance-model
//! inference tool.

pub mod perfume;

pub use perfume::{convert_file, convert_reader, perfume_line, perfume_path, ConversionStats};
