//! Rewrite a timing log into Perfume's comma-separated input.
//!
//! Output, one line per record:
//! - `thread, function enter, time`
//! - `thread, function exit, time`
//! - `thread, [event name], time`

use crate::output::create_output_file;
use crate::parser::{parse_record, LogLine};
use crate::utils::config::PERFUME_EXTENSION;
use crate::utils::error::ConvertError;
use log::{info, warn};
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Counters from one conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub lines_read: usize,
    pub records_written: usize,
    pub malformed_lines: usize,
}

/// Format one parsed record, `None` for ignored lines
pub fn perfume_line(record: &LogLine) -> Option<String> {
    match record {
        LogLine::Event(event) => Some(format!(
            "{}, {} {}, {}",
            event.thread_id, event.function_name, event.kind, event.timestamp
        )),
        LogLine::Marker(marker) => Some(format!(
            "{}, {}, {}",
            marker.thread_id, marker.name, marker.timestamp
        )),
        LogLine::Ignored => None,
    }
}

/// Convert every line of `reader`, writing records to `writer`
pub fn convert_reader<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    source: &str,
) -> io::Result<ConversionStats> {
    let mut stats = ConversionStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        stats.lines_read += 1;

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);

        match parse_record(line) {
            Ok(record) => {
                if let Some(out) = perfume_line(&record) {
                    writeln!(writer, "{}", out)?;
                    stats.records_written += 1;
                }
            }
            Err(reason) => {
                warn!("{}: line {}: could not parse '{}': {}", source, stats.lines_read, line, reason);
                stats.malformed_lines += 1;
            }
        }
    }

    writer.flush()?;
    Ok(stats)
}

/// Where the converted copy of `input` goes
///
/// Next to the input by default, or inside `output_dir` under the same
/// file name. Either way `.perfume` is appended to the full name.
pub fn perfume_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let mut name: OsString = input.file_name().map(OsString::from).unwrap_or_default();
    name.push(".");
    name.push(PERFUME_EXTENSION);

    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// Convert one file on disk
///
/// # Errors
/// * `ConvertError::InputOpenFailed` - input cannot be opened
/// * `ConvertError::OutputFailed` - output cannot be created
/// * `ConvertError::Io` - read or write failed midway
pub fn convert_file(input: &Path, output: &Path) -> Result<ConversionStats, ConvertError> {
    info!("Converting {} -> {}", input.display(), output.display());

    let file = File::open(input).map_err(|source| ConvertError::InputOpenFailed {
        path: input.to_path_buf(),
        source,
    })?;
    let writer = create_output_file(output).map_err(|source| ConvertError::OutputFailed {
        path: output.to_path_buf(),
        source,
    })?;

    convert_reader(BufReader::new(file), writer, &input.display().to_string()).map_err(|source| {
        ConvertError::Io {
            path: input.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_convert_reader_formats_each_shape() {
        let input = "--> foo 1 100\n* [checkpoint start] 2 150\n<-- foo 1 200 lock_a\nnoise\n";
        let mut out = Vec::new();

        let stats = convert_reader(input.as_bytes(), &mut out, "mem").unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1, foo enter, 100\n2, [checkpoint start], 150\n1, foo exit, 200\n"
        );
        assert_eq!(
            stats,
            ConversionStats {
                lines_read: 4,
                records_written: 3,
                malformed_lines: 0,
            }
        );
    }

    #[test]
    fn test_convert_reader_counts_malformed() {
        let input = "--> foo x 100\n* unbracketed 1 2\n--> bar 1 5\n";
        let mut out = Vec::new();

        let stats = convert_reader(input.as_bytes(), &mut out, "mem").unwrap();

        assert_eq!(stats.malformed_lines, 2);
        assert_eq!(stats.records_written, 1);
    }

    #[test]
    fn test_perfume_path() {
        assert_eq!(
            perfume_path(Path::new("logs/run.log"), None),
            PathBuf::from("logs/run.log.perfume")
        );
        assert_eq!(
            perfume_path(Path::new("logs/run.log"), Some(Path::new("out"))),
            PathBuf::from("out/run.log.perfume")
        );
    }
}
