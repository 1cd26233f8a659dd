//! JSON rendering of the summary.

use super::schema::Report;
use crate::utils::error::OutputError;

/// Render the report as pretty-printed JSON
///
/// # Errors
/// * `OutputError::SerializationFailed` - JSON serialization error
pub fn render_json(report: &Report) -> Result<String, OutputError> {
    serde_json::to_string_pretty(report).map_err(OutputError::SerializationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{analyze_lines, AnalysisOptions};
    use crate::output::schema::FileReport;

    #[test]
    fn test_undefined_average_is_null() {
        let analysis = analyze_lines(
            ["--> lock_release 1 0 m", "<-- lock_release 1 5"],
            AnalysisOptions::default(),
        );
        let report = Report::new("per-thread", vec![FileReport::from_analysis("t.log", &analysis)]);

        let value: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();
        let lock = &value["files"][0]["locks"][0];
        assert_eq!(lock["name"], "m");
        assert!(lock["average_acquire_ticks"].is_null());
        assert_eq!(lock["average_release_ticks"], 5.0);
        assert_eq!(value["files"][0]["diagnostic_counts"]["release_without_acquire"], 1);
        assert!(value["files"][0].get("error").is_none());
    }
}
