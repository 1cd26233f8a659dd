//! Human-readable summary tables.

use super::schema::{FileReport, FunctionSummary, LockSummary, Report};
use crate::utils::config::TICK_UNIT;

const RULE_WIDTH: usize = 96;
const NAME_WIDTH: usize = 44;

/// Render the whole report
///
/// Diagnostic messages are listed only when `show_diagnostics` is set;
/// counts by kind are always shown.
pub fn render_text(report: &Report, show_diagnostics: bool) -> String {
    let mut lines = Vec::new();

    for file in &report.files {
        render_file(&mut lines, file, show_diagnostics);
        lines.push(String::new());
    }

    lines.join("\n")
}

fn render_file(lines: &mut Vec<String>, file: &FileReport, show_diagnostics: bool) {
    lines.push(format!("SUMMARY FOR FILE {}", file.file));
    lines.push("=".repeat(RULE_WIDTH));

    if let Some(error) = &file.error {
        lines.push(format!("  {}", error));
        return;
    }

    lines.push(format!(
        "  {} lines, {} events",
        file.lines_read, file.events_read
    ));
    lines.push(String::new());

    if file.functions.is_empty() {
        lines.push("  No completed function calls.".to_string());
    } else {
        lines.push(format!(
            "  {:<w$} {:>10} {:>16} {:>16}",
            "Function",
            "Calls",
            format!("Total ({})", TICK_UNIT),
            format!("Avg ({})", TICK_UNIT),
            w = NAME_WIDTH
        ));
        lines.push(format!("  {}", "-".repeat(RULE_WIDTH - 2)));
        lines.extend(file.functions.iter().map(function_row));
    }

    if !file.locks.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "  {:<w$} {:>5} {:>5} {:>5} {:>9} {:>9} {:>9} {:>11}",
            "Lock",
            "Acq",
            "Try",
            "Rel",
            "Avg acq",
            "Avg try",
            "Avg rel",
            "Avg held",
            w = NAME_WIDTH - 10
        ));
        lines.push(format!("  {}", "-".repeat(RULE_WIDTH - 2)));
        lines.extend(file.locks.iter().map(lock_row));
    }

    if !file.diagnostic_counts.is_empty() {
        lines.push(String::new());
        let counts: Vec<String> = file
            .diagnostic_counts
            .iter()
            .map(|(kind, count)| format!("{}={}", kind, count))
            .collect();
        lines.push(format!("  Diagnostics: {}", counts.join(", ")));

        if show_diagnostics {
            lines.extend(file.diagnostics.iter().map(|d| format!("    {}", d)));
        }
    }
}

fn function_row(function: &FunctionSummary) -> String {
    format!(
        "  {:<w$} {:>10} {:>16} {:>16}",
        truncate(&function.name, NAME_WIDTH),
        function.call_count,
        function.total_duration_ticks,
        format_average(function.average_duration_ticks),
        w = NAME_WIDTH
    )
}

fn lock_row(lock: &LockSummary) -> String {
    let held = if lock.held_at_end {
        format!("{}*", format_average(lock.average_held_ticks))
    } else {
        format_average(lock.average_held_ticks)
    };

    format!(
        "  {:<w$} {:>5} {:>5} {:>5} {:>9} {:>9} {:>9} {:>11}",
        truncate(&lock.name, NAME_WIDTH - 10),
        lock.num_acquire,
        lock.num_trylock,
        lock.num_release,
        format_average(lock.average_acquire_ticks),
        format_average(lock.average_trylock_ticks),
        format_average(lock.average_release_ticks),
        held,
        w = NAME_WIDTH - 10
    )
}

/// `n/a` for undefined averages, otherwise one decimal place
pub fn format_average(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}", v),
        None => "n/a".to_string(),
    }
}

// Keep the tail of long names; it usually carries the distinguishing part
fn truncate(name: &str, width: usize) -> String {
    let count = name.chars().count();
    if count <= width {
        name.to_string()
    } else {
        let tail: String = name.chars().skip(count - (width - 3)).collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_average() {
        assert_eq!(format_average(None), "n/a");
        assert_eq!(format_average(Some(150.0)), "150.0");
        assert_eq!(format_average(Some(2.0 / 3.0)), "0.7");
    }

    #[test]
    fn test_truncate_keeps_tail() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "...hijkl");
    }
}
