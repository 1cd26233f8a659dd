//! Per-function call counts and cumulative running time.

use std::collections::HashMap;

/// Accumulated timing for one function name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunctionStat {
    pub call_count: u64,
    pub total_duration_ticks: u64,
}

impl FunctionStat {
    /// Mean duration per call, `None` before the first call
    pub fn average_duration(&self) -> Option<f64> {
        average(self.total_duration_ticks, self.call_count)
    }
}

/// Function name → accumulated timing
///
/// Entries are created on the first matched call and never removed.
#[derive(Debug, Clone, Default)]
pub struct FunctionStats {
    stats: HashMap<String, FunctionStat>,
}

impl FunctionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one completed call
    pub fn record(&mut self, function_name: &str, duration_ticks: u64) {
        let stat = self.stats.entry(function_name.to_string()).or_default();
        stat.call_count += 1;
        stat.total_duration_ticks = stat.total_duration_ticks.saturating_add(duration_ticks);
    }

    pub fn get(&self, function_name: &str) -> Option<&FunctionStat> {
        self.stats.get(function_name)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn into_inner(self) -> HashMap<String, FunctionStat> {
        self.stats
    }
}

/// Divide a tick total by a count, `None` when the count is zero
pub(crate) fn average(total: u64, count: u64) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(total as f64 / count as f64)
    }
}
