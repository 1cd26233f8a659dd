//! Reconcile entry/exit events into matched call intervals.
//!
//! Entries are pushed onto a stack. An exit pops until it finds an entry
//! with the same function name; every non-matching frame popped on the way
//! is discarded as a missing exit. If the stack runs dry first, the exit has
//! no matching entrance. Neither case stops processing.

use crate::parser::Event;
use log::trace;
use std::collections::HashMap;

/// How entry frames are grouped for matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackMode {
    /// One stack per thread id
    #[default]
    PerThread,
    /// A single stack for the whole file regardless of thread
    Global,
}

/// A matched entry/exit pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallInterval {
    pub function_name: String,
    /// Thread id of the exit record
    pub thread_id: u64,
    pub entry_timestamp: u64,
    pub exit_timestamp: u64,
    /// `exit_timestamp - entry_timestamp`, clamped to zero
    pub duration_ticks: u64,
    /// Lock identifier from the exit record, falling back to the entry record
    pub lock_name: Option<String>,
}

impl CallInterval {
    /// True when the exit was stamped before its entry
    pub fn is_regressed(&self) -> bool {
        self.exit_timestamp < self.entry_timestamp
    }
}

/// Result of presenting one exit event to the matcher
#[derive(Debug, Default)]
pub struct MatchOutcome {
    /// `None` when no entry with the same name was found
    pub interval: Option<CallInterval>,
    /// Frames popped and thrown away while searching, innermost first
    pub discarded: Vec<Event>,
}

/// Stack-based entry/exit reconciler for one file
#[derive(Debug, Default)]
pub struct CallStackMatcher {
    mode: StackMode,
    stacks: HashMap<u64, Vec<Event>>,
}

impl CallStackMatcher {
    pub fn new(mode: StackMode) -> Self {
        Self {
            mode,
            stacks: HashMap::new(),
        }
    }

    /// Push an entry event
    pub fn enter(&mut self, event: Event) {
        let key = self.stack_key(event.thread_id);
        self.stacks.entry(key).or_default().push(event);
    }

    /// Match an exit event against the pending entries
    pub fn exit(&mut self, exit: &Event) -> MatchOutcome {
        let key = self.stack_key(exit.thread_id);
        let mut outcome = MatchOutcome::default();

        let Some(stack) = self.stacks.get_mut(&key) else {
            return outcome;
        };

        while let Some(frame) = stack.pop() {
            if frame.function_name != exit.function_name {
                trace!(
                    "Discarding '{}' entered at {} while matching exit of '{}'",
                    frame.function_name,
                    frame.timestamp,
                    exit.function_name
                );
                outcome.discarded.push(frame);
                continue;
            }

            outcome.interval = Some(CallInterval {
                lock_name: exit.lock_name().or_else(|| frame.lock_name()),
                function_name: frame.function_name,
                thread_id: exit.thread_id,
                entry_timestamp: frame.timestamp,
                exit_timestamp: exit.timestamp,
                duration_ticks: exit.timestamp.saturating_sub(frame.timestamp),
            });
            break;
        }

        outcome
    }

    /// Total number of entries still waiting for an exit
    pub fn pending(&self) -> usize {
        self.stacks.values().map(Vec::len).sum()
    }

    /// Remove and return every entry still on a stack, oldest first
    pub fn drain_unclosed(&mut self) -> Vec<Event> {
        let mut unclosed: Vec<Event> = self.stacks.drain().flat_map(|(_, stack)| stack).collect();
        unclosed.sort_by_key(|e| (e.timestamp, e.thread_id));
        unclosed
    }

    fn stack_key(&self, thread_id: u64) -> u64 {
        match self.mode {
            StackMode::PerThread => thread_id,
            StackMode::Global => 0,
        }
    }
}
