//! Per-lock state machine computing operation counts and hold times.
//!
//! Each lock name has at most one pending record: set by a completed
//! acquire or try-acquire and cleared by the next completed release. The
//! point a lock counts as held is the exit timestamp of the operation that
//! took it, and hold time runs to the exit timestamp of the release.
//!
//! Sequencing anomalies are reported back to the caller. They are surfaced,
//! not corrected: a second acquire keeps the original record, a try-lock
//! from a different function leaves the record alone.

use super::function_stats::average;
use super::lock_classifier::LockOp;
use super::matcher::CallInterval;
use log::debug;
use std::collections::HashMap;

/// An acquire or try-acquire believed to be holding a lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRecord {
    pub lock_name: String,
    pub function_name: String,
    pub thread_id: u64,
    pub time_acquired: u64,
}

/// Counters and pending state for one lock name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockStat {
    pub num_acquire: u64,
    pub time_acquire: u64,
    pub num_trylock: u64,
    pub time_trylock: u64,
    pub num_release: u64,
    pub time_release: u64,
    /// Cumulative ticks between taking and releasing the lock
    pub time_held: u64,
    /// Releases that closed a pending record
    pub num_held: u64,
    pub pending: Option<LockRecord>,
}

impl LockStat {
    pub fn average_acquire(&self) -> Option<f64> {
        average(self.time_acquire, self.num_acquire)
    }

    pub fn average_trylock(&self) -> Option<f64> {
        average(self.time_trylock, self.num_trylock)
    }

    pub fn average_release(&self) -> Option<f64> {
        average(self.time_release, self.num_release)
    }

    pub fn average_held(&self) -> Option<f64> {
        average(self.time_held, self.num_held)
    }
}

/// A sequencing problem found while updating a lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockAnomaly {
    /// Acquire completed while another record was outstanding
    DoubleAcquire {
        outstanding: LockRecord,
        incoming: LockRecord,
    },
    /// Try-lock completed while a different function holds the record
    TryLockOwnerMismatch {
        outstanding: LockRecord,
        incoming: LockRecord,
    },
    /// Release completed with nothing outstanding
    ReleaseWithoutAcquire { function_name: String, thread_id: u64 },
}

/// Lock name → state, for one file
#[derive(Debug, Clone, Default)]
pub struct LockTracker {
    locks: HashMap<String, LockStat>,
}

impl LockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one completed lock operation
    ///
    /// `op` is the classification of `interval.function_name`; `NotLock`
    /// leaves the tracker untouched.
    pub fn record(&mut self, op: LockOp, lock_name: &str, interval: &CallInterval) -> Option<LockAnomaly> {
        if op == LockOp::NotLock {
            return None;
        }

        let stat = self.locks.entry(lock_name.to_string()).or_default();
        let time_acquired = interval.exit_timestamp;
        let incoming = || LockRecord {
            lock_name: lock_name.to_string(),
            function_name: interval.function_name.clone(),
            thread_id: interval.thread_id,
            time_acquired,
        };

        match op {
            LockOp::Acquire => {
                stat.num_acquire += 1;
                stat.time_acquire = stat.time_acquire.saturating_add(interval.duration_ticks);

                match &stat.pending {
                    Some(outstanding) => Some(LockAnomaly::DoubleAcquire {
                        outstanding: outstanding.clone(),
                        incoming: incoming(),
                    }),
                    None => {
                        stat.pending = Some(incoming());
                        None
                    }
                }
            }
            LockOp::TryLock => {
                stat.num_trylock += 1;
                stat.time_trylock = stat.time_trylock.saturating_add(interval.duration_ticks);

                match stat.pending.as_mut() {
                    Some(outstanding) if outstanding.function_name == interval.function_name => {
                        debug!(
                            "Retry of {} on '{}' moves hold start {} -> {}",
                            interval.function_name, lock_name, outstanding.time_acquired, time_acquired
                        );
                        outstanding.time_acquired = time_acquired;
                        None
                    }
                    Some(outstanding) => Some(LockAnomaly::TryLockOwnerMismatch {
                        outstanding: outstanding.clone(),
                        incoming: incoming(),
                    }),
                    None => {
                        stat.pending = Some(incoming());
                        None
                    }
                }
            }
            LockOp::Release => {
                stat.num_release += 1;
                stat.time_release = stat.time_release.saturating_add(interval.duration_ticks);

                match stat.pending.take() {
                    Some(outstanding) => {
                        let held = time_acquired.saturating_sub(outstanding.time_acquired);
                        stat.time_held = stat.time_held.saturating_add(held);
                        stat.num_held += 1;
                        None
                    }
                    None => Some(LockAnomaly::ReleaseWithoutAcquire {
                        function_name: interval.function_name.clone(),
                        thread_id: interval.thread_id,
                    }),
                }
            }
            LockOp::NotLock => None,
        }
    }

    pub fn get(&self, lock_name: &str) -> Option<&LockStat> {
        self.locks.get(lock_name)
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    pub fn into_inner(self) -> HashMap<String, LockStat> {
        self.locks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::lock_classifier::classify;

    fn interval(function: &str, thread: u64, entry: u64, exit: u64) -> CallInterval {
        CallInterval {
            function_name: function.to_string(),
            thread_id: thread,
            entry_timestamp: entry,
            exit_timestamp: exit,
            duration_ticks: exit - entry,
            lock_name: Some("m".to_string()),
        }
    }

    fn apply(tracker: &mut LockTracker, iv: CallInterval) -> Option<LockAnomaly> {
        tracker.record(classify(&iv.function_name), "m", &iv)
    }

    #[test]
    fn test_acquire_release_hold_time() {
        let mut tracker = LockTracker::new();
        assert!(apply(&mut tracker, interval("lock_acquire", 1, 10, 20)).is_none());
        assert!(apply(&mut tracker, interval("lock_release", 1, 100, 110)).is_none());

        let stat = tracker.get("m").unwrap();
        assert_eq!(stat.num_acquire, 1);
        assert_eq!(stat.time_acquire, 10);
        assert_eq!(stat.num_release, 1);
        assert_eq!(stat.time_release, 10);
        assert_eq!(stat.time_held, 90);
        assert!(stat.pending.is_none());
    }

    #[test]
    fn test_double_acquire_keeps_original() {
        let mut tracker = LockTracker::new();
        apply(&mut tracker, interval("lock_acquire", 1, 0, 5));
        let anomaly = apply(&mut tracker, interval("lock_acquire", 2, 10, 15));

        match anomaly {
            Some(LockAnomaly::DoubleAcquire { outstanding, incoming }) => {
                assert_eq!(outstanding.thread_id, 1);
                assert_eq!(incoming.thread_id, 2);
            }
            other => panic!("expected double acquire, got {:?}", other),
        }

        let stat = tracker.get("m").unwrap();
        assert_eq!(stat.num_acquire, 2);
        assert_eq!(stat.pending.as_ref().unwrap().time_acquired, 5);
    }

    #[test]
    fn test_trylock_retry_resets_hold_start() {
        let mut tracker = LockTracker::new();
        apply(&mut tracker, interval("spin_trylock", 1, 0, 5));
        apply(&mut tracker, interval("spin_trylock", 1, 20, 30));
        apply(&mut tracker, interval("spin_unlock", 1, 50, 60));

        let stat = tracker.get("m").unwrap();
        assert_eq!(stat.num_trylock, 2);
        assert_eq!(stat.time_trylock, 15);
        assert_eq!(stat.time_held, 30);
    }

    #[test]
    fn test_trylock_from_other_function_is_mismatch() {
        let mut tracker = LockTracker::new();
        apply(&mut tracker, interval("lock_acquire", 1, 0, 5));
        let anomaly = apply(&mut tracker, interval("spin_trylock", 1, 10, 12));
        assert!(matches!(anomaly, Some(LockAnomaly::TryLockOwnerMismatch { .. })));

        let stat = tracker.get("m").unwrap();
        assert_eq!(stat.pending.as_ref().unwrap().function_name, "lock_acquire");
        assert_eq!(stat.pending.as_ref().unwrap().time_acquired, 5);
    }

    #[test]
    fn test_release_without_acquire() {
        let mut tracker = LockTracker::new();
        let anomaly = apply(&mut tracker, interval("lock_release", 3, 0, 4));
        assert_eq!(
            anomaly,
            Some(LockAnomaly::ReleaseWithoutAcquire {
                function_name: "lock_release".to_string(),
                thread_id: 3,
            })
        );
        let stat = tracker.get("m").unwrap();
        assert_eq!(stat.num_release, 1);
        assert_eq!(stat.time_held, 0);
        assert_eq!(stat.average_held(), None);
    }

    #[test]
    fn test_not_lock_is_ignored() {
        let mut tracker = LockTracker::new();
        assert!(apply(&mut tracker, interval("evict", 1, 0, 4)).is_none());
        assert!(tracker.is_empty());
    }
}
