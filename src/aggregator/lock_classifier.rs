//! Name-based recognition of lock operations.
//!
//! Function names are matched by substring. The categories overlap
//! (`"lock"` occurs inside both `"trylock"` and `"unlock"`), so the checks
//! run in a fixed order: release, then try-lock, then acquire.

use crate::utils::config::{ACQUIRE_PATTERNS, RELEASE_PATTERNS, TRYLOCK_PATTERNS};

/// Lock operation a function performs, judged by its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockOp {
    Acquire,
    TryLock,
    Release,
    NotLock,
}

/// Classify a function name
pub fn classify(function_name: &str) -> LockOp {
    let contains_any = |patterns: &[&str]| patterns.iter().any(|p| function_name.contains(p));

    if contains_any(RELEASE_PATTERNS) {
        LockOp::Release
    } else if contains_any(TRYLOCK_PATTERNS) {
        LockOp::TryLock
    } else if contains_any(ACQUIRE_PATTERNS) {
        LockOp::Acquire
    } else {
        LockOp::NotLock
    }
}

/// True if the name classifies as any lock operation
pub fn looks_like_lock(function_name: &str) -> bool {
    classify(function_name) != LockOp::NotLock
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names() {
        assert_eq!(classify("__wt_spin_lock"), LockOp::Acquire);
        assert_eq!(classify("lock_acquire"), LockOp::Acquire);
        assert_eq!(classify("__wt_spin_unlock"), LockOp::Release);
        assert_eq!(classify("lock_release"), LockOp::Release);
        assert_eq!(classify("__wt_spin_trylock"), LockOp::TryLock);
        assert_eq!(classify("__wt_btree_open"), LockOp::NotLock);
    }

    #[test]
    fn test_release_beats_everything() {
        assert_eq!(classify("acquire_then_release"), LockOp::Release);
        assert_eq!(classify("trylock_or_unlock"), LockOp::Release);
    }

    #[test]
    fn test_trylock_beats_acquire() {
        assert_eq!(classify("acquire_trylock"), LockOp::TryLock);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        // "Unlock" does not contain "unlock", but it does contain "lock"
        assert_eq!(classify("SpinUnlock"), LockOp::Acquire);
        assert_eq!(classify("ACQUIRE"), LockOp::NotLock);
    }

    #[test]
    fn test_looks_like_lock() {
        assert!(looks_like_lock("rwlock"));
        assert!(!looks_like_lock("evict_page"));
    }
}
