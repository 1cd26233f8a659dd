use pretty_assertions::assert_eq;
use trace_timing::aggregator::{
    analyze_lines, classify, looks_like_lock, AnalysisOptions, Diagnostic, DiagnosticKind, LockOp,
    LockRecord, LockStat,
};

fn analyze(lines: &[&str]) -> trace_timing::aggregator::FileAnalysis {
    analyze_lines(lines, AnalysisOptions::default())
}

#[test]
fn test_classify_precedence() {
    assert_eq!(classify("acquire_and_release"), LockOp::Release);
    assert_eq!(classify("trylock_acquire"), LockOp::TryLock);
    assert_eq!(classify("unlock"), LockOp::Release);
    assert_eq!(classify("release"), LockOp::Release);
    assert_eq!(classify("lock"), LockOp::Acquire);
    assert_eq!(classify("acquire"), LockOp::Acquire);
    assert_eq!(classify("read_page"), LockOp::NotLock);
    assert!(!looks_like_lock("read_page"));
    assert!(looks_like_lock("__wt_readlock"));
}

#[test]
fn test_acquire_release_pair() {
    let analysis = analyze(&[
        "--> lock_acquire 1 10 myMutex",
        "<-- lock_acquire 1 20",
        "--> lock_release 1 100 myMutex",
        "<-- lock_release 1 110",
    ]);

    assert_eq!(
        analysis.locks["myMutex"],
        LockStat {
            num_acquire: 1,
            time_acquire: 10,
            num_release: 1,
            time_release: 10,
            time_held: 90,
            num_held: 1,
            ..Default::default()
        }
    );
    assert!(analysis.diagnostics.is_empty());
}

#[test]
fn test_consecutive_pairs_are_independent() {
    let analysis = analyze(&[
        "--> lock_acquire 1 0 m",
        "<-- lock_acquire 1 10",
        "--> lock_release 1 30 m",
        "<-- lock_release 1 40",
        "--> lock_acquire 1 100 m",
        "<-- lock_acquire 1 105",
        "--> lock_release 1 200 m",
        "<-- lock_release 1 205",
    ]);

    let stat = &analysis.locks["m"];
    assert_eq!(stat.time_held, 30 + 100);
    assert_eq!(stat.num_held, 2);
    assert_eq!(stat.average_held(), Some(65.0));
    assert!(stat.pending.is_none());
}

#[test]
fn test_lock_names_are_multi_word_and_separate() {
    let analysis = analyze(&[
        "--> __wt_spin_lock 1 0 schema lock",
        "<-- __wt_spin_lock 1 5",
        "--> __wt_spin_lock 2 6 table lock",
        "<-- __wt_spin_lock 2 8",
        "--> __wt_spin_unlock 1 20 schema lock",
        "<-- __wt_spin_unlock 1 21",
    ]);

    assert_eq!(analysis.locks.len(), 2);
    assert_eq!(analysis.locks["schema lock"].time_held, 16);
    assert_eq!(
        analysis.locks["table lock"].pending,
        Some(LockRecord {
            lock_name: "table lock".to_string(),
            function_name: "__wt_spin_lock".to_string(),
            thread_id: 2,
            time_acquired: 8,
        })
    );
    // Lock functions are ordinary functions too
    assert_eq!(analysis.functions["__wt_spin_lock"].call_count, 2);
}

#[test]
fn test_double_acquire_reports_both_and_keeps_first() {
    let analysis = analyze(&[
        "--> lock_acquire 1 0 m",
        "<-- lock_acquire 1 10",
        "--> lock_acquire 2 20 m",
        "<-- lock_acquire 2 25",
        "--> lock_release 1 50 m",
        "<-- lock_release 1 60",
    ]);

    match &analysis.diagnostics[..] {
        [Diagnostic::DoubleAcquire { line, lock, outstanding, incoming }] => {
            assert_eq!(*line, 4);
            assert_eq!(lock, "m");
            assert_eq!(outstanding.time_acquired, 10);
            assert_eq!(incoming.time_acquired, 25);
            assert_eq!(incoming.thread_id, 2);
        }
        other => panic!("unexpected diagnostics: {:?}", other),
    }

    let stat = &analysis.locks["m"];
    assert_eq!(stat.num_acquire, 2);
    assert_eq!(stat.time_acquire, 15);
    // Held from the first acquire's exit
    assert_eq!(stat.time_held, 50);
}

#[test]
fn test_trylock_retry_then_release() {
    let analysis = analyze(&[
        "--> spin_trylock 1 0 m",
        "<-- spin_trylock 1 2",
        "--> spin_trylock 1 10 m",
        "<-- spin_trylock 1 12",
        "--> spin_unlock 1 40 m",
        "<-- spin_unlock 1 42",
    ]);

    let stat = &analysis.locks["m"];
    assert_eq!(stat.num_trylock, 2);
    assert_eq!(stat.time_trylock, 4);
    assert_eq!(stat.average_trylock(), Some(2.0));
    assert_eq!(stat.time_held, 30);
    assert!(analysis.diagnostics.is_empty());
}

#[test]
fn test_trylock_owner_mismatch_leaves_record() {
    let analysis = analyze(&[
        "--> lock_acquire 1 0 m",
        "<-- lock_acquire 1 10",
        "--> spin_trylock 2 11 m",
        "<-- spin_trylock 2 13",
    ]);

    assert_eq!(analysis.count(DiagnosticKind::TryLockOwnerMismatch), 1);
    let pending = analysis.locks["m"].pending.as_ref().unwrap();
    assert_eq!(pending.function_name, "lock_acquire");
    assert_eq!(pending.time_acquired, 10);
    assert_eq!(analysis.locks["m"].num_trylock, 1);
}

#[test]
fn test_release_without_acquire() {
    let analysis = analyze(&["--> lock_release 1 0 m", "<-- lock_release 1 3"]);

    assert_eq!(
        analysis.diagnostics,
        vec![Diagnostic::ReleaseWithoutAcquire {
            line: 2,
            lock: "m".to_string(),
            function: "lock_release".to_string(),
            thread_id: 1,
        }]
    );
    let stat = &analysis.locks["m"];
    assert_eq!(stat.num_release, 1);
    assert_eq!(stat.average_release(), Some(3.0));
    assert_eq!(stat.average_held(), None);
    assert_eq!(stat.average_acquire(), None);
}

#[test]
fn test_exit_lock_name_overrides_entry() {
    let analysis = analyze(&["--> lock_acquire 1 0 entry_name", "<-- lock_acquire 1 4 exit_name"]);

    assert!(analysis.locks.contains_key("exit_name"));
    assert!(!analysis.locks.contains_key("entry_name"));
}

#[test]
fn test_anomalies_do_not_stop_later_locks() {
    let analysis = analyze(&[
        "--> lock_release 1 0 a",
        "<-- lock_release 1 1",
        "--> lock_acquire 1 2 b",
        "<-- lock_acquire 1 3",
        "--> lock_release 1 9 b",
        "<-- lock_release 1 10",
    ]);

    assert_eq!(analysis.count(DiagnosticKind::ReleaseWithoutAcquire), 1);
    assert_eq!(analysis.locks["b"].time_held, 7);
}
