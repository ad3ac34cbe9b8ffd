use super::*;
use serial_test::serial;
use tempfile::tempdir;

fn temp_store() -> (RunHistory, tempfile::TempDir) {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("runs.log");
    let store = RunHistory::with_path(path);
    (store, dir)
}

fn sample_event(source: &str, relocated: u64) -> TriageEvent {
    TriageEvent::new(
        source.to_string(),
        Some("/var/attic".to_string()),
        relocated,
        3,
        1,
        250,
    )
}

#[test]
fn triage_event_new_sets_fields() {
    let before = Utc::now();
    let ev = TriageEvent::new("/data".into(), None, 7, 2, 0, 1200);
    let after = Utc::now();

    assert_eq!(ev.version, HISTORY_VERSION);
    assert_eq!(ev.source, "/data");
    assert_eq!(ev.destination, None);
    assert_eq!(ev.relocated, 7);
    assert_eq!(ev.pruned, 2);
    assert_eq!(ev.errors, 0);
    assert_eq!(ev.duration_ms, 1200);

    // Timestamp should be between before and after (up to clock drift).
    assert!(ev.timestamp >= before && ev.timestamp <= after);
}

#[test]
fn log_and_iter_round_trip_single_event() {
    let (store, _dir) = temp_store();

    let ev = sample_event("/home/u/stuff", 5);
    store.log_run(ev.clone());

    let events: Vec<HistoryEvent> = store.iter_events().collect();
    assert_eq!(events.len(), 1);

    match &events[0] {
        HistoryEvent::Triage(t) => {
            assert_eq!(t.source, ev.source);
            assert_eq!(t.destination, ev.destination);
            assert_eq!(t.relocated, ev.relocated);
            assert_eq!(t.pruned, ev.pruned);
            assert_eq!(t.version, HISTORY_VERSION);
        }
    }
}

#[test]
fn iter_events_empty_when_file_missing() {
    let (store, _dir) = temp_store();
    assert_eq!(store.count(), 0);
    assert_eq!(store.iter_events().count(), 0);
}

#[test]
fn recent_runs_returns_newest_first_and_respects_limit() {
    let (store, _dir) = temp_store();

    store.log_run(sample_event("/a", 1));
    store.log_run(sample_event("/b", 2));
    store.log_run(sample_event("/c", 3));

    let recent = store.recent_runs(2);
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].source, "/c");
    assert_eq!(recent[1].source, "/b");
}

#[test]
fn clear_removes_file_and_is_idempotent() {
    let (store, _dir) = temp_store();
    let path = store.path().to_path_buf();

    // Ensure file exists.
    store.log_run(sample_event("/a", 1));
    assert!(path.exists());

    store.clear().expect("clear should succeed");
    assert!(!path.exists());

    // Second clear should still succeed and keep file absent
    store.clear().expect("clear should be idempotent");
    assert!(!path.exists());
}

#[test]
fn malformed_lines_are_skipped() {
    use std::io::Write as _;

    let (store, _dir) = temp_store();
    let path = store.path().to_path_buf();

    // Write a malformed line manually.
    {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .expect("open history file for malformed write");
        writeln!(file, "this is not json").unwrap();
    }

    let valid = sample_event("/ok", 1);
    store.log_run(valid.clone());

    // Expect only the valid line to survive
    let events: Vec<HistoryEvent> = store.iter_events().collect();
    assert_eq!(events.len(), 1);

    match &events[0] {
        HistoryEvent::Triage(t) => {
            assert_eq!(t.source, valid.source);
            assert_eq!(t.relocated, valid.relocated);
        }
    }
}

#[test]
#[serial]
fn new_respects_history_disabled_env_zero() {
    unsafe { std::env::remove_var(HISTORY_DISABLED_ENV) };
    assert!(
        RunHistory::new().is_some(),
        "history should be enabled by default"
    );

    unsafe { std::env::set_var(HISTORY_DISABLED_ENV, "0") };
    assert!(
        RunHistory::new().is_none(),
        "history should be disabled when env is 0"
    );
    unsafe { std::env::remove_var(HISTORY_DISABLED_ENV) };
}

#[test]
#[serial]
fn new_respects_history_disabled_env_false() {
    unsafe { std::env::set_var(HISTORY_DISABLED_ENV, "false") };
    assert!(
        RunHistory::new().is_none(),
        "history should be disabled when env is false"
    );

    unsafe { std::env::set_var(HISTORY_DISABLED_ENV, "TRUE") };
    assert!(RunHistory::new().is_some());
    unsafe { std::env::remove_var(HISTORY_DISABLED_ENV) };
}
