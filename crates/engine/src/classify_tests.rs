use super::*;

#[test]
fn boundary_access_time_is_stale() {
    // The cutoff itself is inclusive.
    assert!(is_stale(1_000, 1_000));
    assert!(is_stale(999, 1_000));
    assert!(!is_stale(1_001, 1_000));
}

#[test]
fn epoch_access_time_is_always_stale() {
    // Unreadable access times collapse to 0 in the walker.
    assert!(is_stale(0, 1));
}

#[test]
fn cutoff_from_weeks_subtracts_whole_weeks() {
    let now = 100 * SECS_PER_WEEK;
    assert_eq!(cutoff_from_weeks(now, 0), now);
    assert_eq!(cutoff_from_weeks(now, 1), 99 * SECS_PER_WEEK);
    assert_eq!(cutoff_from_weeks(now, 4), 96 * SECS_PER_WEEK);
}

#[test]
fn cutoff_from_weeks_saturates_at_epoch() {
    assert_eq!(cutoff_from_weeks(SECS_PER_WEEK, 2), 0);
}
