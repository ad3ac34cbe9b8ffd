pub const SECS_PER_WEEK: u64 = 7 * 24 * 60 * 60;

/// A file is stale when it was last accessed at or before the cutoff.
pub fn is_stale(atime_secs: u64, cutoff_secs: u64) -> bool {
    atime_secs <= cutoff_secs
}

/// Cutoff for a week-based threshold: `now - weeks * 7 days`, saturating at
/// the epoch. Recomputed by the caller when the week count changes, never
/// during a run.
pub fn cutoff_from_weeks(now_secs: u64, weeks: u32) -> u64 {
    now_secs.saturating_sub(u64::from(weeks) * SECS_PER_WEEK)
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
