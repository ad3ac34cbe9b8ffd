use chrono::{DateTime, Local};

pub const PROGRAM_NAME: &str = "attic";
pub const PROGRAM_LOG_LEVEL: &str = "ATTIC_LOG_LEVEL";

/// Name of the per-run log file written to the working directory,
/// e.g. `24-03-07_godz_14-05-09.txt` for a run started 2024-03-07 14:05:09.
pub fn run_log_file_name(started: DateTime<Local>) -> String {
    format!(
        "{}_godz_{}.txt",
        started.format("%y-%m-%d"),
        started.format("%H-%M-%S")
    )
}
