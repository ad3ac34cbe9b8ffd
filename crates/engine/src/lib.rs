mod classify;
mod config;
mod prune;
mod relocate;
mod triage;

pub use classify::{SECS_PER_WEEK, cutoff_from_weeks, is_stale};
pub use config::{ConfigError, TriageConfig};
pub use prune::EmptyDirectoryPruner;
pub use relocate::FileRelocator;
pub use triage::{CancelToken, RunResult, RunState, TriageRun};
