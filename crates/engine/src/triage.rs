use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use chrono::{Local, TimeZone};
use log::debug;

use attic_fs::{DirWalker, FileWalker};
use attic_runtime::{ProgressSink, RunLog};

use crate::{
    classify::is_stale,
    config::{ConfigError, TriageConfig},
    prune::EmptyDirectoryPruner,
    relocate::FileRelocator,
};

/// Cooperative cancellation flag, checked between items only so no file is
/// ever left half-copied.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// The shared flag itself, e.g. for signal-handler registration.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    CollectingInfo,
    Processing,
    Done,
    FailedToStart,
}

/// Outcome of one run. Per-item errors are collected, never thrown; no
/// single failure aborts the run.
#[derive(Debug, Default)]
pub struct RunResult {
    pub files_seen: u64,
    pub dirs_seen: u64,
    pub relocated: u64,
    pub pruned: u64,
    pub cancelled: bool,
    pub errors: Vec<String>,
}

/// One complete triage pipeline: validate, count, relocate, prune,
/// summarize. Strictly sequential; the caller supplies the background
/// thread and marshals sink calls wherever they need to go.
pub struct TriageRun {
    config: TriageConfig,
    state: RunState,
    cancel: CancelToken,
}

impl TriageRun {
    pub fn new(config: TriageConfig) -> Self {
        Self {
            config,
            state: RunState::Idle,
            cancel: CancelToken::new(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Counting fully finishes before relocation starts because the progress
    /// total depends on it. Once `Processing` is entered, `Done` is always
    /// reached; item failures land in the result's error list.
    pub fn execute(
        &mut self,
        log: &dyn RunLog,
        progress: &mut dyn ProgressSink,
    ) -> Result<RunResult, ConfigError> {
        if let Err(e) = self.config.validate() {
            self.state = RunState::FailedToStart;
            return Err(e);
        }

        self.state = RunState::CollectingInfo;
        debug!("collecting counts under {:?}", self.config.source);

        let mut result = RunResult::default();
        let mut do_files = self.config.relocate_files;
        let mut do_dirs = self.config.prune_empty_dirs;
        let mut total = 0u64;

        // The counting pass only sizes the progress indicator; it mutates
        // nothing. A root that cannot be enumerated downgrades that job to a
        // no-op while the other job still runs.
        if do_files {
            match FileWalker::new(&self.config.source) {
                Ok(walker) => {
                    result.files_seen = walker.count() as u64;
                    total += result.files_seen;
                }
                Err(e) => {
                    let msg = format!("{}: {e}", self.config.source.display());
                    log.log(&msg);
                    result.errors.push(msg);
                    do_files = false;
                }
            }
        }

        if do_dirs {
            match DirWalker::new(&self.config.source) {
                Ok(walker) => {
                    result.dirs_seen = walker.count() as u64;
                    total += result.dirs_seen;
                }
                Err(e) => {
                    let msg = format!("{}: {e}", self.config.source.display());
                    log.log(&msg);
                    result.errors.push(msg);
                    do_dirs = false;
                }
            }
        }

        progress.begin(total);

        self.state = RunState::Processing;
        debug!(
            "processing: relocate={do_files} prune={do_dirs} cutoff={}",
            self.config.cutoff_secs
        );

        if do_files {
            self.relocate_files(log, progress, &mut result);
        }

        if do_dirs && !self.cancel.is_cancelled() {
            self.prune_directories(log, progress, &mut result);
        }

        result.cancelled = self.cancel.is_cancelled();
        self.state = RunState::Done;

        if result.cancelled {
            log.log("Run cancelled; remaining items were left untouched");
        }

        if !result.errors.is_empty() {
            log.log("");
            log.log("Errors:");
            for err in &result.errors {
                log.log(err);
            }
        }

        Ok(result)
    }

    fn relocate_files(
        &self,
        log: &dyn RunLog,
        progress: &mut dyn ProgressSink,
        result: &mut RunResult,
    ) {
        // validate() guarantees a destination when relocation is enabled.
        let Some(destination) = self.config.destination.as_ref() else {
            return;
        };

        log.log(&format!(
            "Files under {}: {}",
            self.config.source.display(),
            result.files_seen
        ));
        log.log("Path \t Last access");

        let walker = match FileWalker::new(&self.config.source) {
            Ok(w) => w,
            Err(e) => {
                let msg = format!("{}: {e}", self.config.source.display());
                log.log(&msg);
                result.errors.push(msg);
                return;
            }
        };

        let relocator = FileRelocator::new(destination, self.config.overwrite);
        for record in walker {
            if self.cancel.is_cancelled() {
                break;
            }

            if is_stale(record.atime_secs, self.config.cutoff_secs) {
                log.log(&format!(
                    "{} \t {}",
                    record.path.display(),
                    format_atime(record.atime_secs)
                ));
                match relocator.relocate(&record) {
                    Ok(_) => result.relocated += 1,
                    Err(e) => result.errors.push(format!("{}: {e}", record.path.display())),
                }
            }

            progress.tick();
        }

        log.log(&format!("Files relocated: {}", result.relocated));
    }

    fn prune_directories(
        &self,
        log: &dyn RunLog,
        progress: &mut dyn ProgressSink,
        result: &mut RunResult,
    ) {
        log.log(&format!(
            "Directories under {}: {}",
            self.config.source.display(),
            result.dirs_seen
        ));

        let pruner = EmptyDirectoryPruner::new(&self.cancel, log, progress);
        let (pruned, errors) = pruner.prune(&self.config.source);
        result.pruned = pruned;
        result.errors.extend(errors);

        log.log(&format!("Directories removed: {}", result.pruned));
    }
}

fn format_atime(atime_secs: u64) -> String {
    match Local.timestamp_opt(atime_secs as i64, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => atime_secs.to_string(),
    }
}

#[cfg(test)]
#[path = "triage_tests.rs"]
mod tests;
