use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::{DateTime, Local};
use log::warn;

use crate::config::run_log_file_name;

/// Destination for the human-readable lines a triage run emits: phase
/// headers, per-item lines, and the final summary. A sink must never fail
/// the run; one that cannot write degrades to the diagnostic logger.
pub trait RunLog {
    fn log(&self, message: &str);
}

/// Receives the total item count once, then one tick per processed item
/// (file or directory) during the active phase.
pub trait ProgressSink {
    fn begin(&mut self, total: u64);
    fn tick(&mut self);
}

/// Interactive fallback sink.
pub struct StderrLog;

impl RunLog for StderrLog {
    fn log(&self, message: &str) {
        eprintln!("{message}");
    }
}

#[derive(Default)]
pub struct NullLog;

impl RunLog for NullLog {
    fn log(&self, _message: &str) {}
}

#[derive(Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn begin(&mut self, _total: u64) {}
    fn tick(&mut self) {}
}

/// Per-run log file created in `dir`, named from the run's start time.
pub struct RunLogFile {
    path: PathBuf,
    file: Mutex<File>,
}

impl RunLogFile {
    pub fn create(dir: &Path, started: DateTime<Local>) -> io::Result<Self> {
        let path = dir.join(run_log_file_name(started));
        let file = File::create(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RunLog for RunLogFile {
    fn log(&self, message: &str) {
        let mut file = match self.file.lock() {
            Ok(f) => f,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(file, "{message}") {
            warn!("failed to write run log {}: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
