use std::{
    env,
    fs::{self, File, OpenOptions},
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::PROGRAM_NAME;

pub const HISTORY_VERSION: u8 = 1;

pub const HISTORY_DISABLED_ENV: &str = "ATTIC_HISTORY";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub enum HistoryEvent {
    Triage(TriageEvent),
}

/// Summary of one completed triage run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TriageEvent {
    /// Schema version
    pub version: u8,

    /// Timestamp
    pub timestamp: DateTime<Utc>,

    /// Root that was scanned.
    pub source: String,

    /// Destination for relocated files, when relocation ran.
    pub destination: Option<String>,

    /// Files moved out of the source tree.
    pub relocated: u64,

    /// Directories removed after they became empty.
    pub pruned: u64,

    /// Number of per-item errors collected during the run.
    pub errors: usize,

    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl TriageEvent {
    pub fn new(
        source: String,
        destination: Option<String>,
        relocated: u64,
        pruned: u64,
        errors: usize,
        duration_ms: u64,
    ) -> Self {
        Self {
            version: HISTORY_VERSION,
            timestamp: Utc::now(),
            source,
            destination,
            relocated,
            pruned,
            errors,
            duration_ms,
        }
    }
}

/// Append-only JSONL store of past run summaries.
pub struct RunHistory {
    path: PathBuf,
}

pub fn state_dir() -> Option<PathBuf> {
    // Check XDG_STATE_HOME first (Linux)
    if let Ok(xdg_state) = env::var("XDG_STATE_HOME")
        && !xdg_state.is_empty()
    {
        return Some(PathBuf::from(xdg_state).join(PROGRAM_NAME));
    }

    // Fall back to dirs crate
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|p| p.join(PROGRAM_NAME))
}

pub fn history_log_path() -> Option<PathBuf> {
    state_dir().map(|d| d.join("runs.log"))
}

fn history_disabled() -> bool {
    match env::var(HISTORY_DISABLED_ENV) {
        Ok(val) => val == "0" || val.eq_ignore_ascii_case("false"),
        Err(_) => false,
    }
}

impl RunHistory {
    pub fn new() -> Option<Self> {
        if history_disabled() {
            return None;
        }

        let path = history_log_path()?;
        Some(Self { path })
    }

    /// Create a history store with a custom path (for testing).
    #[cfg(test)]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Best-effort: a history store that cannot be written never fails a run.
    pub fn log_run(&self, event: TriageEvent) {
        if let Err(e) = self.append_event(&HistoryEvent::Triage(event)) {
            debug!("Failed to log history event: {}", e);
        }
    }

    fn append_event(&self, event: &HistoryEvent) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut line = serde_json::to_string(event).map_err(io::Error::other)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.write_all(line.as_bytes())?;

        Ok(())
    }

    pub fn iter_events(&self) -> impl Iterator<Item = HistoryEvent> {
        self.read_events().into_iter().flatten()
    }

    fn read_events(&self) -> Option<Vec<HistoryEvent>> {
        let file = File::open(&self.path).ok()?;
        let reader = BufReader::new(file);
        let mut events = Vec::new();
        for line in reader.lines() {
            match line {
                Ok(line) => match serde_json::from_str(&line) {
                    Ok(ev) => events.push(ev),
                    Err(e) => debug!("Skipping malformed history line: {e}"),
                },
                Err(e) => {
                    debug!("Error reading history log: {e}");
                    break;
                }
            }
        }
        Some(events)
    }

    /// Most recent runs first.
    pub fn recent_runs(&self, limit: usize) -> Vec<TriageEvent> {
        let mut runs: Vec<TriageEvent> = self
            .iter_events()
            .map(|e| match e {
                HistoryEvent::Triage(t) => t,
            })
            .collect();

        runs.reverse();
        runs.truncate(limit);
        runs
    }

    pub fn count(&self) -> usize {
        self.iter_events().count()
    }

    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
