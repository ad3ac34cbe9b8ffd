use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

/// Settings for one triage run, captured once when the run starts. The
/// interactive layer edits its own copy between runs; nothing observes
/// changes mid-run.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Root of the tree to scan.
    pub source: PathBuf,
    /// Receives relocated files. Required when `relocate_files` is set.
    pub destination: Option<PathBuf>,
    /// Files last accessed at or before this unix time are stale.
    pub cutoff_secs: u64,
    /// Replace same-named destination files instead of disambiguating.
    pub overwrite: bool,
    pub relocate_files: bool,
    pub prune_empty_dirs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NoJobSelected,
    MissingSource(PathBuf),
    DestinationRequired,
    MissingDestination(PathBuf),
    SameSourceAndDestination,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoJobSelected => {
                write!(f, "nothing to do: enable relocation, pruning, or both")
            }
            ConfigError::MissingSource(p) => {
                write!(f, "source directory {} does not exist", p.display())
            }
            ConfigError::DestinationRequired => {
                write!(f, "relocation requires a destination directory")
            }
            ConfigError::MissingDestination(p) => {
                write!(f, "destination directory {} does not exist", p.display())
            }
            ConfigError::SameSourceAndDestination => {
                write!(f, "source and destination must not be the same directory")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl TriageConfig {
    /// Preconditions for starting a run. Checked before anything touches the
    /// file system; a violation leaves no side effects.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.relocate_files && !self.prune_empty_dirs {
            return Err(ConfigError::NoJobSelected);
        }

        if !self.source.is_dir() {
            return Err(ConfigError::MissingSource(self.source.clone()));
        }

        if self.relocate_files {
            let destination = match &self.destination {
                Some(d) => d,
                None => return Err(ConfigError::DestinationRequired),
            };

            if !destination.is_dir() {
                return Err(ConfigError::MissingDestination(destination.clone()));
            }

            if full_path(&self.source) == full_path(destination) {
                return Err(ConfigError::SameSourceAndDestination);
            }
        }

        Ok(())
    }
}

/// Normalized form for the equality check, so `/a/b` and `/a/./b` compare
/// equal. Falls back to the raw path when canonicalization fails.
fn full_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
