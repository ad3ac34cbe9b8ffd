use std::{fs, io, path::Path};

use attic_runtime::{ProgressSink, RunLog};

use crate::triage::CancelToken;

/// Deletes directories left without any entries, deepest first, so removing
/// children can make a parent newly eligible within the same pass.
///
/// A failing directory stops only its own branch; siblings are always still
/// visited. The root handed to [`prune`](Self::prune) is never deleted.
pub struct EmptyDirectoryPruner<'a> {
    pruned: u64,
    errors: Vec<String>,
    cancel: &'a CancelToken,
    log: &'a dyn RunLog,
    progress: &'a mut dyn ProgressSink,
}

impl<'a> EmptyDirectoryPruner<'a> {
    pub fn new(
        cancel: &'a CancelToken,
        log: &'a dyn RunLog,
        progress: &'a mut dyn ProgressSink,
    ) -> Self {
        Self {
            pruned: 0,
            errors: Vec::new(),
            cancel,
            log,
            progress,
        }
    }

    /// Prune below `root`, returning the deletion count and the per-item
    /// errors collected on the way.
    pub fn prune(mut self, root: &Path) -> (u64, Vec<String>) {
        match fs::read_dir(root) {
            Ok(entries) => self.visit_children(entries),
            Err(e) => self.errors.push(format!("{}: {e}", root.display())),
        }
        (self.pruned, self.errors)
    }

    fn visit_children(&mut self, entries: fs::ReadDir) {
        for entry in entries {
            if self.cancel.is_cancelled() {
                return;
            }

            let entry = match entry {
                Ok(en) => en,
                Err(e) => {
                    self.errors.push(format!("reading entry: {e}"));
                    continue;
                }
            };

            // file_type does not follow symlinks, so a linked directory is
            // neither descended into nor deleted.
            let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
            if is_dir {
                self.prune_dir(&entry.path());
            }
        }
    }

    fn prune_dir(&mut self, dir: &Path) {
        // Children first: deleting them can empty this directory.
        match fs::read_dir(dir) {
            Ok(entries) => self.visit_children(entries),
            Err(e) => {
                self.errors.push(format!("{}: {e}", dir.display()));
                self.progress.tick();
                return;
            }
        }

        self.progress.tick();

        if self.cancel.is_cancelled() {
            return;
        }

        match is_empty(dir) {
            Ok(true) => {
                // remove_dir refuses a non-empty directory; together with the
                // re-check above that is the no-data-loss guarantee.
                match fs::remove_dir(dir) {
                    Ok(()) => {
                        self.pruned += 1;
                        self.log.log(&dir.display().to_string());
                    }
                    Err(e) => self.errors.push(format!("{}: {e}", dir.display())),
                }
            }
            Ok(false) => {}
            Err(e) => self.errors.push(format!("{}: {e}", dir.display())),
        }
    }
}

fn is_empty(dir: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(dir)?.next().is_none())
}

#[cfg(test)]
#[path = "prune_tests.rs"]
mod tests;
