use std::{
    collections::VecDeque,
    fs::{self, ReadDir},
    io,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use log::warn;

use crate::record::FileRecord;

/// Streaming depth-bounded walk over every regular file under a root.
///
/// The triage passes are deliberately single-threaded: relocation and
/// pruning mutate the tree they walk, so only one directory handle is open
/// at a time and subdirectories wait in a queue instead of being farmed out
/// to workers. Construction fails only when the root itself cannot be read;
/// anything below the root that fails is logged and skipped.
pub struct FileWalker {
    pending: VecDeque<PathBuf>,
    current: Option<ReadDir>,
}

impl FileWalker {
    pub fn new(root: &Path) -> io::Result<Self> {
        let rd = fs::read_dir(root)?;
        Ok(Self {
            pending: VecDeque::new(),
            current: Some(rd),
        })
    }

    fn inspect_entry(&mut self, entry: &fs::DirEntry) -> io::Result<Option<FileRecord>> {
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            self.pending.push_back(entry.path());
            return Ok(None);
        }

        // Symlinks and special files are left alone.
        if !file_type.is_file() {
            return Ok(None);
        }

        let metadata = entry.metadata()?;

        Ok(Some(FileRecord {
            path: entry.path(),
            size: metadata.len(),
            atime_secs: to_unix_secs(metadata.accessed().ok()),
        }))
    }

    fn advance_dir(&mut self) -> bool {
        while let Some(dir) = self.pending.pop_front() {
            match fs::read_dir(&dir) {
                Ok(rd) => {
                    self.current = Some(rd);
                    return true;
                }
                Err(e) => {
                    warn!("[walk] read_dir({:?}) failed: {e}", dir);
                }
            }
        }
        false
    }
}

impl Iterator for FileWalker {
    type Item = FileRecord;

    fn next(&mut self) -> Option<FileRecord> {
        loop {
            let Some(rd) = self.current.as_mut() else {
                if !self.advance_dir() {
                    return None;
                }
                continue;
            };

            match rd.next() {
                None => {
                    self.current = None;
                }
                Some(Err(e)) => {
                    warn!("[walk] error reading entry: {e}");
                }
                Some(Ok(entry)) => match self.inspect_entry(&entry) {
                    Ok(Some(record)) => return Some(record),
                    Ok(None) => {}
                    Err(e) => {
                        warn!("[walk] inspect_entry({:?}) failed: {e}", entry.path());
                    }
                },
            }
        }
    }
}

/// Independent enumeration of every directory below a root (the root itself
/// is never yielded). Same error policy as [`FileWalker`].
pub struct DirWalker {
    pending: VecDeque<PathBuf>,
    current: Option<ReadDir>,
}

impl DirWalker {
    pub fn new(root: &Path) -> io::Result<Self> {
        let rd = fs::read_dir(root)?;
        Ok(Self {
            pending: VecDeque::new(),
            current: Some(rd),
        })
    }
}

impl Iterator for DirWalker {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            let Some(rd) = self.current.as_mut() else {
                let dir = self.pending.pop_front()?;
                match fs::read_dir(&dir) {
                    Ok(rd) => self.current = Some(rd),
                    Err(e) => warn!("[walk] read_dir({:?}) failed: {e}", dir),
                }
                continue;
            };

            match rd.next() {
                None => {
                    self.current = None;
                }
                Some(Err(e)) => {
                    warn!("[walk] error reading entry: {e}");
                }
                Some(Ok(entry)) => match entry.file_type() {
                    // Symlinked directories are not descended into.
                    Ok(ft) if ft.is_dir() => {
                        let path = entry.path();
                        self.pending.push_back(path.clone());
                        return Some(path);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("[walk] file_type({:?}) failed: {e}", entry.path());
                    }
                },
            }
        }
    }
}

pub fn to_unix_secs(t: Option<SystemTime>) -> u64 {
    t.and_then(|tt| tt.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
