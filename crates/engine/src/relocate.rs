use std::{
    ffi::OsString,
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
};

use attic_fs::FileRecord;
use filetime::FileTime;

/// Marker spliced into a file name to sidestep a destination collision.
const COPY_MARKER: &str = "_copy";

/// Moves stale files into the destination directory with copy, verify,
/// delete semantics. The source is deleted if and only if a verified copy
/// remains at the destination; a failed item never leaves two copies.
pub struct FileRelocator {
    destination: PathBuf,
    overwrite: bool,
}

impl FileRelocator {
    pub fn new(destination: &Path, overwrite: bool) -> Self {
        Self {
            destination: destination.to_path_buf(),
            overwrite,
        }
    }

    /// Relocate one file, returning the path it ended up at.
    pub fn relocate(&self, record: &FileRecord) -> io::Result<PathBuf> {
        let name = record
            .path
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;

        let mut target = self.destination.join(name);
        if !self.overwrite {
            // Every insertion yields a longer, previously untried name, so
            // the probe terminates.
            while target.exists() {
                target = insert_copy_marker(&target);
            }
        }

        self.copy_verified(&record.path, record.size, &target)?;

        let atime = FileTime::from_unix_time(record.atime_secs as i64, 0);
        if let Err(e) = filetime::set_file_atime(&target, atime) {
            let _ = fs::remove_file(&target);
            return Err(e);
        }

        if let Err(e) = fs::remove_file(&record.path) {
            let _ = fs::remove_file(&target);
            return Err(e);
        }

        Ok(target)
    }

    fn copy_verified(&self, source: &Path, expected_len: u64, target: &Path) -> io::Result<()> {
        let written = if self.overwrite {
            fs::copy(source, target)?
        } else {
            let mut from = File::open(source)?;
            // create_new keeps a racing same-name arrival an error instead
            // of a silent clobber. Removal below is safe only because the
            // open created the file.
            let mut to = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(target)?;
            match io::copy(&mut from, &mut to) {
                Ok(n) => n,
                Err(e) => {
                    drop(to);
                    let _ = fs::remove_file(target);
                    return Err(e);
                }
            }
        };

        if written != expected_len {
            let _ = fs::remove_file(target);
            return Err(io::Error::other(format!(
                "short copy: {written} of {expected_len} bytes"
            )));
        }

        Ok(())
    }
}

/// `report.txt` -> `report_copy.txt`; no extension appends: `Makefile` ->
/// `Makefile_copy`. A leading dot is a hidden-file prefix, not an extension.
fn insert_copy_marker(path: &Path) -> PathBuf {
    let Some(name) = path.file_name() else {
        return path.to_path_buf();
    };

    let renamed: OsString = match name.to_str() {
        Some(s) => match s.rfind('.') {
            Some(dot) if dot > 0 => format!("{}{}{}", &s[..dot], COPY_MARKER, &s[dot..]).into(),
            _ => format!("{s}{COPY_MARKER}").into(),
        },
        None => {
            // Non-UTF-8 name: append after the extension rather than lose bytes.
            let mut os = name.to_os_string();
            os.push(COPY_MARKER);
            os
        }
    };

    path.with_file_name(renamed)
}

#[cfg(test)]
#[path = "relocate_tests.rs"]
mod tests;
