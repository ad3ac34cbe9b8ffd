use std::path::PathBuf;

/// One regular file discovered under the scan root. Produced by the walker,
/// consumed once, never persisted.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    /// File size, compared against the bytes written when a copy is verified
    pub size: u64,
    /// Last accessed time (may be unavailable on some platforms/mount options)
    pub atime_secs: u64,
}
