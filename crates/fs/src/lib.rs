mod record;
mod walker;

pub use record::FileRecord;
pub use walker::{DirWalker, FileWalker, to_unix_secs};
