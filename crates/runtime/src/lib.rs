mod config;
pub mod history;
pub mod logging;
pub mod sink;

pub use config::{PROGRAM_LOG_LEVEL, PROGRAM_NAME, run_log_file_name};
pub use sink::{NullLog, NullProgress, ProgressSink, RunLog, RunLogFile, StderrLog};

pub use logging::init;
