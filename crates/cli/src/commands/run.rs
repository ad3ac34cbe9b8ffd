use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    thread,
    time::{Instant, SystemTime},
};

use anyhow::Result;
use attic_engine::{TriageConfig, TriageRun, cutoff_from_weeks};
use attic_fs::to_unix_secs;
use attic_runtime::{
    ProgressSink, RunLog, RunLogFile, StderrLog,
    history::{RunHistory, TriageEvent},
};
use chrono::Local;
use clap::Args;
use crossbeam::channel::{self, Sender};
use log::warn;

use crate::printer;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Directory tree to scan
    #[arg(long, value_name = "DIR")]
    pub source: PathBuf,

    /// Directory that receives relocated files
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Staleness threshold in weeks; files last accessed at or before
    /// now - WEEKS*7 days are relocated
    #[arg(long, default_value = "4")]
    pub weeks: u32,

    /// Relocate stale files into --dest
    #[arg(long)]
    pub relocate: bool,

    /// Delete directories left empty under the source
    #[arg(long)]
    pub prune_dirs: bool,

    /// Replace same-named destination files instead of picking a _copy name
    #[arg(long)]
    pub overwrite: bool,

    /// Skip writing the per-run log file to the working directory
    #[arg(long)]
    pub no_log_file: bool,
}

/// Everything the worker thread reports back to the rendering loop.
enum RunEvent {
    Total(u64),
    Tick,
    Line(String),
}

struct ChannelLog(Sender<RunEvent>);

impl RunLog for ChannelLog {
    fn log(&self, message: &str) {
        let _ = self.0.send(RunEvent::Line(message.to_string()));
    }
}

struct ChannelProgress(Sender<RunEvent>);

impl ProgressSink for ChannelProgress {
    fn begin(&mut self, total: u64) {
        let _ = self.0.send(RunEvent::Total(total));
    }

    fn tick(&mut self) {
        let _ = self.0.send(RunEvent::Tick);
    }
}

pub fn run(args: RunArgs) -> ExitCode {
    match execute(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[run] {e}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: RunArgs) -> Result<ExitCode> {
    let started = Local::now();
    let clock = Instant::now();

    let now_secs = to_unix_secs(Some(SystemTime::now()));
    let config = TriageConfig {
        source: args.source.clone(),
        destination: args.dest.clone(),
        cutoff_secs: cutoff_from_weeks(now_secs, args.weeks),
        overwrite: args.overwrite,
        relocate_files: args.relocate,
        prune_empty_dirs: args.prune_dirs,
    };

    let mut triage = TriageRun::new(config);

    // Ctrl-C finishes the in-flight item, then stops at the next boundary.
    let cancel = triage.cancel_token();
    if let Err(e) = signal_hook::flag::register(signal_hook::consts::SIGINT, cancel.flag()) {
        warn!("failed to install SIGINT handler: {e}");
    }

    let run_log = if args.no_log_file {
        None
    } else {
        match RunLogFile::create(Path::new("."), started) {
            Ok(f) => Some(f),
            Err(e) => {
                // A missing log file never blocks the run.
                StderrLog.log(&format!("cannot create run log file: {e}"));
                None
            }
        }
    };

    // The whole run executes off the rendering thread; every progress tick
    // and log line is marshaled back here through the channel.
    let (tx, rx) = channel::unbounded::<RunEvent>();

    let worker = {
        let log = ChannelLog(tx.clone());
        let mut progress = ChannelProgress(tx);
        thread::spawn(move || triage.execute(&log, &mut progress))
    };

    let mut counter = printer::ProgressCounter::new();
    for event in rx {
        match event {
            RunEvent::Total(total) => counter.start(total),
            RunEvent::Tick => counter.advance(),
            RunEvent::Line(line) => {
                counter.clear_line();
                println!("{line}");
                if let Some(f) = &run_log {
                    f.log(&line);
                }
            }
        }
    }
    counter.finish();

    let outcome = worker
        .join()
        .map_err(|_| anyhow::anyhow!("triage worker thread panicked"))?;

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            eprintln!("[run] {e}");
            return Ok(ExitCode::from(2));
        }
    };

    printer::print_summary(&result, started, clock.elapsed());

    if let Some(history) = RunHistory::new() {
        let destination = args
            .dest
            .as_ref()
            .filter(|_| args.relocate)
            .map(|p| p.display().to_string());
        history.log_run(TriageEvent::new(
            args.source.display().to_string(),
            destination,
            result.relocated,
            result.pruned,
            result.errors.len(),
            clock.elapsed().as_millis() as u64,
        ));
    }

    if result.errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}
