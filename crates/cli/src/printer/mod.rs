use std::{
    io::{self, Write},
    time::Duration,
};

use attic_engine::RunResult;
use chrono::{DateTime, Local};

/// In-place `[done/total]` counter on stderr, kept separate from the domain
/// log lines on stdout.
pub struct ProgressCounter {
    total: u64,
    done: u64,
    started: bool,
}

impl ProgressCounter {
    pub fn new() -> Self {
        Self {
            total: 0,
            done: 0,
            started: false,
        }
    }

    pub fn start(&mut self, total: u64) {
        self.total = total;
        self.started = true;
        self.draw();
    }

    pub fn advance(&mut self) {
        self.done += 1;
        self.draw();
    }

    /// Blank the counter so a full log line can print cleanly.
    pub fn clear_line(&self) {
        if self.started {
            let mut err = io::stderr();
            let _ = write!(err, "\r{:width$}\r", "", width = 24);
            let _ = err.flush();
        }
    }

    pub fn finish(&self) {
        if self.started {
            let mut err = io::stderr();
            let _ = writeln!(err, "\r[{}/{}]", self.done, self.total);
        }
    }

    fn draw(&self) {
        let mut err = io::stderr();
        let _ = write!(err, "\r[{}/{}]", self.done, self.total);
        let _ = err.flush();
    }
}

pub fn print_summary(result: &RunResult, started: DateTime<Local>, elapsed: Duration) {
    println!();
    println!("Files relocated:     {}", result.relocated);
    println!("Directories removed: {}", result.pruned);
    if !result.errors.is_empty() {
        println!("Errors:              {}", result.errors.len());
    }
    if result.cancelled {
        println!("Run was cancelled before completion");
    }
    println!("Started:  {}", started.format("%H:%M:%S"));
    println!("Finished: {}", Local::now().format("%H:%M:%S"));
    println!("Duration: {} s", elapsed.as_secs());
}
