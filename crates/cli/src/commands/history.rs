use std::process::ExitCode;

use attic_runtime::history::RunHistory;
use clap::Args;
use log::{error, info};

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Number of entries to display
    #[arg(long, short = 'n', default_value = "20")]
    pub limit: usize,

    /// Clear all history
    #[arg(long)]
    pub clear: bool,
}

pub fn run(args: HistoryArgs) -> ExitCode {
    let store = match RunHistory::new() {
        Some(s) => s,
        None => {
            info!("[info] History is currently disabled");
            return ExitCode::from(0);
        }
    };

    if args.clear {
        match store.clear() {
            Ok(_) => {
                println!("History cleared");
                return ExitCode::from(0);
            }
            Err(e) => {
                error!("[error] Failed to clear history: {}", e);
                return ExitCode::from(1);
            }
        }
    }

    let runs = store.recent_runs(args.limit);

    if runs.is_empty() {
        println!("No runs yet.");
        return ExitCode::from(0);
    }

    // Print header
    println!(
        "{:<20}  {:>6}  {:>6}  {:>6}  {:>8}  SOURCE",
        "TIMESTAMP", "MOVED", "PRUNED", "ERRORS", "TIME"
    );
    println!("{}", "-".repeat(72));

    for run in runs {
        let ts = run.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();

        println!(
            "{:<20}  {:>6}  {:>6}  {:>6}  {:>6}ms  {}",
            ts, run.relocated, run.pruned, run.errors, run.duration_ms, run.source
        );
    }

    let total = store.count();
    if total > args.limit {
        println!(
            "\n({} more entries, use --limit to show more)",
            total - args.limit
        );
    }

    ExitCode::from(0)
}
