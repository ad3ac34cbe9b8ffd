use std::process::ExitCode;

use clap::Parser;

mod commands;
mod printer;

use attic_runtime::logging;
use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "attic", version, about = "Stale-file triage for directory trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

fn main() -> ExitCode {
    logging::init().ok();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => commands::run::run(args),
        Command::History(args) => commands::history::run(args),
    }
}
