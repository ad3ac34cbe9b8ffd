pub mod history;
pub mod run;

use clap::Subcommand;
pub use history::HistoryArgs;
pub use run::RunArgs;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan a tree, relocate stale files, prune emptied directories.
    ///
    /// Example:
    ///   attic run --source /srv/share --dest /srv/attic --weeks 6 --relocate
    ///   attic run --source /srv/share --relocate --prune-dirs --dest /srv/attic
    Run(RunArgs),

    /// Show past runs.
    History(HistoryArgs),
}
