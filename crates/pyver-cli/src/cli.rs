//! CLI argument definitions for pyver.
//!
//! Uses `clap` derive macros to define the full command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "pyver",
    version,
    about = "Keep declared Python version support in sync across a repository",
    long_about = "pyver reads the supported Python range from pyproject.toml and propagates \
                  it to the tools configured in the repository (mypy, black, ruff, pyupgrade, \
                  prospector, trove classifiers). It can also rewrite published dependency \
                  lists from Poetry declarations according to a version pinning policy."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Propagate the supported Python range to tool configuration files
    Sync {
        /// Report files that would change without writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Rewrite published dependency lists from the dependency policy
    Deps {
        /// Report files that would change without writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Verify all files are in sync; fails when an update is needed
    Check,
}

pub fn parse() -> Cli {
    Cli::parse()
}
