//! Command dispatch and handler modules.

mod check;
mod deps;
mod sync;

use std::path::PathBuf;

use miette::Result;

use pyver_util::errors::PyverError;
use pyver_util::fs::find_ancestor_with;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Sync { dry_run } => sync::exec(dry_run),
        Command::Deps { dry_run } => deps::exec(dry_run),
        Command::Check => check::exec(),
    }
}

/// Locate the enclosing git work tree; all operations run relative to it.
fn project_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(PyverError::Io)?;
    let root = find_ancestor_with(&cwd, ".git").ok_or_else(|| PyverError::Git {
        message: "Could not find a .git directory in current or parent directories".to_string(),
    })?;
    Ok(root)
}
