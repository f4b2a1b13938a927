//! Deps command implementation.

use miette::Result;

use pyver_ops::ops_deps::{self, DepsOptions};

pub fn exec(dry_run: bool) -> Result<()> {
    let root = super::project_root()?;
    ops_deps::deps(&root, &DepsOptions { dry_run })?;
    Ok(())
}
