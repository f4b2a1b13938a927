//! Sync command implementation.

use miette::Result;

use pyver_ops::ops_sync::{self, SyncOptions};

pub fn exec(dry_run: bool) -> Result<()> {
    let root = super::project_root()?;
    ops_sync::sync(&root, &SyncOptions { dry_run })?;
    Ok(())
}
