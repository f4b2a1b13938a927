//! Operation: verify everything is in sync without writing.

use std::path::Path;

use pyver_util::errors::PyverResult;
use pyver_util::progress;

use crate::ops_deps::{self, DepsOptions};
use crate::ops_sync::{self, SyncOptions};

/// Run both operations in dry-run mode. Returns `true` when nothing would
/// change; the caller turns `false` into a non-zero exit code.
pub fn check(project_root: &Path) -> PyverResult<bool> {
    let mut changed = ops_sync::sync(project_root, &SyncOptions { dry_run: true })?;
    changed.extend(ops_deps::deps(project_root, &DepsOptions { dry_run: true })?);
    changed.sort();
    changed.dedup();

    if changed.is_empty() {
        progress::status("Checked", "everything in sync");
        return Ok(true);
    }
    for path in &changed {
        eprintln!("  out of sync: {}", path.display());
    }
    progress::status_warn("Checked", &format!("{} file(s) out of sync", changed.len()));
    Ok(false)
}
