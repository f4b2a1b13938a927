//! Listing the files an operation touches.
//!
//! File discovery goes through `git ls-files` so only tracked files are
//! rewritten; generated or vendored copies of the same filenames stay
//! untouched as long as they are not committed.

use std::path::{Path, PathBuf};

use pyver_util::errors::PyverError;
use pyver_util::process::CommandBuilder;

/// Tracked files under `root` matching a git pathspec such as
/// `pyproject.toml` or `*.prospector.yaml`.
pub fn tracked_files(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, PyverError> {
    let stdout = CommandBuilder::new("git")
        .args(["ls-files", pattern])
        .cwd(root.display().to_string())
        .exec_stdout()
        .map_err(|e| PyverError::Git {
            message: format!("git ls-files '{pattern}' failed: {e}"),
        })?;
    Ok(stdout
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| root.join(line))
        .collect())
}
