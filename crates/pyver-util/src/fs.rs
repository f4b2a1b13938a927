use std::path::{Path, PathBuf};

/// Walk up from `start` looking for a directory entry named `name`.
/// Returns the path to the directory containing the entry, or `None`.
pub fn find_ancestor_with(start: &Path, name: &str) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(name).exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}
