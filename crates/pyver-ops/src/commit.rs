//! Applying or reporting pending document edits.

use std::path::PathBuf;

use pyver_core::pyproject::Pyproject;
use pyver_core::yaml::YamlDocument;
use pyver_util::errors::PyverError;

/// Save a TOML document, or in a dry run only record that it would change.
pub(crate) fn commit_toml(
    pyproject: &mut Pyproject,
    dry_run: bool,
    changed: &mut Vec<PathBuf>,
) -> Result<(), PyverError> {
    if dry_run {
        if pyproject.is_changed() {
            eprintln!("  would update {}", pyproject.path().display());
            changed.push(pyproject.path().to_path_buf());
        }
    } else if pyproject.save()? {
        eprintln!("  updated {}", pyproject.path().display());
        changed.push(pyproject.path().to_path_buf());
    }
    Ok(())
}

/// Save a YAML document, or in a dry run only record that it would change.
pub(crate) fn commit_yaml(
    doc: &mut YamlDocument,
    dry_run: bool,
    changed: &mut Vec<PathBuf>,
) -> Result<(), PyverError> {
    if dry_run {
        if doc.is_changed() {
            eprintln!("  would update {}", doc.path().display());
            changed.push(doc.path().to_path_buf());
        }
    } else if doc.save()? {
        eprintln!("  updated {}", doc.path().display());
        changed.push(doc.path().to_path_buf());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_records_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pyproject.toml");
        std::fs::write(&path, "[project]\nname = \"a\"\n").unwrap();

        let mut pyproject = Pyproject::open(&path).unwrap();
        pyproject.doc_mut()["project"]["name"] = toml_edit::value("b");

        let mut changed = Vec::new();
        commit_toml(&mut pyproject, true, &mut changed).unwrap();
        assert_eq!(changed, vec![path.clone()]);
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"a\""));

        commit_toml(&mut pyproject, false, &mut changed).unwrap();
        assert_eq!(changed.len(), 2);
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"b\""));
    }

    #[test]
    fn untouched_documents_are_not_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "key: value\n").unwrap();

        let mut doc = YamlDocument::open(&path).unwrap();
        let mut changed = Vec::new();
        commit_yaml(&mut doc, true, &mut changed).unwrap();
        commit_yaml(&mut doc, false, &mut changed).unwrap();
        assert!(changed.is_empty());
    }
}
