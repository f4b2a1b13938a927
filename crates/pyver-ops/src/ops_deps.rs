//! Operation: reconcile `project.dependencies` with the Poetry table and
//! the declared constraint policy.
//!
//! Only files that carry a policy table take part. For each one, the Poetry
//! dependency table supplies the pinned versions, the policy supplies the
//! modifier per package, and the published dependency lists are rewritten
//! in place. Packages listed in the policy but absent from the Poetry table
//! get their version from the package index.

use std::path::{Path, PathBuf};

use pyver_core::policy::Modifier;
use pyver_core::pyproject::Pyproject;
use pyver_core::requirement::canonical_name;
use pyver_core::specifier::{InvalidSpecifier, SpecifierSet};
use pyver_pypi::index::PackageIndex;
use pyver_resolver::reconcile::{
    replace_dependencies, resolve_dependencies, DependencyGroup, ResolvedDependency,
};
use pyver_util::errors::{PyverError, PyverResult};
use pyver_util::progress;

use crate::commit::commit_toml;
use crate::discovery;

/// Options for `pyver deps`.
#[derive(Default)]
pub struct DepsOptions {
    /// Dry-run: report files that would change without writing.
    pub dry_run: bool,
}

/// Returns the files that changed, or would change in a dry run.
pub fn deps(project_root: &Path, opts: &DepsOptions) -> PyverResult<Vec<PathBuf>> {
    let index = PackageIndex::new().map_err(|e| PyverError::Generic {
        message: e.to_string(),
    })?;
    reconcile_tracked(project_root, opts, &index)
}

fn reconcile_tracked(
    project_root: &Path,
    opts: &DepsOptions,
    index: &PackageIndex,
) -> PyverResult<Vec<PathBuf>> {
    let mut changed = Vec::new();
    for path in discovery::tracked_files(project_root, "pyproject.toml")? {
        let mut pyproject = Pyproject::open(&path)?;
        let Some(policy) = pyproject.dependency_policy() else {
            continue;
        };
        if !pyproject.has_key(&["project"]) {
            progress::status_warn(
                "Skipping",
                &format!("{}: policy present but no [project] table", path.display()),
            );
            continue;
        }

        let declared = pyproject.poetry_dependencies();
        let extras = pyproject.poetry_extras();
        let mut resolved = resolve_dependencies(&declared, &extras, &policy);

        // Policy entries without a Poetry declaration still get a line in
        // the published list. Every addition is resolved against the index
        // first; entries that fail to resolve are skipped with a warning.
        let known: Vec<String> = declared.keys().map(|name| canonical_name(name)).collect();
        for name in policy.names().map(str::to_string).collect::<Vec<_>>() {
            if name == "python" || known.iter().any(|k| *k == name) {
                continue;
            }
            let modifier = policy.modifier_for(&name).clone();
            let filter = match lookup_filter(&modifier) {
                Ok(filter) => filter,
                Err(err) => {
                    tracing::warn!("Skipping '{name}': {err}");
                    continue;
                }
            };
            let spinner = progress::spinner(&format!("Looking up {name}"));
            let result = index.latest_matching(&name, &filter);
            spinner.finish_and_clear();
            let version = match result {
                Ok(version) => version.to_string(),
                Err(err) => {
                    tracing::warn!("Skipping '{name}': {err}");
                    continue;
                }
            };
            resolved.insert(
                name.clone(),
                ResolvedDependency {
                    version: Some(version),
                    in_extras: Vec::new(),
                    use_extras: Vec::new(),
                    optional: false,
                    modifier,
                },
            );
        }

        apply_dependency_lists(&mut pyproject, &resolved, &extras)?;
        commit_toml(&mut pyproject, opts.dry_run, &mut changed)?;
    }

    if changed.is_empty() {
        progress::status("Reconciled", "dependency lists up to date");
    } else if opts.dry_run {
        progress::status_warn("Outdated", &format!("{} file(s) would change", changed.len()));
    } else {
        progress::status("Reconciled", &format!("{} file(s) updated", changed.len()));
    }
    Ok(changed)
}

/// The release filter for an index lookup. A verbatim policy constraint
/// narrows the candidates; every other modifier takes the newest release.
fn lookup_filter(modifier: &Modifier) -> Result<SpecifierSet, InvalidSpecifier> {
    match modifier {
        Modifier::Constraint(text) => SpecifierSet::parse(text),
        _ => Ok(SpecifierSet::default()),
    }
}

/// Rewrite the main list and every extras group that gains or changes
/// entries. Lists are only reassigned when their contents differ, so an
/// already-reconciled file keeps its formatting untouched.
fn apply_dependency_lists(
    pyproject: &mut Pyproject,
    resolved: &indexmap::IndexMap<String, ResolvedDependency>,
    extras: &indexmap::IndexMap<String, Vec<String>>,
) -> Result<(), PyverError> {
    let current = pyproject.project_dependencies()?;
    let updated = replace_dependencies(&current, resolved, DependencyGroup::Main)?;
    if updated != current {
        pyproject.set_array(&["project", "dependencies"], requirement_array(&updated))?;
    }

    let current_groups = pyproject.optional_dependency_groups()?;
    for group in extras.keys() {
        let baseline = current_groups.get(group).cloned().unwrap_or_default();
        let updated = replace_dependencies(&baseline, resolved, DependencyGroup::Extra(group))?;
        if !updated.is_empty() && updated != baseline {
            pyproject.set_array(
                &["project", "optional-dependencies", group.as_str()],
                requirement_array(&updated),
            )?;
        }
    }
    Ok(())
}

fn requirement_array(values: &[String]) -> toml_edit::Array {
    let mut array = toml_edit::Array::new();
    for value in values {
        array.push(value.as_str());
    }
    array
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?}");
    }

    fn init_repo(dir: &Path) {
        git(dir, &["init", "--quiet"]);
        git(dir, &["config", "user.email", "test@example.com"]);
        git(dir, &["config", "user.name", "Test"]);
    }

    const FIXTURE: &str = r#"
[project]
name = "demo"
dependencies = ["pkg_only==2.3.4"]

[tool.poetry.dependencies]
python = "3.11"
pkg_major = "1.2.3"
pkg_minor = "1.2.3"
pkg_patch = "1.2.3"
pkg_patch_error = "1.2"
pkg_present = "1.2.3"
pkg_no = "1.2.3"
pkg_extra = { version = "1.2.3", extras = ["extra"] }
pkg_set = "1.2.3"
pkg_in_extra = { version = "1.2.3", optional = true }

[tool.poetry.extras]
extra = ["pkg_in_extra"]

[tool.python-versions.dependencies]
pkg_major = "major"
pkg_minor = "minor"
pkg_patch = "patch"
pkg_patch_error = "patch"
pkg_present = "present"
pkg_set = ">=1.0.0,<3.0.0"
"#;

    #[test]
    fn reconciles_published_lists() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        init_repo(root);
        std::fs::write(root.join("pyproject.toml"), FIXTURE).unwrap();
        git(root, &["add", "-A"]);

        let changed = deps(root, &DepsOptions::default()).unwrap();
        assert_eq!(changed.len(), 1);

        let result = Pyproject::open(&root.join("pyproject.toml")).unwrap();
        assert_eq!(
            result.project_dependencies().unwrap(),
            vec![
                "pkg_only==2.3.4",
                "pkg_major<2,>=1",
                "pkg_minor<1.3,>=1.2",
                "pkg_patch<1.2.4,>=1.2.3",
                "pkg_patch_error==1.2",
                "pkg_present",
                "pkg_no==1.2.3",
                "pkg_extra[extra]==1.2.3",
                "pkg_set<3.0.0,>=1.0.0",
            ]
        );
        let groups = result.optional_dependency_groups().unwrap();
        assert_eq!(groups["extra"], vec!["pkg_in_extra==1.2.3"]);

        let again = deps(root, &DepsOptions::default()).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn lookup_filter_follows_the_modifier() {
        let filter = lookup_filter(&Modifier::Constraint(">=2,<3".to_string())).unwrap();
        assert_eq!(filter.to_string(), "<3,>=2");

        let open = lookup_filter(&Modifier::Major).unwrap();
        assert_eq!(open.to_string(), "");

        assert!(lookup_filter(&Modifier::Constraint("^2.0".to_string())).is_err());
    }

    #[test]
    fn additions_that_fail_to_resolve_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        init_repo(root);
        let content = r#"
[project]
name = "demo"
dependencies = []

[tool.python-versions.dependencies]
extra-tool = "present"
pinned-range = ">=2,<3"
caret-styled = "^2.0"
"#;
        std::fs::write(root.join("pyproject.toml"), content).unwrap();
        git(root, &["add", "-A"]);

        // Nothing listens on port 0, so every lookup errors out and the
        // policy-only entries never reach the published list.
        let index = PackageIndex::with_base_url("http://127.0.0.1:0").unwrap();
        let changed = reconcile_tracked(root, &DepsOptions::default(), &index).unwrap();
        assert!(changed.is_empty());
        assert_eq!(
            std::fs::read_to_string(root.join("pyproject.toml")).unwrap(),
            content
        );
    }

    #[test]
    fn non_table_project_value_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        init_repo(root);
        let content = r#"
project = 3

[tool.poetry.dependencies]
pkg = "1.2.3"

[tool.python-versions.dependencies]
pkg = "minor"
"#;
        std::fs::write(root.join("pyproject.toml"), content).unwrap();
        git(root, &["add", "-A"]);

        let err = deps(root, &DepsOptions::default()).unwrap_err();
        assert!(err.to_string().contains("project is not a table"));
        assert_eq!(
            std::fs::read_to_string(root.join("pyproject.toml")).unwrap(),
            content
        );
    }

    #[test]
    fn files_without_policy_are_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        init_repo(root);
        let content = r#"
[project]
name = "demo"
dependencies = ["left-alone==1.0"]

[tool.poetry.dependencies]
left-alone = "9.9.9"
"#;
        std::fs::write(root.join("pyproject.toml"), content).unwrap();
        git(root, &["add", "-A"]);

        let changed = deps(root, &DepsOptions::default()).unwrap();
        assert!(changed.is_empty());
        let on_disk = std::fs::read_to_string(root.join("pyproject.toml")).unwrap();
        assert_eq!(on_disk, content);
    }

    #[test]
    fn dry_run_leaves_the_file_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        init_repo(root);
        std::fs::write(root.join("pyproject.toml"), FIXTURE).unwrap();
        git(root, &["add", "-A"]);

        let changed = deps(root, &DepsOptions { dry_run: true }).unwrap();
        assert_eq!(changed.len(), 1);
        assert_eq!(
            std::fs::read_to_string(root.join("pyproject.toml")).unwrap(),
            FIXTURE
        );
    }

    #[test]
    fn policy_without_project_table_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        init_repo(root);
        let content = r#"
[tool.poetry.dependencies]
pkg = "1.0"

[tool.python-versions.dependencies]
pkg = "minor"
"#;
        std::fs::write(root.join("pyproject.toml"), content).unwrap();
        git(root, &["add", "-A"]);

        let changed = deps(root, &DepsOptions::default()).unwrap();
        assert!(changed.is_empty());
        assert_eq!(
            std::fs::read_to_string(root.join("pyproject.toml")).unwrap(),
            content
        );
    }
}
