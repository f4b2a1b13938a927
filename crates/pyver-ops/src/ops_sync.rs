//! Operation: align interpreter-version settings with the declared support
//! range.
//!
//! The declared range is read from the tracked `pyproject.toml` files
//! (`project.requires-python`, or the Poetry `python` entry), the last
//! declaration winning. From it the operation derives the minimal supported
//! series and rewrites tool settings that exist: mypy, black and ruff
//! targets, trove classifiers, the pyupgrade hook arguments, and the
//! python-version keys of jsonschema-gentypes and prospector files.

use std::path::{Path, PathBuf};

use serde_yaml::Value as YamlValue;
use toml_edit::{Item, Value};

use pyver_core::pyproject::{multiline_array, Pyproject};
use pyver_core::python;
use pyver_core::specifier::SpecifierSet;
use pyver_core::version::Version;
use pyver_core::yaml::YamlDocument;
use pyver_util::errors::{PyverError, PyverResult};
use pyver_util::progress;

use crate::commit::{commit_toml, commit_yaml};
use crate::discovery;

const PYUPGRADE_REPO: &str = "https://github.com/asottile/pyupgrade";
const PYTHON_CLASSIFIER: &str = "Programming Language :: Python";

/// Options for `pyver sync`.
#[derive(Default)]
pub struct SyncOptions {
    /// Dry-run: report files that would change without writing.
    pub dry_run: bool,
}

/// Returns the files that changed, or would change in a dry run.
pub fn sync(project_root: &Path, opts: &SyncOptions) -> PyverResult<Vec<PathBuf>> {
    let pyprojects = discovery::tracked_files(project_root, "pyproject.toml")?;

    let mut selected: Option<SpecifierSet> = None;
    for path in &pyprojects {
        let pyproject = Pyproject::open(path)?;
        if let Some(text) = pyproject.requires_python() {
            selected = Some(parse_constraint(path, &text)?);
        }
    }
    let Some(constraint) = selected else {
        progress::status_info("Skipped", "no Python version declaration found");
        return Ok(Vec::new());
    };
    let Some(minimal) = python::minimal_series(&constraint) else {
        progress::status_info("Skipped", "no known Python series satisfies the declared range");
        return Ok(Vec::new());
    };
    progress::status(
        "Selected",
        &format!("Python {minimal} as minimal supported version"),
    );

    let mut changed = Vec::new();

    for path in &pyprojects {
        let mut pyproject = Pyproject::open(path)?;
        apply_pyproject_edits(&mut pyproject, &minimal)?;
        commit_toml(&mut pyproject, opts.dry_run, &mut changed)?;
    }

    let pre_commit = project_root.join(".pre-commit-config.yaml");
    if pre_commit.exists() {
        let mut doc = YamlDocument::open(&pre_commit)?;
        set_pyupgrade_args(&mut doc, &minimal);
        commit_yaml(&mut doc, opts.dry_run, &mut changed)?;
    }

    let gentypes = project_root.join("jsonschema-gentypes.yaml");
    if gentypes.exists() {
        let mut doc = YamlDocument::open(&gentypes)?;
        if doc.is_mapping() {
            doc.set_string(&["python_version"], &minimal.to_string());
            commit_yaml(&mut doc, opts.dry_run, &mut changed)?;
        } else {
            tracing::warn!("Skipping {}: top level is not a mapping", gentypes.display());
        }
    }

    for path in discovery::tracked_files(project_root, "*.prospector.yaml")? {
        let mut doc = YamlDocument::open(&path)?;
        let ok = doc.set_string(&["mypy", "options", "python-version"], &minimal.to_string())
            && doc.set_string(&["ruff", "options", "target-version"], &series_tag(&minimal));
        if !ok {
            tracing::warn!("Skipping {}: unexpected document shape", path.display());
            continue;
        }
        commit_yaml(&mut doc, opts.dry_run, &mut changed)?;
    }

    if changed.is_empty() {
        progress::status("Synced", "everything up to date");
    } else if opts.dry_run {
        progress::status_warn("Outdated", &format!("{} file(s) would change", changed.len()));
    } else {
        progress::status("Synced", &format!("{} file(s) updated", changed.len()));
    }
    Ok(changed)
}

/// The `py3X` spelling used by black, ruff and pyupgrade.
fn series_tag(series: &Version) -> String {
    format!("py{}{}", series.major(), series.minor())
}

fn parse_constraint(path: &Path, text: &str) -> Result<SpecifierSet, PyverError> {
    SpecifierSet::parse(text).map_err(|e| PyverError::Manifest {
        message: format!("{}: invalid Python constraint: {e}", path.display()),
    })
}

/// Rewrite the per-file settings that already exist, then the classifier
/// list. Classifiers expand this file's own declared range, not the
/// globally selected one.
fn apply_pyproject_edits(pyproject: &mut Pyproject, minimal: &Version) -> Result<(), PyverError> {
    let tag = series_tag(minimal);

    if let Some(item) = pyproject.get_path_mut(&["tool", "mypy", "python_version"]) {
        *item = Item::Value(Value::from(minimal.to_string()));
    }
    if let Some(item) = pyproject.get_path_mut(&["tool", "black", "target-version"]) {
        let mut targets = toml_edit::Array::new();
        targets.push(tag.as_str());
        *item = Item::Value(Value::Array(targets));
    }
    if let Some(item) = pyproject.get_path_mut(&["tool", "ruff", "target-version"]) {
        *item = Item::Value(Value::from(tag.as_str()));
    }

    let Some(text) = pyproject.requires_python() else {
        return Ok(());
    };
    let constraint = parse_constraint(pyproject.path(), &text)?;
    let supported = python::supported_series(&constraint);

    let Some(target) = classifier_target(pyproject) else {
        return Ok(());
    };
    let current = pyproject.string_array(target)?.unwrap_or_default();
    let mut classifiers: Vec<String> = current
        .into_iter()
        .filter(|classifier| !classifier.starts_with(PYTHON_CLASSIFIER))
        .collect();
    classifiers.push(PYTHON_CLASSIFIER.to_string());
    classifiers.push(format!("{PYTHON_CLASSIFIER} :: 3"));
    for series in &supported {
        classifiers.push(format!("{PYTHON_CLASSIFIER} :: {series}"));
    }
    classifiers.sort_by_cached_key(|classifier| natural_key(classifier));

    if let Some(item) = pyproject.get_path_mut(target) {
        *item = Item::Value(Value::Array(multiline_array(&classifiers)));
    }
    Ok(())
}

/// Where this file keeps its classifier list. The Poetry location only
/// counts when the Poetry table also declares the interpreter constraint.
fn classifier_target(pyproject: &Pyproject) -> Option<&'static [&'static str]> {
    if pyproject.has_key(&["project", "classifiers"]) {
        Some(&["project", "classifiers"])
    } else if pyproject.has_key(&["tool", "poetry", "classifiers"])
        && pyproject.has_key(&["tool", "poetry", "dependencies", "python"])
    {
        Some(&["tool", "poetry", "classifiers"])
    } else {
        None
    }
}

/// Point the pyupgrade hook at the minimal series via its `--py3X-plus` flag.
fn set_pyupgrade_args(doc: &mut YamlDocument, minimal: &Version) {
    let flag = format!("--py{}{}-plus", minimal.major(), minimal.minor());
    let path = doc.path().display().to_string();
    let Some(repos) = doc
        .value_mut()
        .get_mut("repos")
        .and_then(YamlValue::as_sequence_mut)
    else {
        return;
    };
    for entry in repos {
        if entry.get("repo").and_then(YamlValue::as_str) != Some(PYUPGRADE_REPO) {
            continue;
        }
        let first_hook = entry
            .get_mut("hooks")
            .and_then(YamlValue::as_sequence_mut)
            .and_then(|hooks| hooks.get_mut(0));
        match first_hook {
            Some(YamlValue::Mapping(hook)) => {
                hook.insert(
                    YamlValue::String("args".to_string()),
                    YamlValue::Sequence(vec![YamlValue::String(flag.clone())]),
                );
            }
            _ => tracing::warn!("pyupgrade entry in {path} has no hooks"),
        }
    }
}

/// Sort key treating digit runs as numbers, so `3.9` orders before `3.10`.
fn natural_key(text: &str) -> Vec<NaturalPart> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;
    for c in text.chars() {
        if c.is_ascii_digit() != in_digits {
            parts.push(NaturalPart::new(&current, in_digits));
            current.clear();
            in_digits = !in_digits;
        }
        current.push(c);
    }
    parts.push(NaturalPart::new(&current, in_digits));
    parts
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum NaturalPart {
    Text(String),
    Number(u64),
}

impl NaturalPart {
    fn new(text: &str, digits: bool) -> Self {
        if digits {
            if let Ok(number) = text.parse() {
                return NaturalPart::Number(number);
            }
        }
        NaturalPart::Text(text.to_lowercase())
    }
}
