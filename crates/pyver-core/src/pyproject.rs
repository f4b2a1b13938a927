//! Format-preserving access to a `pyproject.toml` document.
//!
//! The document is held as a `toml_edit` tree so comments, ordering and
//! whitespace survive an edit. `save` writes only when the rendered text
//! differs from what was read, which is what makes dry runs and the check
//! mode cheap.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use toml_edit::{DocumentMut, Item, Table, TableLike};

use pyver_util::errors::PyverError;

use crate::policy::DependencyPolicy;
use crate::poetry::{self, DeclaredDependency};

/// Current policy table location, under `[tool.python-versions]`.
pub const POLICY_TABLE: [&str; 3] = ["tool", "python-versions", "dependencies"];
/// Table name used by older configurations.
pub const LEGACY_POLICY_TABLE: [&str; 2] = ["tool", "python-versions-hook"];

#[derive(Debug)]
pub struct Pyproject {
    path: PathBuf,
    doc: DocumentMut,
    original: String,
}

impl Pyproject {
    pub fn open(path: &Path) -> Result<Self, PyverError> {
        let content = fs::read_to_string(path)?;
        Self::from_string(path, &content)
    }

    pub fn from_string(path: impl Into<PathBuf>, content: &str) -> Result<Self, PyverError> {
        let path = path.into();
        let doc = content
            .parse::<DocumentMut>()
            .map_err(|e| PyverError::Manifest {
                message: format!("failed to parse {}: {e}", path.display()),
            })?;
        Ok(Self {
            path,
            doc,
            original: content.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn doc(&self) -> &DocumentMut {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut DocumentMut {
        &mut self.doc
    }

    /// Walk `keys` through regular and inline tables.
    pub fn get_path(&self, keys: &[&str]) -> Option<&Item> {
        let mut current = self.doc.as_item();
        for key in keys {
            current = current.as_table_like()?.get(key)?;
        }
        Some(current)
    }

    pub fn get_path_mut(&mut self, keys: &[&str]) -> Option<&mut Item> {
        let mut current = self.doc.as_item_mut();
        for key in keys {
            current = current.as_table_like_mut()?.get_mut(key)?;
        }
        Some(current)
    }

    pub fn has_key(&self, keys: &[&str]) -> bool {
        self.get_path(keys).is_some()
    }

    /// Set the array at `keys`, creating missing parent tables along the
    /// way. An existing non-table value on the path is a malformed manifest.
    pub fn set_array(&mut self, keys: &[&str], array: toml_edit::Array) -> Result<(), PyverError> {
        let Some((&last, parents)) = keys.split_last() else {
            return Ok(());
        };
        let mut current: &mut dyn TableLike = self.doc.as_table_mut();
        let mut walked: Vec<&str> = Vec::new();
        for &key in parents {
            walked.push(key);
            if !current.contains_key(key) {
                current.insert(key, Item::Table(Table::new()));
            }
            current = match current.get_mut(key).and_then(Item::as_table_like_mut) {
                Some(table) => table,
                None => {
                    return Err(PyverError::Manifest {
                        message: format!(
                            "{}: {} is not a table",
                            self.path.display(),
                            walked.join(".")
                        ),
                    });
                }
            };
        }
        current.insert(last, Item::Value(toml_edit::Value::Array(array)));
        Ok(())
    }

    /// Whether the document differs from the text it was read from.
    pub fn is_changed(&self) -> bool {
        self.doc.to_string() != self.original
    }

    /// Write back if changed; returns whether a write happened.
    pub fn save(&mut self) -> Result<bool, PyverError> {
        if !self.is_changed() {
            return Ok(false);
        }
        let rendered = self.doc.to_string();
        fs::write(&self.path, &rendered)?;
        self.original = rendered;
        Ok(true)
    }

    /// The declared interpreter support constraint: `project.requires-python`
    /// when present, otherwise the `python` entry of the Poetry dependency
    /// table.
    pub fn requires_python(&self) -> Option<String> {
        if let Some(item) = self.get_path(&["project", "requires-python"]) {
            return item.as_str().map(str::to_string);
        }
        let item = self.get_path(&["tool", "poetry", "dependencies", "python"])?;
        if let Some(text) = item.as_str() {
            return Some(text.to_string());
        }
        item.as_table_like()
            .and_then(|t| t.get("version"))
            .and_then(Item::as_str)
            .map(str::to_string)
    }

    /// The constraint policy, when this file declares one.
    pub fn dependency_policy(&self) -> Option<DependencyPolicy> {
        let table = self
            .get_path(&POLICY_TABLE)
            .or_else(|| self.get_path(&LEGACY_POLICY_TABLE))?
            .as_table_like()?;
        Some(DependencyPolicy::from_table(table))
    }

    pub fn poetry_dependencies(&self) -> IndexMap<String, DeclaredDependency> {
        self.get_path(&["tool", "poetry", "dependencies"])
            .and_then(Item::as_table_like)
            .map(poetry::declared_dependencies)
            .unwrap_or_default()
    }

    pub fn poetry_extras(&self) -> IndexMap<String, Vec<String>> {
        self.get_path(&["tool", "poetry", "extras"])
            .and_then(Item::as_table_like)
            .map(poetry::extras_groups)
            .unwrap_or_default()
    }

    /// The current `project.dependencies` list. A non-string entry is a
    /// malformed manifest and is reported as such.
    pub fn project_dependencies(&self) -> Result<Vec<String>, PyverError> {
        Ok(self
            .string_array(&["project", "dependencies"])?
            .unwrap_or_default())
    }

    /// The current `project.optional-dependencies` groups, in declared order.
    pub fn optional_dependency_groups(&self) -> Result<IndexMap<String, Vec<String>>, PyverError> {
        let Some(item) = self.get_path(&["project", "optional-dependencies"]) else {
            return Ok(IndexMap::new());
        };
        let table = item
            .as_table_like()
            .ok_or_else(|| self.malformed("project.optional-dependencies"))?;
        let mut groups = IndexMap::new();
        for (name, entry) in table.iter() {
            let list = string_list(entry).ok_or_else(|| {
                self.malformed(&format!("project.optional-dependencies.{name}"))
            })?;
            groups.insert(name.to_string(), list);
        }
        Ok(groups)
    }

    /// Read an array of strings at `keys`. Absent keys read as `None`; an
    /// array with non-string entries is a malformed manifest.
    pub fn string_array(&self, keys: &[&str]) -> Result<Option<Vec<String>>, PyverError> {
        let Some(item) = self.get_path(keys) else {
            return Ok(None);
        };
        match string_list(item) {
            Some(list) => Ok(Some(list)),
            None => Err(self.malformed(&keys.join("."))),
        }
    }

    fn malformed(&self, key: &str) -> PyverError {
        PyverError::Manifest {
            message: format!(
                "{}: {key} must be an array of strings",
                self.path.display()
            ),
        }
    }
}

/// A TOML array laid out one entry per line, the usual hand-written style
/// for classifier and dependency lists.
pub fn multiline_array(values: &[String]) -> toml_edit::Array {
    let mut array = toml_edit::Array::new();
    for value in values {
        array.push(value.as_str());
    }
    for item in array.iter_mut() {
        item.decor_mut().set_prefix("\n  ");
    }
    array.set_trailing("\n");
    array.set_trailing_comma(true);
    array
}

fn string_list(item: &Item) -> Option<Vec<String>> {
    let array = item.as_array()?;
    let mut list = Vec::with_capacity(array.len());
    for value in array.iter() {
        list.push(value.as_str()?.to_string());
    }
    Some(list)
}
