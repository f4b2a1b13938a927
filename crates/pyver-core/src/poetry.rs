//! Reading Poetry dependency tables and extras groups.
//!
//! Dependency entries come in two shapes: a plain version string
//! (`requests = "2.31.0"`) or a detailed table
//! (`requests = { version = "2.31.0", extras = ["socks"], optional = true }`).
//! Git, path and url references carry no version; they are kept with
//! `version: None` so a `present` modifier can still emit the bare name.

use indexmap::IndexMap;
use toml_edit::{Item, TableLike};

/// One entry of a `[tool.poetry.dependencies]` style table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredDependency {
    /// The pinned version, when the entry declares one.
    pub version: Option<String>,
    /// Extras the depending project enables on this package.
    pub use_extras: Vec<String>,
    pub optional: bool,
}

impl DeclaredDependency {
    /// A plain pinned entry, the most common shape.
    pub fn pinned(version: &str) -> Self {
        Self {
            version: Some(version.to_string()),
            ..Self::default()
        }
    }

    /// Decode a single table entry. Returns `None` for shapes that are not
    /// dependency declarations (arrays of constraints, numbers).
    pub fn from_item(item: &Item) -> Option<Self> {
        if let Some(version) = item.as_str() {
            return Some(Self::pinned(version));
        }
        let table = item.as_table_like()?;
        let version = table
            .get("version")
            .and_then(Item::as_str)
            .map(str::to_string);
        let use_extras = table
            .get("extras")
            .and_then(Item::as_array)
            .map(|array| {
                array
                    .iter()
                    .filter_map(|value| value.as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let optional = table
            .get("optional")
            .and_then(Item::as_bool)
            .unwrap_or(false);
        Some(Self {
            version,
            use_extras,
            optional,
        })
    }
}

/// All entries of a dependency table, in declaration order. Entries with an
/// unusable shape are skipped with a warning.
pub fn declared_dependencies(table: &dyn TableLike) -> IndexMap<String, DeclaredDependency> {
    let mut dependencies = IndexMap::new();
    for (name, item) in table.iter() {
        match DeclaredDependency::from_item(item) {
            Some(dependency) => {
                dependencies.insert(name.to_string(), dependency);
            }
            None => {
                tracing::warn!("Ignoring dependency '{name}': unsupported entry shape");
            }
        }
    }
    dependencies
}

/// The `[tool.poetry.extras]` groups: group name to member package names,
/// in declaration order.
pub fn extras_groups(table: &dyn TableLike) -> IndexMap<String, Vec<String>> {
    let mut groups = IndexMap::new();
    for (name, item) in table.iter() {
        let Some(array) = item.as_array() else {
            tracing::warn!("Ignoring extras group '{name}': value is not an array");
            continue;
        };
        let members = array
            .iter()
            .filter_map(|value| value.as_str())
            .map(str::to_string)
            .collect();
        groups.insert(name.to_string(), members);
    }
    groups
}
