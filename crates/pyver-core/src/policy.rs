//! The per-package constraint policy declared in `pyproject.toml`.
//!
//! A policy table maps package names to modifiers:
//!
//! ```toml
//! [tool.python-versions.dependencies]
//! default = "minor"
//! requests = "major"
//! sqlalchemy = ">=2.0,<3"
//! pytest = "present"
//! ```
//!
//! `major`, `minor` and `patch` derive a `>=pinned,<truncated+1` range from
//! the pinned version, `full` pins exactly, `present` drops the constraint
//! entirely, and any other value is used verbatim as the specifier set. The
//! reserved `default` key sets the fallback for packages with no entry.

use indexmap::IndexMap;
use toml_edit::TableLike;

use crate::requirement::canonical_name;

/// How the constraint for one package is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    Major,
    Minor,
    Patch,
    Full,
    Present,
    /// A verbatim specifier set such as `>=1.0,<3`.
    Constraint(String),
}

impl Modifier {
    /// Parsing never fails: unrecognized text is a verbatim constraint.
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "major" => Modifier::Major,
            "minor" => Modifier::Minor,
            "patch" => Modifier::Patch,
            "full" => Modifier::Full,
            "present" => Modifier::Present,
            other => Modifier::Constraint(other.to_string()),
        }
    }

    /// Number of leading version components the derived range keeps, for
    /// the truncating modifiers.
    pub fn precision(&self) -> Option<usize> {
        match self {
            Modifier::Major => Some(1),
            Modifier::Minor => Some(2),
            Modifier::Patch => Some(3),
            _ => None,
        }
    }
}

/// The parsed policy table of one `pyproject.toml`.
#[derive(Debug, Clone)]
pub struct DependencyPolicy {
    modifiers: IndexMap<String, Modifier>,
    default: Modifier,
}

impl Default for DependencyPolicy {
    fn default() -> Self {
        Self {
            modifiers: IndexMap::new(),
            default: Modifier::Full,
        }
    }
}

impl DependencyPolicy {
    /// Read a policy from its TOML table. Entries must be strings; anything
    /// else is skipped with a warning.
    pub fn from_table(table: &dyn TableLike) -> Self {
        let mut policy = Self::default();
        for (name, item) in table.iter() {
            let Some(text) = item.as_str() else {
                tracing::warn!("Ignoring policy entry '{name}': value is not a string");
                continue;
            };
            let modifier = Modifier::parse(text);
            if name == "default" {
                policy.default = modifier;
            } else {
                policy.modifiers.insert(canonical_name(name), modifier);
            }
        }
        policy
    }

    pub fn insert(&mut self, name: &str, modifier: Modifier) {
        self.modifiers.insert(canonical_name(name), modifier);
    }

    pub fn set_default(&mut self, modifier: Modifier) {
        self.default = modifier;
    }

    /// The modifier for `name`, falling back to the table default.
    pub fn modifier_for(&self, name: &str) -> &Modifier {
        self.modifiers
            .get(&canonical_name(name))
            .unwrap_or(&self.default)
    }

    /// Whether `name` has an explicit entry (not just the default).
    pub fn has_entry(&self, name: &str) -> bool {
        self.modifiers.contains_key(&canonical_name(name))
    }

    /// Canonical names with explicit entries, in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modifiers.keys().map(String::as_str)
    }
}
