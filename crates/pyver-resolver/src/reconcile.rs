//! Rewriting `project.dependencies` lists from the Poetry table and policy.
//!
//! The declared Poetry table is the source of truth for which version each
//! package is pinned at; the policy decides how tight the published
//! constraint is. Reconciliation parses the current list into an ordered
//! map keyed by canonical name, overwrites matching entries in place, and
//! appends the rest in table order, so unrelated entries keep both their
//! text and their position.

use indexmap::IndexMap;

use pyver_core::poetry::DeclaredDependency;
use pyver_core::policy::{DependencyPolicy, Modifier};
use pyver_core::requirement::{canonical_name, Requirement};
use pyver_util::errors::PyverError;

use crate::range::constraint_for;

/// Everything needed to emit the requirement line for one package.
#[derive(Debug, Clone)]
pub struct ResolvedDependency {
    pub version: Option<String>,
    /// Extras groups this package is a member of.
    pub in_extras: Vec<String>,
    /// Extras enabled on the package itself.
    pub use_extras: Vec<String>,
    pub optional: bool,
    pub modifier: Modifier,
}

/// Which dependency list is being rewritten.
#[derive(Debug, Clone, Copy)]
pub enum DependencyGroup<'a> {
    Main,
    Extra(&'a str),
}

impl ResolvedDependency {
    /// An optional package that belongs to at least one extras group lives
    /// in those groups only; everything else belongs to the main list.
    pub fn belongs_to(&self, group: DependencyGroup<'_>) -> bool {
        match group {
            DependencyGroup::Main => !(self.optional && !self.in_extras.is_empty()),
            DependencyGroup::Extra(name) => self.in_extras.iter().any(|g| g == name),
        }
    }
}

/// Join the declared table, the extras groups and the policy into the
/// resolved view. The `python` entry is the interpreter constraint, not a
/// package, and never takes part.
pub fn resolve_dependencies(
    declared: &IndexMap<String, DeclaredDependency>,
    extras: &IndexMap<String, Vec<String>>,
    policy: &DependencyPolicy,
) -> IndexMap<String, ResolvedDependency> {
    let mut resolved = IndexMap::new();
    for (name, dependency) in declared {
        let canonical = canonical_name(name);
        if canonical == "python" {
            continue;
        }
        let in_extras = extras
            .iter()
            .filter(|(_, members)| {
                members.iter().any(|member| canonical_name(member) == canonical)
            })
            .map(|(group, _)| group.clone())
            .collect();
        resolved.insert(
            name.clone(),
            ResolvedDependency {
                version: dependency.version.clone(),
                in_extras,
                use_extras: dependency.use_extras.clone(),
                optional: dependency.optional,
                modifier: policy.modifier_for(name).clone(),
            },
        );
    }
    resolved
}

/// Rewrite one dependency list. Entries whose constraint cannot be derived
/// keep whatever the current list already says; a current entry that is not
/// a valid requirement string aborts the whole rewrite.
pub fn replace_dependencies(
    current: &[String],
    resolved: &IndexMap<String, ResolvedDependency>,
    group: DependencyGroup<'_>,
) -> Result<Vec<String>, PyverError> {
    let mut entries: IndexMap<String, Requirement> = IndexMap::new();
    for line in current {
        let requirement = Requirement::parse(line)?;
        entries.insert(requirement.canonical_name(), requirement);
    }

    for (name, dependency) in resolved {
        if !dependency.belongs_to(group) {
            continue;
        }
        let specifiers =
            match constraint_for(dependency.version.as_deref(), &dependency.modifier) {
                Ok(specifiers) => specifiers,
                Err(err) => {
                    tracing::warn!("Leaving '{name}' as currently declared: {err}");
                    continue;
                }
            };
        let requirement = Requirement {
            name: name.clone(),
            extras: dependency.use_extras.clone(),
            specifiers,
            url: None,
            marker: None,
        };
        entries.insert(canonical_name(name), requirement);
    }

    Ok(entries.values().map(Requirement::to_string).collect())
}
