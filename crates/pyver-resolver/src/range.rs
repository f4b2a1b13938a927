//! Deriving a version constraint from a pinned version and its modifier.
//!
//! The truncating modifiers build a half-open range: the pinned version is
//! cut down to the modifier's precision for the lower bound, and the upper
//! bound is the same prefix with its last component incremented. A pin with
//! fewer components than the precision cannot be truncated and collapses to
//! an exact `==` pin.

use thiserror::Error;

use pyver_core::policy::Modifier;
use pyver_core::specifier::{CompareOp, InvalidSpecifier, Specifier, SpecifierSet};
use pyver_core::version::{InvalidVersion, Version};

/// Why a constraint could not be derived. These are data problems in one
/// dependency entry, so callers skip the entry instead of aborting.
#[derive(Debug, Error)]
pub enum RangeError {
    #[error(transparent)]
    InvalidVersion(#[from] InvalidVersion),

    #[error(transparent)]
    InvalidConstraint(#[from] InvalidSpecifier),

    #[error("no pinned version to derive a constraint from")]
    MissingVersion,
}

/// The specifier set for one dependency, given its pinned version and the
/// policy modifier. `version` is `None` for entries that declare no version,
/// which only the `present` modifier accepts. Only the truncating modifiers
/// require a numeric version; `full` pins the declared text verbatim, so
/// caret and pre-release spellings pass through.
pub fn constraint_for(
    version: Option<&str>,
    modifier: &Modifier,
) -> Result<SpecifierSet, RangeError> {
    match modifier {
        Modifier::Present => Ok(SpecifierSet::default()),
        Modifier::Constraint(text) => Ok(SpecifierSet::parse(text)?),
        Modifier::Full => {
            let pinned = version.ok_or(RangeError::MissingVersion)?;
            Ok(SpecifierSet::exact(pinned.trim()))
        }
        Modifier::Major | Modifier::Minor | Modifier::Patch => {
            let pinned = Version::parse(version.ok_or(RangeError::MissingVersion)?)?;
            let precision = modifier
                .precision()
                .unwrap_or(pinned.components().len());
            Ok(truncated_range(&pinned, precision))
        }
    }
}

/// `>=floor,<ceiling` at the given precision, or an exact pin when the
/// version is too short to truncate.
fn truncated_range(pinned: &Version, precision: usize) -> SpecifierSet {
    let components = pinned.components();
    if components.len() < precision {
        return SpecifierSet::exact(pinned.as_str());
    }
    let floor: Vec<u64> = components[..precision].to_vec();
    let mut ceiling = floor.clone();
    if let Some(last) = ceiling.last_mut() {
        *last += 1;
    }
    SpecifierSet::new(vec![
        Specifier::new(CompareOp::GreaterEqual, Version::from_parts(&floor).as_str()),
        Specifier::new(CompareOp::Less, Version::from_parts(&ceiling).as_str()),
    ])
}
