//! Dotted numeric version parsing and comparison.
//!
//! Python release versions and the pinned versions in a Poetry dependency
//! table are plain dotted integers (`3.11`, `2.5.3`). Pre-release and build
//! suffixes are deliberately unsupported: a non-numeric component makes the
//! whole value invalid, and callers decide whether that is fatal.

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

/// A parsed dotted numeric version with the original spelling retained.
#[derive(Debug, Clone)]
pub struct Version {
    original: String,
    components: Vec<u64>,
}

/// Error for a version string with a non-numeric dot-component.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid version '{version}': component '{component}' is not numeric")]
pub struct InvalidVersion {
    pub version: String,
    pub component: String,
}

impl Version {
    pub fn parse(version: &str) -> Result<Self, InvalidVersion> {
        let trimmed = version.trim();
        let mut components = Vec::new();
        if trimmed.is_empty() {
            return Err(InvalidVersion {
                version: version.to_string(),
                component: String::new(),
            });
        }
        for part in trimmed.split('.') {
            let value = part.parse::<u64>().map_err(|_| InvalidVersion {
                version: version.to_string(),
                component: part.to_string(),
            })?;
            components.push(value);
        }
        Ok(Self {
            original: trimmed.to_string(),
            components,
        })
    }

    /// Build a version directly from integer components.
    pub fn from_parts(parts: &[u64]) -> Self {
        let original = parts
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        Self {
            original,
            components: parts.to_vec(),
        }
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// The first component, `0` when absent.
    pub fn major(&self) -> u64 {
        self.components.first().copied().unwrap_or(0)
    }

    /// The second component, `0` when absent.
    pub fn minor(&self) -> u64 {
        self.components.get(1).copied().unwrap_or(0)
    }

    /// The original spelling, as parsed.
    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.components.len().max(other.components.len());
        for i in 0..max_len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
