//! Dependency requirement strings: `name[extras]specifiers; marker`.
//!
//! Parsing accepts the common subset found in `pyproject.toml` dependency
//! lists: a package name, optional extras in brackets, either a version
//! specifier set (optionally parenthesized) or a `@ url` direct reference,
//! and an optional environment marker after `;`. Markers are carried as
//! opaque text and re-emitted verbatim.

use std::fmt;

use pyver_util::errors::PyverError;

use crate::specifier::SpecifierSet;

/// A parsed requirement line from a dependency list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub extras: Vec<String>,
    pub specifiers: SpecifierSet,
    pub url: Option<String>,
    pub marker: Option<String>,
}

/// Lowercase a package name and collapse runs of `-`, `_` and `.` into a
/// single `-` so spellings like `My_Package` and `my-package` compare equal.
pub fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            pending_separator = !out.is_empty();
        } else {
            if pending_separator {
                out.push('-');
                pending_separator = false;
            }
            out.extend(c.to_lowercase());
        }
    }
    out
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

fn valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphanumeric() {
        return false;
    }
    if !name.ends_with(|c: char| c.is_ascii_alphanumeric()) {
        return false;
    }
    chars.all(is_name_char)
}

fn invalid(line: &str, reason: &str) -> PyverError {
    PyverError::Requirement {
        message: format!("'{line}': {reason}"),
    }
}

impl Requirement {
    /// A bare requirement with no version constraint.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extras: Vec::new(),
            specifiers: SpecifierSet::default(),
            url: None,
            marker: None,
        }
    }

    pub fn parse(line: &str) -> Result<Self, PyverError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err(invalid(line, "empty requirement"));
        }

        let (body, marker) = match trimmed.split_once(';') {
            Some((body, marker)) => {
                let marker = marker.trim();
                if marker.is_empty() {
                    return Err(invalid(line, "empty environment marker"));
                }
                (body.trim(), Some(marker.to_string()))
            }
            None => (trimmed, None),
        };

        let name_end = body
            .char_indices()
            .find(|(_, c)| !is_name_char(*c))
            .map_or(body.len(), |(i, _)| i);
        let name = &body[..name_end];
        if !valid_name(name) {
            return Err(invalid(line, "invalid package name"));
        }
        let mut rest = body[name_end..].trim_start();

        let mut extras = Vec::new();
        if let Some(after_bracket) = rest.strip_prefix('[') {
            let Some((inner, tail)) = after_bracket.split_once(']') else {
                return Err(invalid(line, "unterminated extras list"));
            };
            for extra in inner.split(',') {
                let extra = extra.trim();
                if extra.is_empty() {
                    return Err(invalid(line, "empty extra name"));
                }
                if !valid_name(extra) {
                    return Err(invalid(line, "invalid extra name"));
                }
                extras.push(extra.to_string());
            }
            rest = tail.trim_start();
        }

        let mut url = None;
        let mut specifiers = SpecifierSet::default();
        if let Some(reference) = rest.strip_prefix('@') {
            let reference = reference.trim();
            if reference.is_empty() {
                return Err(invalid(line, "empty url reference"));
            }
            url = Some(reference.to_string());
        } else if !rest.is_empty() {
            let clause = rest
                .strip_prefix('(')
                .and_then(|inner| inner.strip_suffix(')'))
                .unwrap_or(rest);
            specifiers = SpecifierSet::parse(clause)
                .map_err(|err| invalid(line, &err.to_string()))?;
        }

        Ok(Self {
            name: name.to_string(),
            extras,
            specifiers,
            url,
            marker,
        })
    }

    /// The canonical form of the package name.
    pub fn canonical_name(&self) -> String {
        canonical_name(&self.name)
    }
}

impl fmt::Display for Requirement {
    /// Renders in the normalized spelling: sorted extras, sorted specifier
    /// clauses with no spaces, and the marker after `; `.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.extras.is_empty() {
            let mut extras = self.extras.clone();
            extras.sort();
            write!(f, "[{}]", extras.join(","))?;
        }
        if let Some(url) = &self.url {
            write!(f, "@ {url}")?;
            if self.marker.is_some() {
                f.write_str(" ")?;
            }
        } else {
            write!(f, "{}", self.specifiers)?;
        }
        if let Some(marker) = &self.marker {
            write!(f, "; {marker}")?;
        }
        Ok(())
    }
}
