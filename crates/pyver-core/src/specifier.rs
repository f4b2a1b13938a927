//! Version specifier clauses and comma-joined specifier sets.
//!
//! Covers the comparison operators used in Python dependency metadata:
//! `==`, `!=`, `<=`, `>=`, `<`, `>`, `~=` and `===`, plus the `.*` wildcard
//! suffix on equality clauses. Matching works on dotted numeric versions;
//! a clause whose version text does not parse simply matches nothing.

use std::fmt;

use thiserror::Error;

use crate::version::Version;

/// Comparison operator of a single specifier clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    LessEqual,
    GreaterEqual,
    Less,
    Greater,
    Compatible,
    ArbitraryEqual,
}

impl CompareOp {
    fn as_str(self) -> &'static str {
        match self {
            CompareOp::Equal => "==",
            CompareOp::NotEqual => "!=",
            CompareOp::LessEqual => "<=",
            CompareOp::GreaterEqual => ">=",
            CompareOp::Less => "<",
            CompareOp::Greater => ">",
            CompareOp::Compatible => "~=",
            CompareOp::ArbitraryEqual => "===",
        }
    }
}

/// Error for a clause or set that is not a valid specifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid specifier '{spec}': {reason}")]
pub struct InvalidSpecifier {
    pub spec: String,
    pub reason: String,
}

impl InvalidSpecifier {
    fn new(spec: &str, reason: impl Into<String>) -> Self {
        Self {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}

/// A single clause such as `>=1.2` or `==3.9.*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    op: CompareOp,
    version: String,
}

impl Specifier {
    pub fn new(op: CompareOp, version: impl Into<String>) -> Self {
        Self {
            op,
            version: version.into(),
        }
    }

    pub fn parse(spec: &str) -> Result<Self, InvalidSpecifier> {
        let trimmed = spec.trim();
        // Longest operators first so `==` is not read as two failures of `=`.
        let ops = [
            ("===", CompareOp::ArbitraryEqual),
            ("==", CompareOp::Equal),
            ("!=", CompareOp::NotEqual),
            ("<=", CompareOp::LessEqual),
            (">=", CompareOp::GreaterEqual),
            ("~=", CompareOp::Compatible),
            ("<", CompareOp::Less),
            (">", CompareOp::Greater),
        ];
        for (text, op) in ops {
            if let Some(rest) = trimmed.strip_prefix(text) {
                let version = rest.trim();
                if version.is_empty() {
                    return Err(InvalidSpecifier::new(spec, "missing version"));
                }
                if version.chars().any(|c| c.is_whitespace() || c == ',') {
                    return Err(InvalidSpecifier::new(spec, "malformed version"));
                }
                return Ok(Self::new(op, version));
            }
        }
        Err(InvalidSpecifier::new(spec, "missing comparison operator"))
    }

    pub fn op(&self) -> CompareOp {
        self.op
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whether `candidate` satisfies this clause.
    pub fn matches(&self, candidate: &Version) -> bool {
        if self.op == CompareOp::ArbitraryEqual {
            return candidate.as_str() == self.version;
        }
        if let Some(prefix) = self.version.strip_suffix(".*") {
            return match self.op {
                CompareOp::Equal => prefix_matches(prefix, candidate),
                CompareOp::NotEqual => !prefix_matches(prefix, candidate),
                _ => false,
            };
        }
        match self.op {
            CompareOp::Compatible => compatible_matches(&self.version, candidate),
            _ => {
                let Ok(bound) = Version::parse(&self.version) else {
                    return false;
                };
                match self.op {
                    CompareOp::Equal => *candidate == bound,
                    CompareOp::NotEqual => *candidate != bound,
                    CompareOp::LessEqual => *candidate <= bound,
                    CompareOp::GreaterEqual => *candidate >= bound,
                    CompareOp::Less => *candidate < bound,
                    CompareOp::Greater => *candidate > bound,
                    CompareOp::Compatible | CompareOp::ArbitraryEqual => unreachable!(),
                }
            }
        }
    }
}

/// `==X.Y.*` style prefix comparison on the numeric components.
fn prefix_matches(prefix: &str, candidate: &Version) -> bool {
    let Ok(bound) = Version::parse(prefix) else {
        return false;
    };
    let wanted = bound.components();
    let have = candidate.components();
    wanted
        .iter()
        .enumerate()
        .all(|(i, part)| have.get(i).copied().unwrap_or(0) == *part)
}

/// `~=X.Y` means at least `X.Y` and still within `X.*`; requires two
/// components or more in the bound.
fn compatible_matches(bound: &str, candidate: &Version) -> bool {
    let Ok(floor) = Version::parse(bound) else {
        return false;
    };
    if floor.components().len() < 2 {
        return false;
    }
    if *candidate < floor {
        return false;
    }
    let prefix = &floor.components()[..floor.components().len() - 1];
    prefix
        .iter()
        .enumerate()
        .all(|(i, part)| candidate.components().get(i).copied().unwrap_or(0) == *part)
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.as_str(), self.version)
    }
}

/// An ordered collection of clauses joined with `,` (logical AND).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecifierSet {
    specifiers: Vec<Specifier>,
}

impl SpecifierSet {
    pub fn new(specifiers: Vec<Specifier>) -> Self {
        Self { specifiers }
    }

    /// A single `==version` pin.
    pub fn exact(version: &str) -> Self {
        Self::new(vec![Specifier::new(CompareOp::Equal, version)])
    }

    pub fn parse(set: &str) -> Result<Self, InvalidSpecifier> {
        let trimmed = set.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        let mut specifiers = Vec::new();
        for clause in trimmed.split(',') {
            if clause.trim().is_empty() {
                return Err(InvalidSpecifier::new(set, "empty clause"));
            }
            specifiers.push(Specifier::parse(clause)?);
        }
        Ok(Self { specifiers })
    }

    pub fn is_empty(&self) -> bool {
        self.specifiers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Specifier> {
        self.specifiers.iter()
    }

    /// Whether `candidate` satisfies every clause in the set. An empty set
    /// matches everything.
    pub fn contains(&self, candidate: &Version) -> bool {
        self.specifiers.iter().all(|s| s.matches(candidate))
    }
}

impl fmt::Display for SpecifierSet {
    /// Clauses render sorted by their text so equal sets print identically
    /// regardless of declaration order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered: Vec<String> = self.specifiers.iter().map(Specifier::to_string).collect();
        rendered.sort();
        f.write_str(&rendered.join(","))
    }
}
