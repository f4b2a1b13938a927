//! Core data types for the pyver tool.
//!
//! This crate defines the pieces a Python project declaration is made of:
//! dotted versions and specifier sets, requirement strings, Poetry
//! dependency tables, the constraint policy, and format-preserving views
//! over `pyproject.toml` and YAML configuration files.
//!
//! This crate is intentionally free of network I/O.

/// Oldest CPython series ever considered when expanding a support range.
pub const OLDEST_PYTHON_SERIES: &str = "3.0";

/// Newest CPython series the tool knows about. Bump on new releases.
pub const NEWEST_PYTHON_SERIES: &str = "3.14";

pub mod poetry;
pub mod policy;
pub mod pyproject;
pub mod python;
pub mod requirement;
pub mod specifier;
pub mod version;
pub mod yaml;
