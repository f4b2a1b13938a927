//! The window of CPython release series a project can declare support for.

use crate::specifier::SpecifierSet;
use crate::version::Version;
use crate::{NEWEST_PYTHON_SERIES, OLDEST_PYTHON_SERIES};

/// The oldest and newest series the tool knows about.
pub fn series_window() -> (Version, Version) {
    let first = Version::parse(OLDEST_PYTHON_SERIES)
        .unwrap_or_else(|_| Version::from_parts(&[3, 0]));
    let last = Version::parse(NEWEST_PYTHON_SERIES)
        .unwrap_or_else(|_| Version::from_parts(&[3, 0]));
    debug_assert_eq!(first.major(), last.major());
    (first, last)
}

/// Every series in the window that satisfies `constraint`, oldest first.
pub fn supported_series(constraint: &SpecifierSet) -> Vec<Version> {
    let (first, last) = series_window();
    let mut supported = Vec::new();
    for minor in first.minor()..=last.minor() {
        let series = Version::from_parts(&[first.major(), minor]);
        if constraint.contains(&series) {
            supported.push(series);
        }
    }
    supported
}

/// The oldest series in the window that satisfies `constraint`.
pub fn minimal_series(constraint: &SpecifierSet) -> Option<Version> {
    supported_series(constraint).into_iter().next()
}
