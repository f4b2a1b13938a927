use pyver_core::python::{minimal_series, series_window, supported_series};
use pyver_core::specifier::SpecifierSet;
use pyver_core::version::Version;

fn constraint(s: &str) -> SpecifierSet {
    SpecifierSet::parse(s).unwrap()
}

#[test]
fn window_is_a_single_major() {
    let (first, last) = series_window();
    assert_eq!(first.major(), 3);
    assert_eq!(first.major(), last.major());
    assert!(first < last);
}

#[test]
fn bounded_range() {
    let series = supported_series(&constraint(">=3.9,<3.12"));
    let rendered: Vec<String> = series.iter().map(Version::to_string).collect();
    assert_eq!(rendered, vec!["3.9", "3.10", "3.11"]);
}

#[test]
fn open_upper_bound_stops_at_newest_known() {
    let series = supported_series(&constraint(">=3.9"));
    assert_eq!(series.first().unwrap().to_string(), "3.9");
    assert_eq!(
        series.last().unwrap().to_string(),
        pyver_core::NEWEST_PYTHON_SERIES
    );
}

#[test]
fn minimal_is_the_oldest_supported() {
    assert_eq!(
        minimal_series(&constraint(">=3.10,<4")).unwrap().to_string(),
        "3.10"
    );
    assert_eq!(
        minimal_series(&constraint("==3.11.*")).unwrap().to_string(),
        "3.11"
    );
    assert!(minimal_series(&constraint(">=4.0")).is_none());
}
