//! Release lookups against the PyPI JSON API.
//!
//! Only packages that appear in the policy table without a Poetry entry
//! need a lookup, so failures here are never fatal: callers log the error
//! and leave the dependency list alone.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;

use pyver_core::requirement::canonical_name;
use pyver_core::specifier::SpecifierSet;
use pyver_core::version::Version;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_BASE_URL: &str = "https://pypi.org/pypi";

/// Why a release lookup produced no version.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("network: {message}")]
    Network { message: String },

    #[error("unexpected index payload: {message}")]
    Parse { message: String },

    #[error("no release matching '{constraint}'")]
    NoMatchingRelease { constraint: String },
}

/// Build the shared HTTP client for index lookups.
pub fn build_client() -> Result<Client, LookupError> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent("pyver/0.2")
        .build()
        .map_err(|e| LookupError::Network {
            message: format!("Failed to create HTTP client: {e}"),
        })
}

/// A package index reachable over the PyPI JSON API.
pub struct PackageIndex {
    client: Client,
    base_url: String,
}

impl PackageIndex {
    pub fn new() -> Result<Self, LookupError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point lookups at a different index, mainly for tests and mirrors.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, LookupError> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.into(),
        })
    }

    /// The newest release of `name` that satisfies `constraint`. An empty
    /// constraint selects the newest release overall.
    pub fn latest_matching(
        &self,
        name: &str,
        constraint: &SpecifierSet,
    ) -> Result<Version, LookupError> {
        let url = format!("{}/{}/json", self.base_url, canonical_name(name));
        tracing::debug!("Fetching {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| LookupError::Network {
                message: format!("Request to {url} failed: {e}"),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Network {
                message: format!("HTTP {status} fetching {url}"),
            });
        }

        let payload: Value = response.json().map_err(|e| LookupError::Parse {
            message: format!("Invalid JSON from {url}: {e}"),
        })?;
        let versions = release_versions(&payload)?;
        select_latest(versions.iter().map(String::as_str), constraint)
    }
}

/// The version strings listed under `releases` in an index payload.
pub fn release_versions(payload: &Value) -> Result<Vec<String>, LookupError> {
    let releases = payload
        .get("releases")
        .and_then(Value::as_object)
        .ok_or_else(|| LookupError::Parse {
            message: "missing 'releases' object".to_string(),
        })?;
    Ok(releases.keys().cloned().collect())
}

/// Pick the newest dotted numeric version satisfying `constraint`.
/// Pre-releases and other non-numeric spellings are ignored.
pub fn select_latest<'a>(
    versions: impl Iterator<Item = &'a str>,
    constraint: &SpecifierSet,
) -> Result<Version, LookupError> {
    versions
        .filter_map(|text| Version::parse(text).ok())
        .filter(|version| constraint.contains(version))
        .max()
        .ok_or_else(|| LookupError::NoMatchingRelease {
            constraint: constraint.to_string(),
        })
}
