//! PyPI-style JSON registry client.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use super::{DependencySource, extract_dependency_names};
use crate::error::FetchError;

const USER_AGENT: &str = concat!("depviz/", env!("CARGO_PKG_VERSION"));

/// Package metadata document served at `<repo_url>/<package>/json`.
#[derive(Debug, Deserialize)]
struct PackageMetadata {
    info: PackageInfo,
    #[serde(default)]
    releases: HashMap<String, Vec<ReleaseFile>>,
}

#[derive(Debug, Deserialize)]
struct PackageInfo {
    version: String,
    #[serde(default)]
    requires_dist: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ReleaseFile {
    #[serde(default)]
    requires_dist: Option<Vec<String>>,
}

/// Blocking client for a PyPI-compatible JSON API.
#[derive(Debug, Clone)]
pub struct PypiClient {
    base_url: String,
    http: Client,
}

impl PypiClient {
    /// Create a client for `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the underlying client error if the HTTP client (TLS backend)
    /// cannot be initialized.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Metadata URL for `package`.
    #[must_use]
    pub fn metadata_url(&self, package: &str) -> String {
        format!("{}/{}/json", self.base_url, package)
    }

    fn fetch_metadata(&self, package: &str) -> Result<String, FetchError> {
        let url = self.metadata_url(package);
        debug!(package, url = %url, "Fetching package metadata");

        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|source| FetchError::Transport {
                package: package.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                package: package.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(|source| FetchError::Transport {
            package: package.to_string(),
            source,
        })
    }
}

impl DependencySource for PypiClient {
    fn direct_dependencies(&self, package: &str) -> Result<Vec<String>, FetchError> {
        let body = self.fetch_metadata(package)?;
        dependencies_from_metadata(package, &body)
    }
}

/// Extract direct dependency names from a metadata document.
///
/// Requirements attached to the release files of the latest version win;
/// `info.requires_dist` is the fallback when those yield nothing.
fn dependencies_from_metadata(package: &str, body: &str) -> Result<Vec<String>, FetchError> {
    let metadata: PackageMetadata =
        serde_json::from_str(body).map_err(|e| FetchError::InvalidMetadata {
            package: package.to_string(),
            reason: e.to_string(),
        })?;

    let latest = &metadata.info.version;
    let release_requirements = metadata
        .releases
        .get(latest)
        .into_iter()
        .flatten()
        .filter_map(|file| file.requires_dist.as_deref())
        .flatten()
        .map(String::as_str);

    let mut names = extract_dependency_names(package, release_requirements);
    if names.is_empty() {
        let info_requirements = metadata
            .info
            .requires_dist
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(String::as_str);
        names = extract_dependency_names(package, info_requirements);
    }

    debug!(package, version = %latest, count = names.len(), "Resolved direct dependencies");
    Ok(names)
}
