//! Configuration loading and validation.
//!
//! Configuration lives in a TOML document (`config.toml` by default):
//!
//! ```toml
//! package_name = "requests"
//! repo_url = "https://pypi.org/pypi"
//! test_mode = false
//! test_repo_path = "test_dependencies.txt"
//! output_file = "dependencies_graph.png"
//! ```
//!
//! When the file does not exist a default one is written and used.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file name, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Default package analyzed when a config file is generated
pub const DEFAULT_PACKAGE: &str = "requests";

/// Default registry base URL
pub const DEFAULT_REPO_URL: &str = "https://pypi.org/pypi";

/// Default text tree output file
pub const DEFAULT_TEXT_OUTPUT: &str = "dependencies_tree.txt";

/// Default D2 diagram source file
pub const DEFAULT_DIAGRAM_SOURCE: &str = "dependencies_graph.d2";

/// Default per-request registry timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// On-disk shape of the config file.
///
/// Every key is optional here so that a missing key is reported by name
/// instead of as a generic decode error.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    package_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    test_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    test_repo_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagram_source: Option<String>,
}

/// Validated run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root package whose dependency graph is built
    pub package_name: String,
    /// Registry base URL (`<repo_url>/<package>/json` is fetched)
    pub repo_url: String,
    /// Read dependencies from `test_repo_path` instead of the registry
    pub test_mode: bool,
    /// Offline edge-list file, required in test mode
    pub test_repo_path: Option<PathBuf>,
    /// Image produced by the external diagram renderer
    pub output_file: PathBuf,
    /// Maximum traversal depth; `None` is unbounded
    pub max_depth: Option<usize>,
    /// Per-request registry timeout
    pub timeout: Duration,
    /// Plain-text tree output
    pub text_output: PathBuf,
    /// D2 diagram source output
    pub diagram_source: PathBuf,
}

impl Config {
    /// Load configuration from `path`, writing a default file first if it
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or written, is
    /// not valid TOML, or fails validation.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "Config file not found, writing defaults");
            return Self::write_default(path);
        }
        Self::load(path)
    }

    /// Load and validate configuration from an existing file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, is not valid
    /// TOML, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::Toml { source, .. } => ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for invalid TOML, a missing required key,
    /// or an unusable value.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: PathBuf::new(),
            source,
        })?;
        Self::validate(raw)
    }

    /// Write the default configuration to `path` and return it.
    fn write_default(path: &Path) -> Result<Self, ConfigError> {
        let raw = RawConfig {
            package_name: Some(DEFAULT_PACKAGE.to_string()),
            repo_url: Some(DEFAULT_REPO_URL.to_string()),
            test_mode: Some(false),
            test_repo_path: Some("test_dependencies.txt".to_string()),
            output_file: Some("dependencies_graph.png".to_string()),
            ..RawConfig::default()
        };
        let content = toml::to_string(&raw).map_err(|e| ConfigError::InvalidValue {
            field: "config",
            reason: e.to_string(),
        })?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        let package_name = raw
            .package_name
            .ok_or(ConfigError::MissingField("package_name"))?;
        let repo_url = raw.repo_url.ok_or(ConfigError::MissingField("repo_url"))?;
        let test_mode = raw.test_mode.ok_or(ConfigError::MissingField("test_mode"))?;
        let output_file = raw
            .output_file
            .ok_or(ConfigError::MissingField("output_file"))?;

        if package_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "package_name",
                reason: "package name must be a non-empty string".to_string(),
            });
        }

        if test_mode && raw.test_repo_path.is_none() {
            return Err(ConfigError::MissingField("test_repo_path"));
        }

        if raw.max_depth == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_depth",
                reason: "depth limit must be at least 1".to_string(),
            });
        }

        if raw.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                reason: "timeout must be at least 1 second".to_string(),
            });
        }

        Ok(Self {
            package_name: package_name.trim().to_string(),
            repo_url,
            test_mode,
            test_repo_path: raw.test_repo_path.map(PathBuf::from),
            output_file: PathBuf::from(output_file),
            max_depth: raw.max_depth,
            timeout: Duration::from_secs(raw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            text_output: PathBuf::from(
                raw.text_output
                    .unwrap_or_else(|| DEFAULT_TEXT_OUTPUT.to_string()),
            ),
            diagram_source: PathBuf::from(
                raw.diagram_source
                    .unwrap_or_else(|| DEFAULT_DIAGRAM_SOURCE.to_string()),
            ),
        })
    }

    /// Key/value pairs for the startup summary, in file order.
    #[must_use]
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("package_name", self.package_name.clone()),
            ("repo_url", self.repo_url.clone()),
            ("test_mode", self.test_mode.to_string()),
        ];
        if let Some(path) = &self.test_repo_path {
            pairs.push(("test_repo_path", path.display().to_string()));
        }
        pairs.push(("output_file", self.output_file.display().to_string()));
        if let Some(depth) = self.max_depth {
            pairs.push(("max_depth", depth.to_string()));
        }
        pairs
    }
}
