//! Error types for depviz operations.
//!
//! Errors fall into two groups:
//!
//! - **Fatal**: [`ConfigError`], [`ParseError`] and I/O failures while writing
//!   output. These abort the run and surface through [`Error`].
//! - **Recoverable**: [`FetchError`] (one package could not be fetched) and
//!   [`RenderError`] (no image could be produced). These are logged and
//!   recorded, and the run continues.
//!
//! ## Error Philosophy
//!
//! A registry is a remote, partially unreliable source. One unreachable
//! package must never cost the whole graph, so the builder keeps going and
//! reports every skipped package at the end.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for depviz operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for depviz operations.
///
/// These errors prevent the run from completing.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or failed validation
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The offline edge-list file could not be read
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Writing an output file failed
    #[error("failed to write {path}: {source}")]
    Output {
        /// File that could not be written
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The registry HTTP client could not be constructed
    #[error("failed to initialize registry client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file exists but could not be read or created
    #[error("cannot access config file {path}: {source}")]
    Io {
        /// Path of the config file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has a field of the wrong type
    #[error("invalid config file {path}: {source}")]
    Toml {
        /// Path of the config file
        path: PathBuf,
        /// Underlying decode failure
        #[source]
        source: toml::de::Error,
    },

    /// A required key is absent
    #[error("required parameter '{0}' is missing from the configuration")]
    MissingField(&'static str),

    /// A key is present but its value is unusable
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Offending key
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Failure to obtain the direct dependencies of one package.
///
/// Recovered by the graph builder: the package stays a dangling edge target.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP request itself failed (connection, timeout, TLS, ...)
    #[error("request for '{package}' failed: {source}")]
    Transport {
        /// Package being fetched
        package: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The registry answered with a non-success status
    #[error("registry returned {status} for '{package}'")]
    Status {
        /// Package being fetched
        package: String,
        /// HTTP status code
        status: u16,
    },

    /// The response body was not the expected JSON document
    #[error("invalid metadata for '{package}': {reason}")]
    InvalidMetadata {
        /// Package being fetched
        package: String,
        /// What was wrong with the document
        reason: String,
    },
}

impl FetchError {
    /// Package this failure belongs to.
    #[must_use]
    pub fn package(&self) -> &str {
        match self {
            Self::Transport { package, .. }
            | Self::Status { package, .. }
            | Self::InvalidMetadata { package, .. } => package,
        }
    }
}

/// The offline edge-list file could not be read.
#[derive(Debug, Error)]
#[error("cannot read dependency file {path}: {source}")]
pub struct ParseError {
    /// Path of the edge-list file
    pub path: PathBuf,
    /// Underlying I/O or decoding failure
    #[source]
    pub source: std::io::Error,
}

/// The external diagram renderer could not produce an image.
///
/// Recovered by the pipeline: the diagram source is still on disk.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Renderer binary is not on `PATH`
    #[error("renderer '{program}' is not installed")]
    NotInstalled {
        /// Program that was looked up
        program: String,
    },

    /// Renderer ran but exited unsuccessfully
    #[error("renderer '{program}' failed ({status}): {stderr}")]
    Failed {
        /// Program that was run
        program: String,
        /// Exit status description
        status: String,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// Renderer could not be spawned for another reason
    #[error("failed to run renderer '{program}': {source}")]
    Io {
        /// Program that was run
        program: String,
        /// Underlying spawn failure
        #[source]
        source: std::io::Error,
    },
}
