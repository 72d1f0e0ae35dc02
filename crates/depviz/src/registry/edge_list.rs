//! Offline dependency source backed by an edge-list file.
//!
//! The file holds one edge per line:
//!
//! ```text
//! A -> B
//! B -> C
//! ```
//!
//! Lines without `->`, or with an empty side, are ignored. Names are taken
//! verbatim (trimmed).

use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use super::DependencySource;
use crate::error::{FetchError, ParseError};

/// Edge-list file loaded into memory.
#[derive(Debug, Clone, Default)]
pub struct EdgeListSource {
    edges: IndexMap<String, Vec<String>>,
}

impl EdgeListSource {
    /// Read and parse the edge-list file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the file cannot be read as UTF-8 text.
    pub fn load(path: &Path) -> Result<Self, ParseError> {
        let content = fs::read_to_string(path).map_err(|source| ParseError {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Self::parse(&content);
        tracing::debug!(
            path = %path.display(),
            packages = source.edges.len(),
            "Loaded edge-list file"
        );
        Ok(source)
    }

    /// Parse edge-list text.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut edges: IndexMap<String, Vec<String>> = IndexMap::new();
        for (from, to) in content.lines().filter_map(parse_edge) {
            edges.entry(from.to_string()).or_default().push(to.to_string());
        }
        Self { edges }
    }

    /// Direct successors of `package`, in file order.
    #[must_use]
    pub fn successors(&self, package: &str) -> &[String] {
        self.edges
            .get(package)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl DependencySource for EdgeListSource {
    fn direct_dependencies(&self, package: &str) -> Result<Vec<String>, FetchError> {
        Ok(self.successors(package).to_vec())
    }
}

/// Read the edge-list file at `path` and return the direct successors of
/// `package`.
///
/// # Errors
///
/// Returns a [`ParseError`] if the file cannot be read.
pub fn collect_from_test_file(path: &Path, package: &str) -> Result<Vec<String>, ParseError> {
    let source = EdgeListSource::load(path)?;
    Ok(source.successors(package).to_vec())
}

fn parse_edge(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split("->");
    let from = parts.next()?.trim();
    let to = parts.next()?.trim();
    if from.is_empty() || to.is_empty() {
        return None;
    }
    Some((from, to))
}
