//! Sources of direct-dependency information.
//!
//! The graph builder only needs one question answered: "what does this
//! package directly depend on?". [`DependencySource`] is that seam, with two
//! implementations:
//!
//! - [`PypiClient`]: fetches `<repo_url>/<package>/json` from a PyPI-style
//!   registry.
//! - [`EdgeListSource`]: answers from a local `A -> B` edge-list file, for
//!   offline runs and tests.

mod edge_list;
mod pypi;

pub use edge_list::{EdgeListSource, collect_from_test_file};
pub use pypi::PypiClient;

use crate::error::FetchError;

/// Requirement names starting with this prefix are environment-conditional
/// pseudo-dependencies, not packages.
pub const MARKER_PREFIX: &str = "python_";

/// Something that can list the direct dependencies of a package.
pub trait DependencySource {
    /// Direct dependency names of `package`, without version constraints.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the package's metadata cannot be obtained.
    fn direct_dependencies(&self, package: &str) -> Result<Vec<String>, FetchError>;
}

impl<S: DependencySource + ?Sized> DependencySource for &S {
    fn direct_dependencies(&self, package: &str) -> Result<Vec<String>, FetchError> {
        (**self).direct_dependencies(package)
    }
}

impl<S: DependencySource + ?Sized> DependencySource for Box<S> {
    fn direct_dependencies(&self, package: &str) -> Result<Vec<String>, FetchError> {
        (**self).direct_dependencies(package)
    }
}

/// Reduce a raw requirement string to the bare package name.
///
/// Everything from the first whitespace on is dropped (version specifiers,
/// environment markers), and so is any extras bracket or specifier glued to
/// the name.
///
/// ```
/// use depviz::registry::bare_name;
///
/// assert_eq!(bare_name("certifi (>=2021.5.30) ; extra == 'security'"), "certifi");
/// assert_eq!(bare_name("PySocks!=1.5.7,>=1.5.6"), "PySocks");
/// ```
#[must_use]
pub fn bare_name(requirement: &str) -> &str {
    let token = requirement.split_whitespace().next().unwrap_or("");
    let end = token
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(token.len());
    &token[..end]
}

/// Normalize a package name: lower-case, with every run of `-`, `_` and `.`
/// collapsed to a single `-`.
///
/// ```
/// use depviz::registry::normalize_name;
///
/// assert_eq!(normalize_name("Charset_Normalizer"), "charset-normalizer");
/// assert_eq!(normalize_name("zope.interface"), "zope-interface");
/// ```
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                normalized.push('-');
            }
            in_separator = true;
        } else {
            normalized.push(c.to_ascii_lowercase());
            in_separator = false;
        }
    }
    normalized
}

/// Turn raw requirement strings into a de-duplicated list of dependency names
/// for `package`.
///
/// Marker pseudo-dependencies and self references are dropped. First-seen
/// order is kept.
pub(crate) fn extract_dependency_names<'a, I>(package: &str, requirements: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let own_name = normalize_name(package);
    let mut names: Vec<String> = Vec::new();

    for requirement in requirements {
        let bare = bare_name(requirement);
        if bare.is_empty() || bare.starts_with(MARKER_PREFIX) {
            continue;
        }
        let name = normalize_name(bare);
        if name == own_name || names.contains(&name) {
            continue;
        }
        names.push(name);
    }

    names
}
