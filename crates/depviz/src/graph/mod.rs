//! Dependency graph construction and analysis.
//!
//! ## Operations
//!
//! | Operation | Algorithm |
//! |-----------|-----------|
//! | Graph construction | Iterative DFS over a [`DependencySource`](crate::registry::DependencySource) |
//! | Cycle detection | DFS with path stack and membership set |
//! | Load order | Kahn's algorithm, FIFO in discovery order |
//! | Cyclic packages | Tarjan's SCC (petgraph) |
//! | Reverse dependencies | Edge inversion, built once |
//!
//! ## Edge Direction
//!
//! Edges point from **dependent -> dependency**: `requests -> urllib3` means
//! `requests` requires `urllib3`.

mod analysis;
mod builder;
mod cycles;

pub use analysis::{LoadOrder, ReverseIndex, cyclic_packages, load_order, reverse_dependencies};
pub use builder::{BuildOutput, FetchFailure, GraphBuilder};
pub use cycles::{Cycle, CycleDedup, detect_cycles, detect_cycles_with};

use indexmap::{IndexMap, IndexSet};

/// Adjacency mapping from package name to its direct dependencies.
///
/// Keys are the packages that were expanded, in discovery order. Dependency
/// lists may name packages that are not keys (dangling targets left by a
/// depth limit or a fetch failure).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    adjacency: IndexMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(dependent, dependency)` pairs.
    ///
    /// Every dependent becomes a key; dependencies only become keys if they
    /// also appear on the left of some pair.
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut graph = Self::new();
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }

    /// Add `package` as a key with no dependencies, if absent.
    pub(crate) fn add_package(&mut self, package: &str) {
        if !self.adjacency.contains_key(package) {
            self.adjacency.insert(package.to_string(), Vec::new());
        }
    }

    /// Append `dependency` to the list of `package`, adding the key if absent.
    pub(crate) fn add_edge(&mut self, package: &str, dependency: &str) {
        self.add_package(package);
        if let Some(deps) = self.adjacency.get_mut(package) {
            deps.push(dependency.to_string());
        }
    }

    /// Direct dependencies of `package`, or `None` if it is not a key.
    #[must_use]
    pub fn dependencies(&self, package: &str) -> Option<&[String]> {
        self.adjacency.get(package).map(Vec::as_slice)
    }

    /// Whether `package` was expanded into a key.
    #[must_use]
    pub fn contains(&self, package: &str) -> bool {
        self.adjacency.contains_key(package)
    }

    /// Iterate `(package, dependencies)` in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.adjacency
            .iter()
            .map(|(name, deps)| (name.as_str(), deps.as_slice()))
    }

    /// Expanded packages in discovery order.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Whether the graph has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Total number of listed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Every node mentioned anywhere in the graph, keys and dependency
    /// values alike.
    ///
    /// Discovery order: for each key in graph order, its dependencies in list
    /// order and then the key itself. A node's first visit fixes its place.
    #[must_use]
    pub fn nodes(&self) -> IndexSet<&str> {
        let mut nodes = IndexSet::new();
        for (package, deps) in self.iter() {
            nodes.extend(deps.iter().map(String::as_str));
            nodes.insert(package);
        }
        nodes
    }

    /// Dependency targets that never became keys.
    #[must_use]
    pub fn dangling(&self) -> IndexSet<&str> {
        self.adjacency
            .values()
            .flatten()
            .map(String::as_str)
            .filter(|dep| !self.contains(dep))
            .collect()
    }
}

impl FromIterator<(String, Vec<String>)> for DependencyGraph {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        let mut graph = Self::new();
        for (package, deps) in iter {
            graph.add_package(&package);
            for dep in deps {
                graph.add_edge(&package, &dep);
            }
        }
        graph
    }
}
