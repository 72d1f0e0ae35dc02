//! Transitive graph construction over a [`DependencySource`].

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::DependencyGraph;
use crate::error::FetchError;
use crate::registry::DependencySource;

/// A package whose expansion was skipped because its dependencies could not
/// be fetched.
#[derive(Debug)]
pub struct FetchFailure {
    /// Package that was skipped
    pub package: String,
    /// Depth at which it was reached (root is 0)
    pub depth: usize,
    /// Why the fetch failed
    pub error: FetchError,
}

/// Result of a build: the graph plus every skipped package.
#[derive(Debug, Default)]
pub struct BuildOutput {
    /// Completed adjacency mapping
    pub graph: DependencyGraph,
    /// Packages whose fetch failed, in the order they were attempted
    pub failures: Vec<FetchFailure>,
}

/// Builds dependency graphs by walking a [`DependencySource`].
///
/// The builder holds no traversal state between calls: every build starts
/// from a fresh stack, visited set and adjacency map.
#[derive(Debug)]
pub struct GraphBuilder<S> {
    source: S,
}

impl<S: DependencySource> GraphBuilder<S> {
    /// Create a builder over `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The source this builder fetches from.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Build the transitive graph of `start`, dropping fetch failures after
    /// logging them.
    ///
    /// `max_depth` limits expansion: a package reached at `depth >= max_depth`
    /// is listed by its parent but never becomes a key. `None` is unbounded.
    pub fn build(&self, start: &str, max_depth: Option<usize>) -> DependencyGraph {
        self.build_with_failures(start, max_depth).graph
    }

    /// Build the transitive graph of `start` and report every package whose
    /// dependencies could not be fetched.
    ///
    /// Traversal is an iterative depth-first walk over an explicit stack of
    /// `(package, depth)` pairs. Each package is fetched at most once.
    pub fn build_with_failures(&self, start: &str, max_depth: Option<usize>) -> BuildOutput {
        let mut output = BuildOutput::default();
        let mut visited: HashSet<String> = HashSet::new();
        let mut stack: Vec<(String, usize)> = vec![(start.to_string(), 0)];

        while let Some((package, depth)) = stack.pop() {
            if max_depth.is_some_and(|max| depth >= max) {
                debug!(package = %package, depth, "Depth limit reached, not expanding");
                continue;
            }

            if !visited.insert(package.clone()) {
                continue;
            }

            let deps = match self.source.direct_dependencies(&package) {
                Ok(deps) => deps,
                Err(error) => {
                    warn!(
                        package = %package,
                        depth,
                        error = %error,
                        "Failed to fetch dependencies, skipping package"
                    );
                    output.failures.push(FetchFailure {
                        package,
                        depth,
                        error,
                    });
                    continue;
                }
            };

            debug!(package = %package, depth, count = deps.len(), "Expanded package");

            output.graph.add_package(&package);
            for dep in &deps {
                output.graph.add_edge(&package, dep);
                if !visited.contains(dep) {
                    stack.push((dep.clone(), depth + 1));
                }
            }
        }

        info!(
            root = start,
            packages = output.graph.len(),
            edges = output.graph.edge_count(),
            skipped = output.failures.len(),
            "Dependency graph built"
        );

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory source that counts fetches and fails for selected packages.
    #[derive(Default)]
    struct FakeRegistry {
        deps: HashMap<&'static str, Vec<&'static str>>,
        failing: HashSet<&'static str>,
        fetches: RefCell<Vec<String>>,
    }

    impl FakeRegistry {
        fn with(mut self, package: &'static str, deps: &[&'static str]) -> Self {
            self.deps.insert(package, deps.to_vec());
            self
        }

        fn failing(mut self, package: &'static str) -> Self {
            self.failing.insert(package);
            self
        }
    }

    impl DependencySource for FakeRegistry {
        fn direct_dependencies(&self, package: &str) -> Result<Vec<String>, FetchError> {
            self.fetches.borrow_mut().push(package.to_string());
            if self.failing.contains(package) {
                return Err(FetchError::Status {
                    package: package.to_string(),
                    status: 503,
                });
            }
            Ok(self
                .deps
                .get(package)
                .map(|deps| deps.iter().map(ToString::to_string).collect())
                .unwrap_or_default())
        }
    }

    #[test]
    fn root_without_dependencies_yields_single_key() {
        let builder = GraphBuilder::new(FakeRegistry::default());

        let graph = builder.build("six", None);

        assert_eq!(graph.len(), 1);
        assert_eq!(graph.dependencies("six"), Some(&[][..]));
    }

    #[test]
    fn expands_transitively_in_depth_first_order() {
        let registry = FakeRegistry::default()
            .with("requests", &["urllib3", "certifi", "idna"])
            .with("urllib3", &["brotli"]);
        let builder = GraphBuilder::new(registry);

        let graph = builder.build("requests", None);

        // Last pushed dependency is expanded first
        let keys: Vec<_> = graph.packages().collect();
        assert_eq!(keys, vec!["requests", "idna", "certifi", "urllib3", "brotli"]);
        assert_eq!(
            graph.dependencies("requests").unwrap(),
            ["urllib3", "certifi", "idna"]
        );
    }

    #[test]
    fn fetch_failure_leaves_dangling_target() {
        let registry = FakeRegistry::default()
            .with("urllib3", &["brotli", "h2"])
            .failing("brotli");
        let builder = GraphBuilder::new(registry);

        let output = builder.build_with_failures("urllib3", None);

        assert_eq!(output.graph.dependencies("urllib3").unwrap(), ["brotli", "h2"]);
        assert!(!output.graph.contains("brotli"));
        assert!(output.graph.contains("h2"));
        assert_eq!(output.failures.len(), 1);
        assert_eq!(output.failures[0].package, "brotli");
        assert_eq!(output.failures[0].depth, 1);
    }

    #[test]
    fn failing_root_yields_empty_graph() {
        let builder = GraphBuilder::new(FakeRegistry::default().failing("ghost"));

        let output = builder.build_with_failures("ghost", None);

        assert!(output.graph.is_empty());
        assert_eq!(output.failures.len(), 1);
    }

    #[test]
    fn cyclic_registry_fetches_each_package_once() {
        let registry = FakeRegistry::default()
            .with("a", &["b"])
            .with("b", &["c"])
            .with("c", &["a", "b"]);
        let builder = GraphBuilder::new(registry);

        let graph = builder.build("a", None);

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.dependencies("c").unwrap(), ["a", "b"]);
        let mut fetches = builder.source().fetches.borrow().clone();
        fetches.sort();
        assert_eq!(fetches, vec!["a", "b", "c"]);
    }

    #[test]
    fn diamond_fetches_shared_dependency_once() {
        let registry = FakeRegistry::default()
            .with("app", &["left", "right"])
            .with("left", &["base"])
            .with("right", &["base"]);
        let builder = GraphBuilder::new(registry);

        let graph = builder.build("app", None);

        assert_eq!(graph.len(), 4);
        let fetches = builder.source().fetches.borrow();
        assert_eq!(fetches.iter().filter(|p| *p == "base").count(), 1);
    }

    #[test]
    fn depth_limit_stops_expansion_but_keeps_edges() {
        let registry = FakeRegistry::default()
            .with("a", &["b"])
            .with("b", &["c"])
            .with("c", &["d"]);
        let builder = GraphBuilder::new(registry);

        let graph = builder.build("a", Some(2));

        let keys: Vec<_> = graph.packages().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(graph.dependencies("b").unwrap(), ["c"]);
        assert!(!graph.contains("c"));
    }

    #[test]
    fn repeated_builds_are_independent() {
        let registry = FakeRegistry::default()
            .with("a", &["b", "c"])
            .with("b", &["c"]);
        let builder = GraphBuilder::new(registry);

        let first = builder.build("a", None);
        let second = builder.build("a", None);

        assert_eq!(first, second);
        assert_eq!(builder.source().fetches.borrow().len(), 6);
    }
}
