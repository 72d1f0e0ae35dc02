//! Load order, reverse dependencies and cycle membership.

use std::collections::{HashMap, VecDeque};

use indexmap::{IndexMap, IndexSet};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use super::DependencyGraph;

/// Topological order produced by [`load_order`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOrder {
    packages: Vec<String>,
    node_count: usize,
}

impl LoadOrder {
    /// Ordered packages. Every dependent comes before its dependencies.
    #[must_use]
    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    /// Number of nodes in the graph the order was computed from, dangling
    /// targets included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of ordered packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether no package could be ordered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Whether every node was ordered. `false` means the graph has a cycle
    /// and the packages on it are missing.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.packages.len() == self.node_count
    }

    /// The order reversed, so that every package follows all of its
    /// dependencies (the order to install them in).
    #[must_use]
    pub fn install_order(&self) -> Vec<&str> {
        self.packages.iter().rev().map(String::as_str).collect()
    }
}

/// Topologically order `graph` with Kahn's algorithm.
///
/// In-degrees cover every node, keys and dependency values alike. The queue is
/// a strict FIFO seeded in [`DependencyGraph::nodes`] discovery order, so the
/// output is deterministic for a given graph. Nodes on a cycle never reach
/// in-degree zero and are left out; check [`LoadOrder::is_complete`].
#[must_use]
pub fn load_order(graph: &DependencyGraph) -> LoadOrder {
    let mut in_degree: IndexMap<&str, usize> = IndexMap::new();
    for (package, deps) in graph.iter() {
        for dep in deps {
            *in_degree.entry(dep.as_str()).or_insert(0) += 1;
        }
        in_degree.entry(package).or_insert(0);
    }

    let mut queue: VecDeque<&str> = in_degree
        .iter()
        .filter(|&(_, &degree)| degree == 0)
        .map(|(&node, _)| node)
        .collect();
    let mut packages = Vec::with_capacity(in_degree.len());

    while let Some(current) = queue.pop_front() {
        packages.push(current.to_string());

        for dep in graph.dependencies(current).unwrap_or_default() {
            if let Some(degree) = in_degree.get_mut(dep.as_str()) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(dep.as_str());
                }
            }
        }
    }

    let order = LoadOrder {
        packages,
        node_count: in_degree.len(),
    };

    if !order.is_complete() {
        tracing::warn!(
            ordered = order.len(),
            nodes = order.node_count(),
            "Graph contains cycles, load order is incomplete"
        );
    }

    order
}

/// Inverted adjacency: package -> packages that directly depend on it.
///
/// Each dependent is listed once, even if its edge appears more than once.
///
/// Built once from a graph snapshot. It is not kept in sync with the graph;
/// rebuild it if the graph changes.
#[derive(Debug, Clone, Default)]
pub struct ReverseIndex {
    dependents: IndexMap<String, Vec<String>>,
}

impl ReverseIndex {
    /// Invert every edge of `graph`.
    #[must_use]
    pub fn build(graph: &DependencyGraph) -> Self {
        let mut dependents: IndexMap<String, Vec<String>> = IndexMap::new();
        for (package, deps) in graph.iter() {
            for dep in deps {
                let list = dependents.entry(dep.clone()).or_default();
                if !list.iter().any(|p| p == package) {
                    list.push(package.to_string());
                }
            }
        }
        Self { dependents }
    }

    /// Packages that directly depend on `package`, in graph order.
    #[must_use]
    pub fn dependents(&self, package: &str) -> &[String] {
        self.dependents
            .get(package)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Packages that directly depend on `package`.
///
/// Builds a [`ReverseIndex`] for a single lookup; build the index yourself
/// when querying many packages.
#[must_use]
pub fn reverse_dependencies(graph: &DependencyGraph, package: &str) -> Vec<String> {
    ReverseIndex::build(graph).dependents(package).to_vec()
}

/// Packages that sit on at least one cycle, in graph order.
///
/// Uses Tarjan's SCC algorithm over the expanded packages: a package is cyclic
/// if its component has more than one member or it depends on itself. These
/// are exactly the keys missing from an incomplete [`LoadOrder`] that cannot
/// be ordered on their own.
#[must_use]
pub fn cyclic_packages(graph: &DependencyGraph) -> IndexSet<String> {
    let mut digraph: DiGraph<&str, ()> = DiGraph::new();
    let mut node_map: HashMap<&str, NodeIndex> = HashMap::new();

    for package in graph.packages() {
        node_map.insert(package, digraph.add_node(package));
    }
    for (package, deps) in graph.iter() {
        let from = node_map[package];
        for dep in deps {
            if let Some(&to) = node_map.get(dep.as_str()) {
                digraph.add_edge(from, to, ());
            }
        }
    }

    let mut cyclic: IndexSet<&str> = IndexSet::new();
    for component in tarjan_scc(&digraph) {
        let is_cycle = component.len() > 1
            || component
                .first()
                .is_some_and(|&node| digraph.contains_edge(node, node));
        if is_cycle {
            cyclic.extend(component.into_iter().map(|node| digraph[node]));
        }
    }

    graph
        .packages()
        .filter(|package| cyclic.contains(package))
        .map(ToString::to_string)
        .collect()
}
