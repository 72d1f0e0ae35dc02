//! Cycle detection over a built [`DependencyGraph`].

use std::collections::HashSet;
use std::fmt;

use super::DependencyGraph;

/// A closed walk through the graph.
///
/// The last package depends on the first one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cycle {
    packages: Vec<String>,
}

impl Cycle {
    /// Create a cycle from its packages in walk order.
    #[must_use]
    pub fn new(packages: Vec<String>) -> Self {
        Self { packages }
    }

    /// Packages in walk order.
    #[must_use]
    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    /// Number of packages in the cycle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the cycle has no packages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Whether this is a package depending on itself.
    #[must_use]
    pub fn is_self_reference(&self) -> bool {
        self.packages.len() == 1
    }

    /// Whether `package` is part of the cycle.
    #[must_use]
    pub fn contains(&self, package: &str) -> bool {
        self.packages.iter().any(|p| p == package)
    }

    /// The same cycle rotated to start at its lexicographically smallest
    /// package.
    ///
    /// Direction is kept: `a -> b -> c` and `a -> c -> b` stay distinct.
    #[must_use]
    pub fn rotated_to_min(&self) -> Self {
        let min_idx = self
            .packages
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.cmp(b))
            .map_or(0, |(idx, _)| idx);

        let mut packages = Vec::with_capacity(self.packages.len());
        packages.extend_from_slice(&self.packages[min_idx..]);
        packages.extend_from_slice(&self.packages[..min_idx]);
        Self { packages }
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.packages.first() else {
            return Ok(());
        };
        for package in &self.packages {
            write!(f, "{package} -> ")?;
        }
        write!(f, "{first}")
    }
}

/// How detected cycles are de-duplicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleDedup {
    /// Drop a cycle only if the exact same sequence was already recorded.
    /// Rotations of one cycle count as distinct.
    #[default]
    Exact,
    /// Rotate each cycle to start at its smallest package before comparing.
    Rotation,
}

/// One DFS frame: a node and the index of the next dependency to visit.
struct Frame<'g> {
    package: &'g str,
    deps: &'g [String],
    next: usize,
}

/// Find cycles in `graph`, de-duplicating by exact sequence.
///
/// Only edges whose target is itself a key take part: dangling targets were
/// never expanded and cannot close a cycle.
#[must_use]
pub fn detect_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    detect_cycles_with(graph, CycleDedup::Exact)
}

/// Find cycles in `graph` with the given de-duplication policy.
///
/// Depth-first search from each key in graph order, skipping keys already
/// visited from an earlier root, so the pass is O(nodes + edges). The active
/// path is kept twice: as an ordered stack for slicing out the cycle and as a
/// set for membership checks. The search runs on an explicit frame stack.
#[must_use]
pub fn detect_cycles_with(graph: &DependencyGraph, dedup: CycleDedup) -> Vec<Cycle> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_path: HashSet<&str> = HashSet::new();
    let mut path: Vec<&str> = Vec::new();
    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut cycles: Vec<Cycle> = Vec::new();

    for (root, root_deps) in graph.iter() {
        if visited.contains(root) {
            continue;
        }

        visited.insert(root);
        on_path.insert(root);
        path.push(root);
        stack.push(Frame {
            package: root,
            deps: root_deps,
            next: 0,
        });

        while let Some(frame) = stack.last_mut() {
            let deps = frame.deps;
            let Some(dep) = deps.get(frame.next) else {
                on_path.remove(frame.package);
                path.pop();
                stack.pop();
                continue;
            };
            frame.next += 1;

            let Some(dep_deps) = graph.dependencies(dep) else {
                continue;
            };
            let dep = dep.as_str();

            if on_path.contains(dep) {
                if let Some(start) = path.iter().position(|p| *p == dep) {
                    let found = Cycle::new(path[start..].iter().map(ToString::to_string).collect());
                    record(&mut cycles, found, dedup);
                }
            } else if visited.insert(dep) {
                on_path.insert(dep);
                path.push(dep);
                stack.push(Frame {
                    package: dep,
                    deps: dep_deps,
                    next: 0,
                });
            }
        }
    }

    tracing::debug!(
        packages = graph.len(),
        cycles = cycles.len(),
        "Cycle detection complete"
    );

    cycles
}

fn record(cycles: &mut Vec<Cycle>, cycle: Cycle, dedup: CycleDedup) {
    let cycle = match dedup {
        CycleDedup::Exact => cycle,
        CycleDedup::Rotation => cycle.rotated_to_min(),
    };
    if !cycles.contains(&cycle) {
        cycles.push(cycle);
    }
}
