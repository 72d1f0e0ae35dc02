//! Plain-text tree rendering.
//!
//! Renders:
//! ```text
//! Dependency graph for: requests
//! ==================================================
//! ★ requests
//!     ├── urllib3
//!     └── idna
//!   urllib3
//!     (no dependencies)
//! ```

use std::fmt;

use crate::graph::DependencyGraph;

const ROOT_MARKER: &str = "★";
const RULE_WIDTH: usize = 50;
const BRANCH: &str = "├── ";
const CORNER: &str = "└── ";
const NO_DEPENDENCIES: &str = "(no dependencies)";

/// Render `graph` as a text tree with `root` marked.
///
/// The root section comes first, then every other expanded package in graph
/// order, each followed by its direct dependencies.
#[must_use]
pub fn render_text(graph: &DependencyGraph, root: &str) -> String {
    TextTree { graph, root }.to_string()
}

struct TextTree<'a> {
    graph: &'a DependencyGraph,
    root: &'a str,
}

impl fmt::Display for TextTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.root;
        writeln!(f, "Dependency graph for: {root}")?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;

        writeln!(f, "{ROOT_MARKER} {root}")?;
        write_dependencies(f, self.graph.dependencies(root).unwrap_or_default())?;

        for (package, deps) in self.graph.iter().filter(|(package, _)| *package != root) {
            writeln!(f, "  {package}")?;
            write_dependencies(f, deps)?;
        }
        Ok(())
    }
}

fn write_dependencies(f: &mut fmt::Formatter<'_>, deps: &[String]) -> fmt::Result {
    if deps.is_empty() {
        return writeln!(f, "    {NO_DEPENDENCIES}");
    }
    for (i, dep) in deps.iter().enumerate() {
        let connector = if i == deps.len() - 1 { CORNER } else { BRANCH };
        writeln!(f, "    {connector}{dep}")?;
    }
    Ok(())
}
