//! D2 diagram source generation.

use std::collections::HashSet;
use std::fmt;

use crate::graph::DependencyGraph;

const ROOT_FILL: &str = "#ff6b6b";
const PACKAGE_FILL: &str = "#4ecdc4";
const LEAF_FILL: &str = "#45b7d1";

/// Generate D2 source for `graph` with `root` highlighted.
///
/// Declares every package once (root, then in graph order as first
/// encountered), then emits one `A -> B` edge per graph edge in graph
/// iteration order. Expanded packages and dangling leaves get different
/// fills.
#[must_use]
pub fn render_diagram_source(graph: &DependencyGraph, root: &str) -> String {
    D2Source { graph, root }.to_string()
}

struct D2Source<'a> {
    graph: &'a DependencyGraph,
    root: &'a str,
}

impl fmt::Display for D2Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.graph;
        writeln!(f, "direction: right")?;
        writeln!(f)?;

        let mut declared: HashSet<&str> = HashSet::new();
        declare(f, self.root, ROOT_FILL, true)?;
        declared.insert(self.root);

        for (package, deps) in graph.iter() {
            if declared.insert(package) {
                declare(f, package, PACKAGE_FILL, false)?;
            }
            for dep in deps {
                if declared.insert(dep.as_str()) {
                    let fill = if graph.contains(dep) {
                        PACKAGE_FILL
                    } else {
                        LEAF_FILL
                    };
                    declare(f, dep, fill, false)?;
                }
            }
        }

        if graph.edge_count() > 0 {
            writeln!(f)?;
        }

        for (package, deps) in graph.iter() {
            for dep in deps {
                writeln!(f, "{} -> {}", escape_d2_id(package), escape_d2_id(dep))?;
            }
        }
        Ok(())
    }
}

fn declare(f: &mut fmt::Formatter<'_>, package: &str, fill: &str, bold: bool) -> fmt::Result {
    writeln!(f, "{}: {{", escape_d2_id(package))?;
    writeln!(f, "  style: {{")?;
    writeln!(f, "    fill: \"{fill}\"")?;
    if bold {
        writeln!(f, "    bold: true")?;
    }
    writeln!(f, "  }}")?;
    writeln!(f, "}}")
}

/// Quote a key unless it is a plain identifier.
///
/// `.` nests and `-` can start an arrow in D2, so both force quoting.
fn escape_d2_id(s: &str) -> String {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        s.to_string()
    } else {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_bold_and_red() {
        let graph = DependencyGraph::from_edges([("flask", "jinja2")]);

        let source = render_diagram_source(&graph, "flask");

        assert!(source.starts_with(
            "direction: right\n\nflask: {\n  style: {\n    fill: \"#ff6b6b\"\n    bold: true\n"
        ));
    }

    #[test]
    fn each_package_declared_once_and_edges_follow() {
        let graph = DependencyGraph::from_edges([
            ("app", "lib"),
            ("app", "util"),
            ("lib", "util"),
        ]);

        let source = render_diagram_source(&graph, "app");

        assert_eq!(source.matches("util: {").count(), 1);
        assert_eq!(source.matches("lib: {").count(), 1);
        assert_eq!(source.matches("app: {").count(), 1);

        let edges: Vec<_> = source.lines().filter(|l| l.contains(" -> ")).collect();
        assert_eq!(edges, vec!["app -> lib", "app -> util", "lib -> util"]);

        let last_declaration = source.rfind("}\n").unwrap();
        let first_edge = source.find("app -> lib").unwrap();
        assert!(last_declaration < first_edge);
    }

    #[test]
    fn dangling_leaves_use_leaf_fill() {
        let graph = DependencyGraph::from_edges([("urllib3", "brotli")]);

        let source = render_diagram_source(&graph, "urllib3");

        assert!(source.contains("brotli: {\n  style: {\n    fill: \"#45b7d1\"\n"));
    }

    #[test]
    fn names_with_separators_are_quoted() {
        let graph = DependencyGraph::from_edges([("requests", "charset-normalizer")]);

        let source = render_diagram_source(&graph, "requests");

        assert!(source.contains("\"charset-normalizer\": {"));
        assert!(source.contains("requests -> \"charset-normalizer\""));
    }

    #[test]
    fn empty_graph_declares_only_root() {
        let source = render_diagram_source(&DependencyGraph::new(), "ghost");

        assert_eq!(source.matches(": {\n  style").count(), 1);
        assert!(!source.contains(" -> "));
    }
}
