//! End-to-end run: build, analyze, write, render.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{ConfigError, Error, RenderError, Result};
use crate::graph::{
    Cycle, DependencyGraph, FetchFailure, GraphBuilder, LoadOrder, ReverseIndex, cyclic_packages,
    detect_cycles, load_order,
};
use crate::registry::{DependencySource, EdgeListSource, PypiClient, normalize_name};
use crate::render::{DiagramRenderer, render_diagram_source, render_text};

/// What happened to the image step.
#[derive(Debug)]
pub enum ImageOutcome {
    /// The renderer wrote an image to this path
    Rendered(PathBuf),
    /// No renderer was supplied
    Skipped,
    /// The renderer failed; the diagram source is still on disk
    Failed(RenderError),
}

/// Everything a run produced.
#[derive(Debug)]
pub struct Report {
    /// Package the graph was built from
    pub root: String,
    /// Completed dependency graph
    pub graph: DependencyGraph,
    /// Packages skipped because their fetch failed
    pub failures: Vec<FetchFailure>,
    /// Detected cycles
    pub cycles: Vec<Cycle>,
    /// Kahn load order, possibly partial
    pub load_order: LoadOrder,
    /// Packages that sit on a cycle
    pub cyclic_packages: IndexSet<String>,
    /// Packages that directly depend on the root
    pub root_dependents: Vec<String>,
    /// Text tree file
    pub text_output: PathBuf,
    /// D2 source file
    pub diagram_source: PathBuf,
    /// Image step result
    pub image: ImageOutcome,
}

/// Run the whole pipeline for `config`.
///
/// Passing `None` for `renderer` writes the diagram source but skips the image.
///
/// # Errors
///
/// Returns an error if the dependency source cannot be set up or an output
/// file cannot be written. Fetch and render failures are recorded in the
/// [`Report`] instead.
pub fn run(config: &Config, renderer: Option<&dyn DiagramRenderer>) -> Result<Report> {
    let source = open_source(config)?;
    run_with_source(config, &root_package(config), source, renderer)
}

/// Name the graph is rooted at.
///
/// Registry names are normalized, so the configured root is too; edge-list
/// names are used as written.
#[must_use]
pub fn root_package(config: &Config) -> String {
    if config.test_mode {
        config.package_name.clone()
    } else {
        normalize_name(&config.package_name)
    }
}

/// Run the pipeline from `root` against an already constructed dependency
/// source.
///
/// # Errors
///
/// Returns [`Error::Output`] if an output file cannot be written.
pub fn run_with_source<S: DependencySource>(
    config: &Config,
    root: &str,
    source: S,
    renderer: Option<&dyn DiagramRenderer>,
) -> Result<Report> {

    let build = GraphBuilder::new(source).build_with_failures(root, config.max_depth);
    let graph = build.graph;

    let cycles = detect_cycles(&graph);
    let order = load_order(&graph);
    let cyclic = cyclic_packages(&graph);
    let root_dependents = ReverseIndex::build(&graph).dependents(root).to_vec();

    info!(
        cycles = cycles.len(),
        ordered = order.len(),
        nodes = order.node_count(),
        "Analysis complete"
    );

    write_output(&config.text_output, &render_text(&graph, root))?;
    write_output(&config.diagram_source, &render_diagram_source(&graph, root))?;

    let image = match renderer {
        None => ImageOutcome::Skipped,
        Some(renderer) => match renderer.render(&config.diagram_source, &config.output_file) {
            Ok(path) => {
                info!(path = %path.display(), "Diagram rendered");
                ImageOutcome::Rendered(path)
            }
            Err(error) => {
                warn!(
                    error = %error,
                    diagram = %config.diagram_source.display(),
                    "Diagram rendering failed, diagram source kept"
                );
                ImageOutcome::Failed(error)
            }
        },
    };

    Ok(Report {
        root: root.to_string(),
        graph,
        failures: build.failures,
        cycles,
        load_order: order,
        cyclic_packages: cyclic,
        root_dependents,
        text_output: config.text_output.clone(),
        diagram_source: config.diagram_source.clone(),
        image,
    })
}

fn open_source(config: &Config) -> Result<Box<dyn DependencySource>> {
    if config.test_mode {
        let path = config
            .test_repo_path
            .as_deref()
            .ok_or(ConfigError::MissingField("test_repo_path"))?;
        info!(path = %path.display(), "Using offline edge list");
        Ok(Box::new(EdgeListSource::load(path)?))
    } else {
        info!(registry = %config.repo_url, "Using package registry");
        let client = PypiClient::new(&config.repo_url, config.timeout).map_err(Error::Client)?;
        Ok(Box::new(client))
    }
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::Output {
            path: path.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| Error::Output {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Wrote output");
    Ok(())
}
