//! # depviz: Python Package Dependency Graphs
//!
//! depviz walks the transitive dependencies of a package, either live from a
//! PyPI-style registry or from an offline `A -> B` edge list, and analyzes the
//! resulting graph.
//!
//! ## Design Philosophy
//!
//! - **Resilient** - One unreachable package is skipped and reported, the
//!   rest of the graph is still built
//! - **Deterministic** - Graph, cycle and load-order output follow insertion
//!   order, never hash order
//! - **Library first** - The CLI is a thin layer over [`pipeline::run`]
//!
//! ## Quick Start
//!
//! ```
//! use depviz::graph::{GraphBuilder, detect_cycles, load_order};
//! use depviz::registry::EdgeListSource;
//!
//! let source = EdgeListSource::parse("app -> web\nweb -> http\nhttp -> web\n");
//! let graph = GraphBuilder::new(source).build("app", None);
//!
//! assert_eq!(graph.len(), 3);
//! assert_eq!(detect_cycles(&graph)[0].to_string(), "web -> http -> web");
//! assert!(!load_order(&graph).is_complete());
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod registry;
pub mod render;

pub use error::{ConfigError, Error, FetchError, ParseError, RenderError, Result};
