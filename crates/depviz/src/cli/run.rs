//! `depviz` run implementation.

use std::path::PathBuf;

use depviz::config::Config;
use depviz::pipeline;
use depviz::render::{D2Cli, DiagramRenderer};

use super::display;

/// Options collected from the command line.
pub struct Options {
    /// Path of the config file
    pub config: PathBuf,
    /// Depth limit overriding the config file
    pub max_depth: Option<usize>,
    /// Whether to render the diagram image
    pub render: bool,
}

/// Load the config, run the pipeline and print the report.
pub fn run(options: &Options) -> Result<(), depviz::Error> {
    let mut config = Config::load_or_create(&options.config)?;
    if options.max_depth.is_some() {
        config.max_depth = options.max_depth;
    }

    display::print_config(&config);

    let d2 = D2Cli::default();
    let renderer: Option<&dyn DiagramRenderer> = if options.render { Some(&d2) } else { None };

    let report = pipeline::run(&config, renderer)?;

    display::print_report(&report);

    Ok(())
}
