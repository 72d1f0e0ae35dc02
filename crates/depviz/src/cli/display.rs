//! Console output for a pipeline run.

use colored::Colorize;
use depviz::config::Config;
use depviz::pipeline::{ImageOutcome, Report};

const MAX_DISPLAY_ITEMS: usize = 10;

/// Print the effective configuration.
pub fn print_config(config: &Config) {
    println!("{}", "Configuration".white().bold());
    for (key, value) in config.summary() {
        println!("  {} {}", format!("{key}:").dimmed(), value);
    }
    println!();
}

/// Print everything a run found.
pub fn print_report(report: &Report) {
    println!(
        "Built graph for {}: {} packages, {} edges",
        report.root.white().bold(),
        report.graph.len(),
        report.graph.edge_count()
    );

    print_failures(report);
    print_cycles(report);
    print_load_order(report);
    print_root_dependents(report);
    print_outputs(report);
}

fn print_failures(report: &Report) {
    if report.failures.is_empty() {
        return;
    }

    println!();
    println!(
        "Skipped {} packages whose metadata could not be fetched:",
        report.failures.len().to_string().yellow().bold()
    );
    for failure in report.failures.iter().take(MAX_DISPLAY_ITEMS) {
        println!("    {} {}", "•".dimmed(), failure.error);
    }
    if report.failures.len() > MAX_DISPLAY_ITEMS {
        println!(
            "    {} ... and {} more",
            "•".dimmed(),
            report.failures.len() - MAX_DISPLAY_ITEMS
        );
    }
}

fn print_cycles(report: &Report) {
    println!();
    if report.cycles.is_empty() {
        println!("{}", "No circular dependencies detected.".green());
        return;
    }

    println!(
        "Found {} circular dependencies:",
        report.cycles.len().to_string().red().bold()
    );
    for (i, cycle) in report.cycles.iter().enumerate() {
        println!("  {} {}:", "Cycle".yellow().bold(), i + 1);
        println!("    {}", cycle.to_string().dimmed());
    }
}

fn print_load_order(report: &Report) {
    let order = &report.load_order;

    println!();
    println!("{}", "Load order (dependents first):".white().bold());
    for (i, package) in order.packages().iter().enumerate() {
        println!("  {:>3}. {package}", i + 1);
    }

    if !order.is_complete() {
        println!(
            "  {} only {} of {} packages could be ordered",
            "warning:".yellow().bold(),
            order.len(),
            order.node_count()
        );
        if !report.cyclic_packages.is_empty() {
            let cyclic: Vec<&str> = report.cyclic_packages.iter().map(String::as_str).collect();
            println!("    {} {}", "on a cycle:".dimmed(), cyclic.join(", "));
        }
    }
}

fn print_root_dependents(report: &Report) {
    println!();
    println!(
        "{} {}:",
        "Packages depending on".white().bold(),
        report.root.white().bold()
    );
    if report.root_dependents.is_empty() {
        println!("    {}", "(none)".dimmed());
        return;
    }
    for package in &report.root_dependents {
        println!("    {} {package}", "•".dimmed());
    }
}

fn print_outputs(report: &Report) {
    println!();
    println!("{} {}", "Text tree:".dimmed(), report.text_output.display());
    println!(
        "{} {}",
        "Diagram source:".dimmed(),
        report.diagram_source.display()
    );
    match &report.image {
        ImageOutcome::Rendered(path) => {
            println!("{} {}", "Diagram:".dimmed(), path.display().to_string().green());
        }
        ImageOutcome::Skipped => {
            println!("{} {}", "Diagram:".dimmed(), "not rendered".dimmed());
        }
        ImageOutcome::Failed(error) => {
            println!("{} {} ({error})", "Diagram:".dimmed(), "not rendered".yellow());
        }
    }
}
