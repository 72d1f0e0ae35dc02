//! End-to-end tests against offline edge-list fixtures.
//!
//! Covers the library pipeline and the CLI binary. No network access and no
//! `d2` binary are required.

use std::fs;

use depviz::config::Config;
use depviz::graph::{GraphBuilder, detect_cycles, load_order};
use depviz::pipeline::{self, ImageOutcome};
use depviz::registry::{EdgeListSource, collect_from_test_file};
use rstest::{fixture, rstest};
use tempfile::TempDir;

mod common;
use common::{fixture_path, run_depviz_in_dir, write_offline_config};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Provides a fresh temporary directory for each test
#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

// ============================================================================
// Library Pipeline Tests
// ============================================================================

#[rstest]
fn requests_fixture_builds_full_tree(temp_dir: TempDir) {
    let config_path =
        write_offline_config(temp_dir.path(), "requests", &fixture_path("requests.txt"));
    let config = Config::load(&config_path).unwrap();

    let report = pipeline::run(&config, None).unwrap();

    assert_eq!(report.graph.len(), 9);
    assert_eq!(report.graph.edge_count(), 8);
    assert!(report.failures.is_empty());
    assert!(report.cycles.is_empty());
    assert!(report.load_order.is_complete());
    assert_eq!(report.load_order.packages()[0], "requests");
    assert!(report.root_dependents.is_empty());
    assert!(matches!(report.image, ImageOutcome::Skipped));

    let text = fs::read_to_string(temp_dir.path().join("tree.txt")).unwrap();
    assert!(text.contains("★ requests\n"));
    assert!(text.contains("  urllib3\n    ├── brotli\n    └── h2\n"));
    assert!(text.contains("  certifi\n    (no dependencies)\n"));

    let d2 = fs::read_to_string(temp_dir.path().join("graph.d2")).unwrap();
    assert!(d2.starts_with("direction: right\n"));
    assert!(d2.contains("requests -> \"charset-normalizer\""));
    assert_eq!(d2.matches(" -> ").count(), 8);
}

#[rstest]
fn cycle_fixture_yields_one_cycle_and_empty_order(temp_dir: TempDir) {
    let config_path = write_offline_config(temp_dir.path(), "A", &fixture_path("cycle.txt"));
    let config = Config::load(&config_path).unwrap();

    let report = pipeline::run(&config, None).unwrap();

    assert_eq!(report.cycles.len(), 1);
    assert_eq!(report.cycles[0].packages(), ["A", "B", "C"]);
    assert!(report.load_order.is_empty());
    assert_eq!(
        report.cyclic_packages.iter().collect::<Vec<_>>(),
        vec!["A", "B", "C"]
    );
}

#[rstest]
#[case::root_only(1, 1)]
#[case::one_level(2, 5)]
#[case::unbounded(100, 9)]
fn depth_limit_bounds_expanded_keys(
    temp_dir: TempDir,
    #[case] max_depth: usize,
    #[case] expected_keys: usize,
) {
    let config_path =
        write_offline_config(temp_dir.path(), "requests", &fixture_path("requests.txt"));
    let mut config = Config::load(&config_path).unwrap();
    config.max_depth = Some(max_depth);

    let report = pipeline::run(&config, None).unwrap();

    assert_eq!(report.graph.len(), expected_keys);
}

#[test]
fn collect_from_test_file_returns_direct_successors() {
    let deps = collect_from_test_file(&fixture_path("requests.txt"), "urllib3").unwrap();
    assert_eq!(deps, vec!["brotli", "h2"]);

    let none = collect_from_test_file(&fixture_path("requests.txt"), "certifi").unwrap();
    assert!(none.is_empty());
}

#[test]
fn building_twice_from_fixture_is_identical() {
    let source = EdgeListSource::load(&fixture_path("requests.txt")).unwrap();
    let builder = GraphBuilder::new(source);

    let first = builder.build("requests", None);
    let second = builder.build("requests", None);

    assert_eq!(first, second);
    assert!(detect_cycles(&first).is_empty());
    assert_eq!(load_order(&first), load_order(&second));
}

// ============================================================================
// CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    let output = run_depviz_in_dir(dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("depviz"));
    assert!(stdout.contains("--max-depth"));
    assert!(stdout.contains("--no-render"));
}

#[rstest]
fn test_cli_offline_run_prints_report(temp_dir: TempDir) {
    let config_path = write_offline_config(temp_dir.path(), "A", &fixture_path("cycle.txt"));

    let output = run_depviz_in_dir(
        temp_dir.path(),
        &["--config", config_path.to_str().unwrap(), "--no-render"],
    );

    assert!(
        output.status.success(),
        "depviz failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("package_name: A"));
    assert!(stdout.contains("Cycle 1:"));
    assert!(stdout.contains("A -> B -> C -> A"));
    assert!(stdout.contains("only 0 of 3 packages could be ordered"));
    assert!(temp_dir.path().join("tree.txt").exists());
    assert!(temp_dir.path().join("graph.d2").exists());
    assert!(!temp_dir.path().join("graph.png").exists());
}

#[rstest]
fn test_cli_max_depth_override(temp_dir: TempDir) {
    let config_path =
        write_offline_config(temp_dir.path(), "requests", &fixture_path("requests.txt"));

    let output = run_depviz_in_dir(
        temp_dir.path(),
        &[
            "-c",
            config_path.to_str().unwrap(),
            "--max-depth",
            "1",
            "--no-render",
        ],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Built graph for requests: 1 packages, 4 edges"));
}

#[rstest]
#[case::zero("0")]
#[case::overflows_usize("99999999999999999999999")]
#[case::negative("-1")]
fn test_cli_rejects_unusable_max_depth(temp_dir: TempDir, #[case] depth: &str) {
    let output = run_depviz_in_dir(temp_dir.path(), &[&format!("--max-depth={depth}")]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--max-depth"));
    assert!(!temp_dir.path().join("config.toml").exists());
}

#[rstest]
fn test_cli_invalid_config_fails_with_cause(temp_dir: TempDir) {
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "package_name = \"\"\nrepo_url = \"x\"\ntest_mode = false\noutput_file = \"g.png\"\n",
    )
    .unwrap();

    let output = run_depviz_in_dir(temp_dir.path(), &["-c", config_path.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("package_name"));
}
