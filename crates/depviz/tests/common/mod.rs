//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Write an offline-mode config for `package` into `dir`, reading edges from
/// `edge_list`. Outputs land next to the config.
pub fn write_offline_config(dir: &Path, package: &str, edge_list: &Path) -> PathBuf {
    let path = dir.join("config.toml");
    let content = format!(
        r#"package_name = "{package}"
repo_url = "https://pypi.org/pypi"
test_mode = true
test_repo_path = "{edges}"
output_file = "{output}"
text_output = "{text}"
diagram_source = "{diagram}"
"#,
        edges = toml_path(edge_list),
        output = toml_path(&dir.join("graph.png")),
        text = toml_path(&dir.join("tree.txt")),
        diagram = toml_path(&dir.join("graph.d2")),
    );
    fs::write(&path, content).expect("Failed to write config");
    path
}

/// Run the depviz binary in `dir`.
pub fn run_depviz_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_depviz"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute depviz binary")
}

fn toml_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "\\\\")
}
