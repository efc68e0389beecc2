//! Integration tests for the `write-completion-items` binary.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_write-completion-items"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .output()
        .expect("failed to run write-completion-items")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

/// Pipeline config that renders `fixture_name` with `cat` instead of rg/pandoc.
fn write_cat_config(dir: &Path, fixture_name: &str, output: &Path) -> PathBuf {
    let yaml = format!(
        r##"generator:
  program: cat
  args: ["{fixture}"]
converter:
  program: cat
required_executables: []
version_commands:
  - program: sh
    args: ["-c", "echo 'fake-rg 14.1.0'"]
section_heading: "# OPTIONS"
output: "{output}"
timeout_ms: 10000
"##,
        fixture = fixture(fixture_name).display(),
        output = output.display(),
    );
    let path = dir.join("pipeline.yml");
    fs::write(&path, yaml).expect("failed to write config");
    path
}

// ---- parse-file / parse-stdin ----

#[test]
fn test_parse_file_json_output() {
    let input = fixture("rg-man.md");
    let output = run(&["parse-file", "--input", path_str(&input)]);

    assert!(
        output.status.success(),
        "parse-file failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("Invalid JSON output: {e}\n{stdout}"));
    let items = parsed.as_array().expect("array of items");
    assert_eq!(items.len(), 12);
    assert_eq!(items[0]["label"], "-e");
    assert_eq!(items[1]["label"], "--regexp");
    assert_eq!(items[0]["documentation"], items[1]["documentation"]);
    assert_eq!(items[0]["documentation"]["kind"], "markdown");
}

#[test]
fn test_parse_file_with_report() {
    let input = fixture("rg-man.md");
    let output = run(&["parse-file", "--input", path_str(&input), "--with-report"]);
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["report"]["outcome"]["found"], 12);
    assert_eq!(parsed["report"]["flag_lines"], 6);
    assert_eq!(parsed["completion_items"].as_array().unwrap().len(), 12);
}

#[test]
fn test_parse_file_markdown_output() {
    let input = fixture("rg-man.md");
    let output = run(&[
        "parse-file",
        "--input",
        path_str(&input),
        "--format",
        "markdown",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("| `--hidden` | Search hidden files and directories. |"));
}

#[test]
fn test_parse_file_missing_section_fails() {
    let input = fixture("no-options.md");
    let output = run(&["parse-file", "--input", path_str(&input)]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"), "stderr: {stderr}");
}

#[test]
fn test_parse_file_missing_section_with_report_succeeds() {
    let input = fixture("no-options.md");
    let output = run(&["parse-file", "--input", path_str(&input), "--with-report"]);
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["report"]["outcome"], "section_not_found");
    assert_eq!(parsed["report"]["failure_code"], "section_not_found");
}

#[test]
fn test_parse_file_custom_heading() {
    let input = fixture("rg-man.md");
    let output = run(&[
        "parse-file",
        "--input",
        path_str(&input),
        "--heading",
        "# EXIT STATUS",
    ]);
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["label"], "-z");
}

#[test]
fn test_parse_stdin() {
    let mut child = Command::new(bin())
        .arg("parse-stdin")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"# OPTIONS\n*-q*, *--quiet*\n> Do not print anything.\n# EXIT STATUS\nmore text\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let expected = "*-q*, *--quiet*\n\nDo not print anything.\n";
    assert_eq!(parsed[0]["label"], "-q");
    assert_eq!(parsed[1]["label"], "--quiet");
    assert_eq!(parsed[0]["documentation"]["value"], expected);
    assert_eq!(parsed[1]["documentation"]["value"], expected);
}

// ---- generate ----

#[cfg(unix)]
#[test]
fn test_generate_writes_items_file() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("lua").join("completion_items.json");
    let config = write_cat_config(dir.path(), "rg-man.md", &out_path);

    let output = run(&["generate", "--config", path_str(&config)]);
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("JSON data successfully written to"));

    let raw = fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["generated"]["from"], "write-completion-items");
    assert_eq!(parsed["versions"][0], "fake-rg 14.1.0");
    assert_eq!(parsed["completion_items"].as_array().unwrap().len(), 12);

    let validate = run(&["validate", path_str(&out_path)]);
    assert!(validate.status.success());
    assert!(String::from_utf8_lossy(&validate.stdout).contains("12 completion item(s)"));
}

#[cfg(unix)]
#[test]
fn test_generate_output_flag_overrides_config_and_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_cat_config(dir.path(), "rg-man.md", &dir.path().join("unused.json"));
    let out_path = dir.path().join("override.json");
    let report_path = dir.path().join("report.json");

    let output = run(&[
        "generate",
        "--config",
        path_str(&config),
        "--output",
        path_str(&out_path),
        "--report",
        path_str(&report_path),
    ]);
    assert!(output.status.success());
    assert!(out_path.exists());
    assert!(!dir.path().join("unused.json").exists());

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["item_count"], 12);
}

#[cfg(unix)]
#[test]
fn test_generate_yaml_does_not_overwrite_json_items() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("completion_items.json");
    let config = write_cat_config(dir.path(), "rg-man.md", &json_path);

    let output = run(&["generate", "--config", path_str(&config), "--format", "yaml"]);
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let yaml_path = dir.path().join("completion_items.yaml");
    assert!(!json_path.exists());
    let yaml = fs::read_to_string(&yaml_path).unwrap();
    assert!(yaml.contains("completion_items:"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("12 completion item(s) written to"), "stdout: {stdout}");
    assert!(stdout.contains("completion_items.yaml"));
}

#[cfg(unix)]
#[test]
fn test_generate_missing_section_fails_loudly() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("items.json");
    let config = write_cat_config(dir.path(), "no-options.md", &out_path);

    let output = run(&["generate", "--config", path_str(&config), "--allow-empty"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: section '# OPTIONS' not found"), "stderr: {stderr}");
    assert!(!out_path.exists());
}

#[test]
fn test_generate_missing_executable_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("pipeline.yml");
    fs::write(
        &config,
        "required_executables: [flag-completions-no-such-tool]\n",
    )
    .unwrap();

    let output = run(&["generate", "--config", path_str(&config)]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("flag-completions-no-such-tool is required on PATH"),
        "stderr: {stderr}"
    );
}

// ---- validate / init-config ----

#[test]
fn test_validate_rejects_bad_labels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    let json = serde_json::json!({
        "generated": { "from": "test", "at": "2024-01-01T00:00:00.000Z" },
        "versions": [],
        "completion_items": [
            { "label": "quiet", "documentation": { "kind": "markdown", "value": "*-q*\n\n" } }
        ]
    });
    fs::write(&path, serde_json::to_string_pretty(&json).unwrap()).unwrap();

    let output = run(&["validate", path_str(dir.path())]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("label is not a flag: quiet"), "stderr: {stderr}");
}

#[test]
fn test_init_config_writes_default_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pipeline.yml");

    let output = run(&["init-config", "--output", path_str(&path)]);
    assert!(output.status.success());

    let yaml = fs::read_to_string(&path).unwrap();
    assert!(yaml.contains("program: rg"));
    assert!(yaml.contains("program: pandoc"));
    assert!(yaml.contains("completion_items.json"));
}
