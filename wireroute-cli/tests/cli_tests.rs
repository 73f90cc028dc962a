//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn wireroute_cli() -> Command {
    cargo_bin_cmd!("wireroute-cli")
}

const PARTS: &str = r#"[
    {
        "key": "battery",
        "name": "Battery",
        "width": 64,
        "height": 64,
        "terminals": [
            {"id": "plus", "label": "+", "type": "power+", "x": 64, "y": 16, "exit": "E"},
            {"id": "minus", "label": "-", "type": "power-", "x": 64, "y": 48, "exit": "E"}
        ]
    }
]"#;

const CLEAN_DIAGRAM: &str = r#"{
    "components": [
        {"id": "bat", "partKey": "battery", "name": "Battery", "x": 0, "y": 0},
        {"id": "pdp", "partKey": "battery", "name": "PDP", "x": 256, "y": 0}
    ],
    "wires": [
        {
            "id": "w1",
            "from": {"componentId": "bat", "terminalId": "plus"},
            "to": {"componentId": "pdp", "terminalId": "plus"},
            "type": "power+",
            "netId": "main"
        }
    ]
}"#;

const BROKEN_DIAGRAM: &str = r#"{
    "components": [
        {"id": "bat", "partKey": "battery", "name": "Battery", "x": 0, "y": 0}
    ],
    "wires": [
        {
            "id": "w1",
            "from": {"componentId": "bat", "terminalId": "plus"},
            "to": {"componentId": "ghost", "terminalId": "plus"},
            "type": "power+"
        },
        {
            "id": "w2",
            "from": {"componentId": "bat", "terminalId": "plus"},
            "to": {"componentId": "bat", "terminalId": "minus"},
            "type": "power+",
            "controlPoints": [{"x": 101.0, "y": 53.0}]
        }
    ]
}"#;

fn write_fixtures(dir: &Path, diagram: &str) -> (std::path::PathBuf, std::path::PathBuf) {
    let diagram_path = dir.join("diagram.json");
    let parts_path = dir.join("parts.json");
    std::fs::write(&diagram_path, diagram).unwrap();
    std::fs::write(&parts_path, PARTS).unwrap();
    (diagram_path, parts_path)
}

#[test]
fn test_cli_help() {
    let mut cmd = wireroute_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("diagram"));
}

#[test]
fn test_cli_version() {
    let mut cmd = wireroute_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_check_clean_diagram() {
    let dir = tempfile::tempdir().unwrap();
    let (diagram, parts) = write_fixtures(dir.path(), CLEAN_DIAGRAM);

    let mut cmd = wireroute_cli();
    cmd.arg("check").arg(&diagram).arg("--parts").arg(&parts);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_cli_check_reports_dangling_and_incompatible() {
    let dir = tempfile::tempdir().unwrap();
    let (diagram, parts) = write_fixtures(dir.path(), BROKEN_DIAGRAM);

    let mut cmd = wireroute_cli();
    cmd.arg("check").arg(&diagram).arg("--parts").arg(&parts);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("dangling terminal reference"))
        .stdout(predicate::str::contains("incompatible terminals"));
}

#[test]
fn test_cli_check_fail_on_error() {
    let dir = tempfile::tempdir().unwrap();
    let (diagram, parts) = write_fixtures(dir.path(), BROKEN_DIAGRAM);

    let mut cmd = wireroute_cli();
    cmd.arg("check")
        .arg(&diagram)
        .arg("--parts")
        .arg(&parts)
        .arg("--fail-on")
        .arg("error");

    cmd.assert().code(1);
}

#[test]
fn test_cli_check_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let (diagram, parts) = write_fixtures(dir.path(), BROKEN_DIAGRAM);

    let mut cmd = wireroute_cli();
    cmd.arg("check")
        .arg(&diagram)
        .arg("--parts")
        .arg(&parts)
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"issues\""))
        .stdout(predicate::str::contains("\"errors\""));
}

#[test]
fn test_cli_check_nonexistent_file() {
    let dir = tempfile::tempdir().unwrap();
    let parts = dir.path().join("parts.json");
    std::fs::write(&parts, PARTS).unwrap();

    let mut cmd = wireroute_cli();
    cmd.arg("check")
        .arg(dir.path().join("missing.json"))
        .arg("--parts")
        .arg(&parts);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_clean_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let (diagram, parts) = write_fixtures(dir.path(), BROKEN_DIAGRAM);
    let output = dir.path().join("repaired.json");

    let mut cmd = wireroute_cli();
    cmd.arg("clean")
        .arg(&diagram)
        .arg("--parts")
        .arg(&parts)
        .arg("--output")
        .arg(&output);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Cleaned"));
    let repaired = std::fs::read_to_string(&output).unwrap();
    // Off-grid waypoint snapped by the repair pass.
    assert!(!repaired.contains("101.0"));
}

#[test]
fn test_cli_clean_then_check_is_quiet() {
    let dir = tempfile::tempdir().unwrap();
    let (diagram, parts) = write_fixtures(dir.path(), CLEAN_DIAGRAM);

    let mut cmd = wireroute_cli();
    cmd.arg("clean").arg(&diagram).arg("--parts").arg(&parts);
    cmd.assert().success();

    let mut cmd = wireroute_cli();
    cmd.arg("check")
        .arg(&diagram)
        .arg("--parts")
        .arg(&parts)
        .arg("--fail-on")
        .arg("warning");
    cmd.assert().code(0);
}
