//! Tests for the `rd` binary

use assert_cmd::Command;
use predicates::prelude::*;
use rescuedaemon::events::MissionEvent;
use tempfile::TempDir;

/// `rd` isolated from the user's config and log directories
fn rd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rd").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    rd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo").and(predicate::str::contains("positions")));
}

#[test]
fn test_demo_text() {
    let home = TempDir::new().unwrap();
    rd(&home)
        .args(["demo", "--victims", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MISSION COMPLETE").and(predicate::str::contains("2/2 victims rescued")));
}

#[test]
fn test_demo_json_lines() {
    let home = TempDir::new().unwrap();
    let output = rd(&home)
        .args(["demo", "--victims", "1", "--enforce-capabilities", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let events: Vec<MissionEvent> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert!(events.iter().any(|e| matches!(e, MissionEvent::MissionCompleted { .. })));
}

#[test]
fn test_bad_param_fails() {
    let home = TempDir::new().unwrap();
    rd(&home)
        .args(["command", "uav_1", "move", "-p", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("key=value"));
}

#[test]
fn test_invalid_config_fails() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("bad.yml");
    std::fs::write(&config, "simulation:\n  timeout-ms: 0\n").unwrap();

    rd(&home)
        .args(["-c", config.to_str().unwrap(), "demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

/// Config file pointing `rd` at a mock simulator
fn simulator_config(home: &TempDir, base_url: &str) -> std::path::PathBuf {
    let path = home.path().join("rescuedaemon.yml");
    std::fs::write(&path, format!("simulation:\n  base-url: {}\n  timeout-ms: 2000\n", base_url)).unwrap();
    path
}

#[test]
fn test_positions_prints_agents() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/agents")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"uav_1": {"x": 100.0, "y": 250.0}}"#)
        .create();
    let config = simulator_config(&home, &server.url());

    rd(&home)
        .args(["-c", config.to_str().unwrap(), "positions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("uav_1").and(predicate::str::contains("250")));
    mock.assert();
}

#[test]
fn test_positions_reports_simulator_failure() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    server.mock("GET", "/agents").with_status(503).with_body("sim down").create();
    let config = simulator_config(&home, &server.url());

    rd(&home)
        .args(["-c", config.to_str().unwrap(), "positions"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sim down"));
}

#[test]
fn test_command_injects_scout_slot() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/command")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "agent_id": "uav_3",
            "command": "scout",
            "params": {"start_x": 100, "start_y": 550}
        })))
        .with_status(200)
        .create();
    let config = simulator_config(&home, &server.url());

    rd(&home)
        .args(["-c", config.to_str().unwrap(), "command", "uav_3", "scout"])
        .assert()
        .success();
    mock.assert();
}
