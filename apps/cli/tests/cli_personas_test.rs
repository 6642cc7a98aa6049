//! Integration tests for `azai personas` and `azai config`.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn azai(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("azai").unwrap();
    cmd.current_dir(temp_dir.path())
        .env("HOME", temp_dir.path())
        .env_remove("AZAI_ENGINE")
        .env_remove("GEMINI_API_KEY")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_personas_list() {
    let temp_dir = TempDir::new().unwrap();

    azai(&temp_dir)
        .arg("personas")
        .assert()
        .success()
        .stdout(predicate::str::contains("Personas (5)"))
        .stdout(predicate::str::contains("chatgpt"));
}

#[test]
fn test_personas_json() {
    let temp_dir = TempDir::new().unwrap();

    let output = azai(&temp_dir).args(["personas", "--json"]).output().unwrap();
    assert!(output.status.success());

    let personas: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(personas.len(), 5);
    assert!(personas.iter().all(|p| p["instruction"].is_string()));
}

#[test]
fn test_config_init_and_show() {
    let temp_dir = TempDir::new().unwrap();

    azai(&temp_dir)
        .args(["config", "init", "--local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));
    assert!(temp_dir.path().join(".azairc").exists());

    azai(&temp_dir)
        .args(["config", "init", "--local"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    azai(&temp_dir)
        .env("GEMINI_API_KEY", "AIzaSyExample1234")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_key = \"****1234\""))
        .stdout(predicate::str::contains("AIzaSyExample").not());
}

#[test]
fn test_no_command_prints_help() {
    let temp_dir = TempDir::new().unwrap();

    azai(&temp_dir).assert().success().stdout(predicate::str::contains("Usage:"));
}
