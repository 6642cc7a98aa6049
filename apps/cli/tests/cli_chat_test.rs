//! Integration tests for the interactive `azai chat` command.

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
        .env_remove("RUST_LOG")
        .arg("--engine")
        .arg("mock");
    cmd
}

#[test]
fn test_chat_quit() {
    let temp_dir = TempDir::new().unwrap();

    azai(&temp_dir)
        .arg("chat")
        .write_stdin("/quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("AZ AI Interactive Chat"))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[test]
fn test_chat_exits_on_eof() {
    let temp_dir = TempDir::new().unwrap();

    azai(&temp_dir).arg("chat").write_stdin("").assert().success();
}

#[test]
fn test_chat_mode_switch() {
    let temp_dir = TempDir::new().unwrap();

    azai(&temp_dir)
        .arg("chat")
        .write_stdin("/mode code\nhello\n/quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mode: code"))
        .stdout(predicate::str::contains("AZ AI Code"));
}

#[test]
fn test_chat_game_opens() {
    let temp_dir = TempDir::new().unwrap();

    azai(&temp_dir)
        .arg("chat")
        .write_stdin("/game trivia\n/quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("AZ AI Game Master"))
        .stdout(predicate::str::contains("Start the game."));
}

#[test]
fn test_chat_attachment_applies_once() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("data.txt"), "abc").unwrap();

    let output = azai(&temp_dir)
        .args(["chat", "--mode", "code"])
        .write_stdin("/attach data.txt\nfirst\nsecond\n/quit\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Attached:"));
    assert_eq!(stdout.matches("Attachment: text/plain (3 bytes)").count(), 1);
}

#[test]
fn test_chat_bad_command_keeps_going() {
    let temp_dir = TempDir::new().unwrap();

    azai(&temp_dir)
        .arg("chat")
        .write_stdin("/teleport\n/quit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Unknown command: /teleport"))
        .stdout(predicate::str::contains("Goodbye!"));
}
