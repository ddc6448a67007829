//! Integration tests for apkfetch CLI

use std::process::Command;

#[test]
fn test_cli_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_apkfetch"))
        .arg("--version")
        .output()
        .expect("Failed to execute apkfetch");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("apkfetch"));
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_apkfetch"))
        .arg("--help")
        .output()
        .expect("Failed to execute apkfetch");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["package", "index", "keyring", "lock", "probe"] {
        assert!(stdout.contains(command), "help should list {command}");
    }
}

#[test]
fn test_cli_invalid_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_apkfetch"))
        .arg("invalid-command")
        .output()
        .expect("Failed to execute apkfetch");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn test_malformed_http_auth_fails_before_fetching() {
    let temp = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_apkfetch"))
        .args(["--cache-root"])
        .arg(temp.path())
        .args(["keyring", "--url", "https://packages.example.dev/os/key.rsa.pub"])
        .env("HTTP_AUTH", "bearer:a:b")
        .env("HOME", temp.path())
        .output()
        .expect("Failed to execute apkfetch");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("basic:REALM:USER:PASSWORD"));
}

#[test]
fn test_missing_lockfile() {
    let temp = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_apkfetch"))
        .args(["--cache-root"])
        .arg(temp.path())
        .arg("lock")
        .arg(temp.path().join("apko.lock.json"))
        .env("HOME", temp.path())
        .env_remove("HTTP_AUTH")
        .output()
        .expect("Failed to execute apkfetch");

    assert_eq!(output.status.code(), Some(1));
}
