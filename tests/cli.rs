//! End-to-end runs of the `fintrack` binary against a throwaway home directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with HOME pointed at `home` so settings never touch the real config.
fn fintrack(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fintrack").unwrap();
    cmd.env("HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("FINTRACK_LOG");
    cmd
}

fn initialized() -> TempDir {
    let home = TempDir::new().unwrap();
    let data_dir = home.path().join("data");
    fintrack(&home)
        .args(["init", "--data-dir", data_dir.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created database"));
    home
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    fintrack(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve").and(predicate::str::contains("budget")));
}

#[test]
fn test_commands_require_init() {
    let home = TempDir::new().unwrap();
    fintrack(&home)
        .args(["summary", "--user", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fintrack init"));
}

#[test]
fn test_budget_tracks_expenses() {
    let home = initialized();
    fintrack(&home)
        .args(["register", "alice", "--password", "pw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered alice"));
    fintrack(&home)
        .args(["budget", "add", "--user", "alice", "Shopping", "100"])
        .assert()
        .success();
    fintrack(&home)
        .args(["tx", "add", "--user", "alice", "--type", "expense", "40", "--category", "Shopping"])
        .assert()
        .success();

    fintrack(&home)
        .args(["budget", "list", "--user", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$100.00").and(predicate::str::contains("$40.00")));
}

#[test]
fn test_duplicate_budget_fails() {
    let home = initialized();
    fintrack(&home).args(["register", "bob", "--password", "pw"]).assert().success();
    fintrack(&home)
        .args(["budget", "add", "--user", "bob", "Housing", "1200"])
        .assert()
        .success();
    fintrack(&home)
        .args(["budget", "add", "--user", "bob", "housing", "900"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("A budget for Housing already exists"));
}

#[test]
fn test_login_rejects_wrong_password() {
    let home = initialized();
    fintrack(&home).args(["register", "carol", "--password", "secret"]).assert().success();
    fintrack(&home)
        .args(["login", "carol", "--password", "secret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as carol"));
    fintrack(&home)
        .args(["login", "carol", "--password", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid username or password"));
}

#[test]
fn test_unknown_user_is_an_error() {
    let home = initialized();
    fintrack(&home)
        .args(["tx", "list", "--user", "nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Unknown user: nobody"));
}

#[test]
fn test_demo_loads_once() {
    let home = initialized();
    fintrack(&home)
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo account loaded"));
    fintrack(&home)
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    fintrack(&home)
        .args(["goal", "list", "--user", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Emergency Fund"));
    fintrack(&home)
        .args(["report", "--user", "demo", "--timeframe", "year"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Monthly Trend"));
}

#[test]
fn test_status_counts_rows() {
    let home = initialized();
    fintrack(&home).args(["register", "dave", "--password", "pw"]).assert().success();
    fintrack(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Users:         1"));
}
