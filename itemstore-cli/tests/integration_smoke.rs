//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("itemstore").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("init-db"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("itemstore").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--database-url"))
        .stdout(predicate::str::contains("--file-store"))
        .stdout(predicate::str::contains("--connection-policy"));
}

#[test]
fn test_init_db_requires_database_url() {
    let mut cmd = Command::cargo_bin("itemstore").unwrap();
    cmd.arg("init-db").env_remove("DATABASE_URL");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--database-url"));
}

#[test]
fn test_rejects_unknown_file_store() {
    let mut cmd = Command::cargo_bin("itemstore").unwrap();
    cmd.arg("serve").arg("--file-store").arg("floppy");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
