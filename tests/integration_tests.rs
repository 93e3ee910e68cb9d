//! Integration tests for backdate

#![allow(deprecated)] // cargo_bin is the standard way to test CLI binaries

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// `backdate` in `dir` with an empty config file and a fixed identity, so no
/// call to `gh api` is needed and the host's config is ignored
fn backdate_in(dir: &TempDir) -> Command {
    let config = dir.path().join("backdate.toml");
    fs::write(&config, "").unwrap();

    let mut cmd = Command::cargo_bin("backdate").unwrap();
    cmd.current_dir(dir.path())
        .arg("--config")
        .arg(&config)
        .env_remove("RUST_LOG")
        .env_remove("BACKDATE_DRY_RUN")
        .env_remove("BACKDATE_REMOTE")
        .env_remove("BACKDATE_BASE_BRANCH")
        .env("GIT_AUTHOR_NAME", "Ada Lovelace")
        .env("GIT_AUTHOR_EMAIL", "ada@example.com")
        .env("GIT_COMMITTER_NAME", "ada-gh")
        .env("GIT_COMMITTER_EMAIL", "ada@example.com");
    cmd
}

// =============================================================================
// CLI Tests
// =============================================================================

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("backdate").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Backdated commits"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("backdate").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_every_subcommand_has_help() {
    for sub in [
        "create-repo",
        "create-branch",
        "commit",
        "open-pr",
        "merge-pr",
        "commit-all",
    ] {
        let mut cmd = Command::cargo_bin("backdate").unwrap();
        cmd.args([sub, "--help"]);
        cmd.assert().success().stdout(predicate::str::contains("--"));
    }
}

#[test]
fn test_merge_pr_help_lists_delete_flags() {
    let mut cmd = Command::cargo_bin("backdate").unwrap();
    cmd.args(["merge-pr", "--help"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--no-delete-branch"))
        .stdout(predicate::str::contains("--date"));
}

#[test]
fn test_merge_pr_needs_branch_or_pr() {
    let mut cmd = Command::cargo_bin("backdate").unwrap();
    cmd.args(["merge-pr", "--date", "2024-06-01"]);

    cmd.assert().failure().code(2);
}

#[test]
fn test_approve_requires_review() {
    let mut cmd = Command::cargo_bin("backdate").unwrap();
    cmd.args(["merge-pr", "--pr", "42", "--date", "2024-06-01", "--approve"]);

    cmd.assert().failure().code(2);
}

#[test]
fn test_private_and_public_conflict() {
    let mut cmd = Command::cargo_bin("backdate").unwrap();
    cmd.args(["create-repo", "demo", "--private", "--public"]);

    cmd.assert().failure().code(2);
}

// =============================================================================
// Behaviour Tests (dry-run, no remote)
// =============================================================================

#[test]
fn test_bad_date_fails_before_any_command() {
    let temp = TempDir::new().unwrap();

    backdate_in(&temp)
        .args([
            "--dry-run",
            "merge-pr",
            "--branch",
            "feature-x",
            "--date",
            "the day before yesterday",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("the day before yesterday"))
        .stderr(predicate::str::contains("[dry-run]").not());
}

#[test]
fn test_dry_run_merge_prints_git_commands() {
    let temp = TempDir::new().unwrap();

    backdate_in(&temp)
        .args([
            "--dry-run",
            "merge-pr",
            "--branch",
            "feature-x",
            "--date",
            "2024-06-01T10:00:00Z",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("[dry-run] git checkout main"))
        .stderr(predicate::str::contains(
            "[dry-run] git merge --no-ff --no-commit feature-x",
        ))
        .stderr(predicate::str::contains("[dry-run] git push origin main"));
}

#[test]
fn test_dry_run_respects_remote_and_base() {
    let temp = TempDir::new().unwrap();

    backdate_in(&temp)
        .args([
            "--dry-run",
            "--remote",
            "upstream",
            "merge-pr",
            "--branch",
            "feature-x",
            "--base",
            "develop",
            "--date",
            "2024-06-01",
            "--no-delete-branch",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("[dry-run] git pull upstream develop"))
        .stderr(predicate::str::contains("--delete").not());
}

#[test]
fn test_dry_run_create_repo_writes_nothing() {
    let temp = TempDir::new().unwrap();

    backdate_in(&temp)
        .args([
            "--dry-run",
            "create-repo",
            "demo",
            "--date",
            "2024-01-15",
            "--public",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("[dry-run] git init --initial-branch=main"))
        .stderr(predicate::str::contains("[dry-run] gh repo create demo --public"));

    assert!(!temp.path().join("demo").exists());
}

#[test]
fn test_create_repo_refuses_non_empty_dir() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("demo");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("notes.txt"), "keep me").unwrap();

    backdate_in(&temp)
        .args(["--dry-run", "create-repo", "demo"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("not empty"));
}

#[test]
fn test_invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("bad.toml");
    fs::write(&config, "unknown_key = 1\n").unwrap();

    let mut cmd = Command::cargo_bin("backdate").unwrap();
    cmd.current_dir(temp.path())
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config)
        .args(["--dry-run", "merge-pr", "--pr", "1", "--date", "2024-06-01"]);

    cmd.assert().failure().code(2);
}
