// tests/cli_test.rs
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the binary in an empty directory with no runner variables set
fn float_tags(dir: &TempDir, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_float-tags"));
    command
        .args(args)
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path());
    for key in [
        "GITHUB_ACTIONS",
        "GITHUB_ACTOR",
        "GITHUB_OUTPUT",
        "GITHUB_REF",
        "TEST_GITHUB_REF",
        "GITHUB_TOKEN",
        "INPUT_TAG",
        "INPUT_DRY-RUN",
        "INPUT_CREATE-RELEASE",
        "INPUT_UPDATE-FULL-RELEASE",
        "INPUT_UPDATE-MAJOR",
        "INPUT_UPDATE-MINOR",
        "INPUT_SKIP-REPO-SETUP",
        "RUNNER_DEBUG",
    ] {
        command.env_remove(key);
    }
    command.output().expect("Failed to execute float-tags")
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    let output = float_tags(&dir, &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("float-tags"));
    assert!(stdout.contains("--update-major"));
    assert!(stdout.contains("--dry-run"));
}

#[test]
fn test_dry_run_prints_executed_commands() {
    let dir = TempDir::new().unwrap();
    let output = float_tags(&dir, &["--dry-run", "--tag", "1.4.0"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("git config user.name nobody"));
    assert!(stdout.contains("git tag --force 1.4"));
    assert!(stdout.contains("git push --force origin 1"));
}

#[test]
fn test_dry_run_writes_github_output() {
    let dir = TempDir::new().unwrap();
    let output_file = dir.path().join("github_output");

    let output = Command::new(env!("CARGO_BIN_EXE_float-tags"))
        .args(["--dry-run", "--tag", "2.0.0", "--update-minor", "false", "--skip-repo-setup"])
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .env("GITHUB_OUTPUT", &output_file)
        .env_remove("GITHUB_ACTIONS")
        .env_remove("GITHUB_TOKEN")
        .output()
        .expect("Failed to execute float-tags");

    assert!(output.status.success());
    let content = fs::read_to_string(&output_file).unwrap();
    assert_eq!(
        content,
        "executed-commands<<EOF\ngit tag --force 2\ngit push --force origin 2\nEOF\n"
    );
}

#[test]
fn test_non_semver_tag_is_not_a_failure() {
    let dir = TempDir::new().unwrap();
    let output = float_tags(&dir, &["--dry-run", "--tag", "nightly"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("does not match"));
}

#[test]
fn test_non_semver_tag_fails_when_requested() {
    let dir = TempDir::new().unwrap();
    let output = float_tags(
        &dir,
        &["--dry-run", "--tag", "nightly", "--fail-on-non-semver-tag"],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Version tag 'nightly' does not match"));
}

#[test]
fn test_missing_tag_fails() {
    let dir = TempDir::new().unwrap();
    let output = float_tags(&dir, &["--dry-run"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Input `tag` was not set"));
}
