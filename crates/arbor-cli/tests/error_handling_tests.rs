//! Exit codes and error rendering for arbor-cli.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn arbor(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("arbor").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("--config")
        .arg(home.path().join("config.toml"));
    cmd
}

#[test]
fn test_no_arguments_is_usage_error() {
    let mut cmd = Command::cargo_bin("arbor").unwrap();
    cmd.assert().failure().code(2);
}

#[test]
fn test_unknown_platform_is_usage_error() {
    let home = TempDir::new().unwrap();
    arbor(&home)
        .args(["check", "moviestream", "--platform", "beos"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_error_unknown_blueprint_name() {
    let home = TempDir::new().unwrap();
    arbor(&home)
        .args(["apply", "no-such-blueprint"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Blueprint not found: no-such-blueprint"))
        .stderr(predicate::str::contains("arbor list"));
}

#[test]
fn test_error_missing_blueprint_file() {
    let home = TempDir::new().unwrap();
    arbor(&home)
        .arg("show")
        .arg(home.path().join("missing.tree"))
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Could not load blueprint"));
}

#[test]
fn test_error_unsupported_blueprint_format() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("layout.yaml");
    fs::write(&path, "src/\n").unwrap();

    arbor(&home)
        .arg("show")
        .arg(&path)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains(".tree or .toml"));
}

#[test]
fn test_error_escaping_blueprint_is_rejected_before_any_write() {
    let home = TempDir::new().unwrap();
    let blueprint = home.path().join("escape.tree");
    fs::write(&blueprint, "inside/\n../outside.txt\n").unwrap();
    let root = home.path().join("out");

    arbor(&home)
        .arg("apply")
        .arg(&blueprint)
        .arg(&root)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("'..'"));

    assert!(!root.exists());
    assert!(!home.path().join("outside.txt").exists());
}

#[test]
fn test_error_absolute_path_is_rejected() {
    let home = TempDir::new().unwrap();
    let blueprint = home.path().join("abs.tree");
    fs::write(&blueprint, "/etc/arbor\n").unwrap();

    arbor(&home)
        .arg("check")
        .arg(&blueprint)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Absolute paths not allowed"));
}

#[test]
fn test_error_conflict_reports_each_failure() {
    let home = TempDir::new().unwrap();
    let blueprint = home.path().join("scenario.tree");
    fs::write(&blueprint, "app/\napp/api/\napp/page.tsx\nREADME.md\n").unwrap();
    let root = home.path().join("out");
    fs::create_dir_all(root.join("app")).unwrap();
    fs::write(root.join("app/api"), "i am a file").unwrap();

    arbor(&home)
        .arg("apply")
        .arg(&blueprint)
        .arg(&root)
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("1 of 4 entries failed"))
        .stderr(predicate::str::contains("app/api: ConflictError"));

    // Unrelated entries still succeeded.
    assert!(root.join("app/page.tsx").is_file());
    assert!(root.join("README.md").is_file());
    assert_eq!(fs::read_to_string(root.join("app/api")).unwrap(), "i am a file");
}

#[test]
fn test_error_fail_fast_aborts() {
    let home = TempDir::new().unwrap();
    let blueprint = home.path().join("scenario.tree");
    fs::write(&blueprint, "a/\nb/\nc/\n").unwrap();
    let root = home.path().join("out");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("a"), "").unwrap();

    arbor(&home)
        .arg("apply")
        .arg(&blueprint)
        .arg(&root)
        .arg("--fail-fast")
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("aborted"));

    assert!(!root.join("b").exists());
    assert!(!root.join("c").exists());
}

#[test]
fn test_error_root_is_a_file() {
    let home = TempDir::new().unwrap();
    let blueprint = home.path().join("scenario.tree");
    fs::write(&blueprint, "src/\n").unwrap();
    let root = home.path().join("occupied");
    fs::write(&root, "").unwrap();

    arbor(&home)
        .arg("apply")
        .arg(&blueprint)
        .arg(&root)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unavailable"));
}

#[test]
fn test_error_windows_reserved_name_in_check() {
    let home = TempDir::new().unwrap();
    let blueprint = home.path().join("names.tree");
    fs::write(&blueprint, "lib/\nlib/aux.ts\nlib/utils.ts\n").unwrap();

    arbor(&home)
        .arg("check")
        .arg(&blueprint)
        .args(["--platform", "windows"])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("lib/aux.ts: InvalidNameError"));

    arbor(&home)
        .arg("check")
        .arg(&blueprint)
        .args(["--platform", "unix"])
        .assert()
        .success();
}

#[test]
fn test_error_overwrite_declined_changes_nothing() {
    let home = TempDir::new().unwrap();
    let blueprint = home.path().join("scenario.tree");
    fs::write(&blueprint, "notes.md\n").unwrap();
    let root = home.path().join("out");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("notes.md"), "keep me").unwrap();

    arbor(&home)
        .arg("apply")
        .arg(&blueprint)
        .arg(&root)
        .arg("--overwrite")
        .write_stdin("n\n")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Operation cancelled"));

    assert_eq!(fs::read_to_string(root.join("notes.md")).unwrap(), "keep me");
}

#[test]
fn test_error_malformed_config_file() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("config.toml"), "[defaults\nroot = ").unwrap();

    arbor(&home)
        .arg("list")
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_error_unknown_config_key() {
    let home = TempDir::new().unwrap();
    arbor(&home)
        .args(["config", "get", "defaults.lang"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_error_invalid_config_value_is_not_written() {
    let home = TempDir::new().unwrap();
    arbor(&home)
        .args(["config", "set", "defaults.overwrite", "perhaps"])
        .assert()
        .failure()
        .code(4);

    assert!(!home.path().join("config.toml").exists());
}
