//! Binary-level tests.

use assert_cmd::Command;
use predicates::prelude::*;

const PROJECT: &str = r#"
[project]
name = "app"
version = "1.0.0"

[[deployers.maven]]
type = "nexus2"
name = "main"
active = "always"
url = "https://oss.example.com/service/local"
password = "plain-secret"
staging-repositories = ["target/staging-deploy"]
"#;

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("release.toml"), PROJECT).unwrap();
    dir
}

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("kodegen_bundler_distribute").unwrap();
    cmd.env_remove("RELEASE_DRY_RUN")
        .env_remove("RELEASE_PROJECT_VERSION")
        .env_remove("RELEASE_NEXUS2_MAIN_PASSWORD");
    cmd
}

#[test]
fn test_config_masks_secrets() {
    let dir = project();
    bin()
        .arg("--project-dir")
        .arg(dir.path())
        .args(["config", "--full"])
        .env("RELEASE_NEXUS2_MAIN_USERNAME", "bot")
        .assert()
        .success()
        .stdout(predicate::str::contains("************"))
        .stdout(predicate::str::contains("plain-secret").not())
        .stdout(predicate::str::contains("\"bot\"").not());
}

#[test]
fn test_config_applies_version_override() {
    let dir = project();
    bin()
        .arg("--project-dir")
        .arg(dir.path())
        .args(["--project-version", "9.9.9", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("9.9.9"));
}

#[test]
fn test_missing_configuration_fails() {
    let dir = tempfile::tempdir().unwrap();
    bin()
        .arg("--project-dir")
        .arg(dir.path())
        .arg("config")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("release.toml"));
}

#[test]
fn test_dry_run_release_packages_without_failures() {
    let dir = project();
    let staging = dir.path().join("target/staging-deploy");
    std::fs::create_dir_all(&staging).unwrap();
    std::fs::write(staging.join("app-1.0.0.jar"), "jar").unwrap();

    bin()
        .arg("--project-dir")
        .arg(dir.path())
        .args(["--dry-run", "release", "--sequential"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped (dry run)"));
    assert!(dir.path().join("out/release/main/nexus2/package/staging/0/app-1.0.0.jar").is_file());
}

#[test]
fn test_failed_target_exits_with_one() {
    let dir = project();
    bin()
        .arg("--project-dir")
        .arg(dir.path())
        .arg("release")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("package failed"));
}

#[test]
fn test_blank_version_is_an_argument_error() {
    let dir = project();
    bin()
        .arg("--project-dir")
        .arg(dir.path())
        .args(["--project-version", " ", "config"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid arguments"))
        .stdout(predicate::str::contains("--help"));
}
