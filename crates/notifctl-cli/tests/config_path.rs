use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("notifctl")
        .env("NOTIFCTL_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    assert!(!config_path.exists());

    cargo_bin_cmd!("notifctl")
        .env("NOTIFCTL_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("page_size ="));
    assert!(contents.contains("# token ="));
}

#[test]
fn test_config_init_fails_if_exists() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "# existing config").unwrap();

    cargo_bin_cmd!("notifctl")
        .env("NOTIFCTL_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_set_base_url_keeps_comments() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "# my console\npage_size = 25\n").unwrap();

    cargo_bin_cmd!("notifctl")
        .env("NOTIFCTL_HOME", dir.path())
        .args(["config", "set-base-url", "https://console.example.test"])
        .assert()
        .success();

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("# my console"));
    assert!(contents.contains("page_size = 25"));
    assert!(contents.contains("base_url = \"https://console.example.test\""));
}

#[test]
fn test_invalid_page_size_in_config_fails() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "page_size = 0\n").unwrap();

    cargo_bin_cmd!("notifctl")
        .env("NOTIFCTL_HOME", dir.path())
        .args(["bundles"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("page_size"));
}
