use std::fs;

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn vessel(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vessel").expect("vessel binary is built");
    cmd.arg("--base-dir")
        .arg(temp.path())
        .env_remove("VESSEL_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn list_empty_root() {
    let temp = TempDir::new().expect("tempdir");

    vessel(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No containers"));

    temp.child("containers").assert(predicate::path::is_dir());
}

#[test]
fn list_reports_inactive_directories() {
    let temp = TempDir::new().expect("tempdir");
    temp.child("containers/alpha").create_dir_all().expect("mkdir");

    vessel(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha - Inactive"));
}

#[test]
fn delete_missing_container_fails() {
    let temp = TempDir::new().expect("tempdir");

    vessel(&temp)
        .args(["delete", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Container 'ghost' not found"));
}

#[test]
fn network_backup_delete_restore() {
    let temp = TempDir::new().expect("tempdir");
    temp.child("containers/alpha").create_dir_all().expect("mkdir");
    temp.child("containers/alpha/app.py")
        .write_str("print('alpha')\n")
        .expect("write");

    vessel(&temp)
        .args(["network", "set", "alpha", "--ip", "127.0.0.1", "--port", "9000"])
        .assert()
        .success();
    temp.child("network_config.txt")
        .assert("alpha:127.0.0.1:9000\n");

    vessel(&temp)
        .args(["backup", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha_backup.zip"));

    vessel(&temp).args(["delete", "alpha"]).assert().success();
    temp.child("containers/alpha").assert(predicate::path::missing());

    vessel(&temp)
        .args(["restore", "alpha"])
        .assert()
        .success();
    temp.child("containers/alpha/app.py").assert("print('alpha')\n");

    vessel(&temp)
        .args(["--json", "network", "show", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"port\": 9000"));
}

#[test]
fn config_file_is_honoured() {
    let temp = TempDir::new().expect("tempdir");
    temp.child("config.txt")
        .write_str("containers_folder=envs\ndefault_port=9100\n")
        .expect("write config");
    temp.child("envs/beta").create_dir_all().expect("mkdir");

    vessel(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("beta - Inactive"));

    vessel(&temp)
        .args(["network", "set", "beta"])
        .assert()
        .success();
    temp.child("network_config.txt").assert("beta::9100\n");
}

#[test]
fn malformed_config_falls_back_to_defaults() {
    let temp = TempDir::new().expect("tempdir");
    temp.child("config.txt")
        .write_str("default_port=9090\ngarbage\n")
        .expect("write config");

    vessel(&temp)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_port=8000"));
}

#[test]
fn config_save_writes_defaults() {
    let temp = TempDir::new().expect("tempdir");

    vessel(&temp).args(["config", "save"]).assert().success();

    let saved = fs::read_to_string(temp.child("config.txt").path()).expect("config saved");
    assert!(saved.contains("containers_folder=containers"));
    assert!(saved.contains("default_port=8000"));
}

#[test]
fn log_file_receives_errors() {
    let temp = TempDir::new().expect("tempdir");
    let log = temp.child("vessel.log");

    vessel(&temp)
        .arg("--log-file")
        .arg(log.path())
        .args(["status", "ghost"])
        .assert()
        .failure();

    let logged = fs::read_to_string(log.path()).expect("log file written");
    assert!(logged.contains("ghost"));
}
