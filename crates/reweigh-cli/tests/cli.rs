//! Exit codes of the `reweigh` binary.

use std::fs;
use std::process::Command;

use tempfile::tempdir;

fn reweigh() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_reweigh"));
    command.env_remove("RUST_LOG").arg("--color").arg("never");
    command
}

#[test]
fn evaluate_succeeds_and_writes_report() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("data.csv");
    fs::write(&dataset, "zip,sex\n10001,F\n90001,M\n90001,F\n").unwrap();
    let report = dir.path().join("bias_report.md");

    let output = reweigh()
        .arg("evaluate")
        .arg(&dataset)
        .arg("--output")
        .arg(&report)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(report.exists());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Reference: US Census"));
}

#[test]
fn empty_dataset_exits_with_one() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("empty.csv");
    fs::write(&dataset, "").unwrap();

    let output = reweigh()
        .arg("evaluate")
        .arg(&dataset)
        .arg("--output")
        .arg(dir.path().join("report.md"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}

#[test]
fn listing_commands_succeed() {
    let sources = reweigh().arg("sources").output().unwrap();
    assert!(sources.status.success());
    assert!(String::from_utf8_lossy(&sources.stdout).contains("US Census"));

    let attributes = reweigh().arg("attributes").output().unwrap();
    assert!(attributes.status.success());
    let stdout = String::from_utf8_lossy(&attributes.stdout);
    assert!(stdout.contains("geography"));
    assert!(stdout.contains("gender"));
}
