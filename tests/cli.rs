//! CLIの統合テスト

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tfvc_scm() -> Command {
    let mut cmd = Command::cargo_bin("tfvc-scm").unwrap();
    cmd.env_remove("TFVC_LOCATION")
        .env_remove("TFVC_PROXY")
        .env_remove("TFVC_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    tfvc_scm()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("checkin"))
        .stdout(predicate::str::contains("--tf-path"));
}

#[test]
fn test_missing_tool_location_fails_with_hint() {
    let dir = TempDir::new().unwrap();
    tfvc_scm()
        .args(["--no-color", "-C"])
        .arg(dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"))
        .stderr(predicate::str::contains("--tf-path"));
}

#[test]
fn test_invalid_settings_file_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".tfvc.yml"), "proxy: not-a-url\n").unwrap();
    tfvc_scm()
        .args(["--no-color", "-C"])
        .arg(dir.path())
        .arg("version")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid settings"));
}

#[cfg(unix)]
mod with_fake_tool {
    use super::*;
    use crate::common::{fake_tf_script, script_dir};

    #[test]
    fn test_status_text() {
        let dir = script_dir(&fake_tf_script());
        tfvc_scm()
            .args(["--no-color", "--tf-path", "/bin/sh", "-C"])
            .arg(dir.path())
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("Merge Changes (1)"))
            .stdout(predicate::str::contains("Included Changes (2)"))
            .stdout(predicate::str::contains("/ws/untracked.txt"));
    }

    #[test]
    fn test_status_json_with_exclude() {
        let dir = script_dir(&fake_tf_script());
        let output = tfvc_scm()
            .args(["--no-color", "--tf-path", "/bin/sh", "-C"])
            .arg(dir.path())
            .args(["status", "--exclude", "/ws/README.md", "--output", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["tool_version"], "14.134.0.201708161825");
        assert_eq!(report["count"], 4);
        let excluded = report["groups"]
            .as_array()
            .unwrap()
            .iter()
            .find(|group| group["id"] == "excluded")
            .unwrap();
        assert_eq!(excluded["resources"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_checkin_reports_changeset() {
        let dir = script_dir(&fake_tf_script());
        tfvc_scm()
            .args(["--no-color", "--tf-path", "/bin/sh", "-C"])
            .arg(dir.path())
            .args(["checkin", "-m", "Fix typo", "README.md"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Changeset 42"));
    }

    #[test]
    fn test_workspace_yaml() {
        let dir = script_dir(&fake_tf_script());
        tfvc_scm()
            .args(["--no-color", "--tf-path", "/bin/sh", "-C"])
            .arg(dir.path())
            .args(["workspace", "--output", "yaml"])
            .assert()
            .success()
            .stdout(predicate::str::contains("name: MyWorkspace"))
            .stdout(predicate::str::contains("default_team_project: Fabrikam"));
    }
}
