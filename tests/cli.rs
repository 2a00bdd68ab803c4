//! CLI smoke tests for the offline commands.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd(root: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("verdant").unwrap();
    cmd.env("VERDANT_ROOT", root)
        .env_remove("VERDANT_API_KEY")
        .env_remove("VERDANT_PROJECT_ID")
        // Point config discovery at a file that does not exist so a
        // developer's global config never leaks into the tests.
        .env("VERDANT_CONFIG", root.join("no-such-config.toml"));
    cmd
}

#[test]
fn record_then_badges_awards_green_champion() {
    let dir = tempfile::tempdir().unwrap();

    for _ in 0..5 {
        cmd(dir.path())
            .args(["record", "alice", "sustainability"])
            .assert()
            .success();
    }

    cmd(dir.path())
        .args(["--robot", "badges", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Green Champion"));
}

#[test]
fn four_actions_only_earn_the_placeholder() {
    let dir = tempfile::tempdir().unwrap();

    for _ in 0..4 {
        cmd(dir.path())
            .args(["record", "bob", "sustainability"])
            .assert()
            .success();
    }

    cmd(dir.path())
        .args(["--robot", "badges", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Participant"))
        .stdout(predicate::str::contains("Green Champion").not());
}

#[test]
fn leaderboard_ranks_by_count() {
    let dir = tempfile::tempdir().unwrap();

    let mut seed = |user: &str, kind: &str, n: usize| {
        for _ in 0..n {
            cmd(dir.path()).args(["record", user, kind]).assert().success();
        }
    };
    seed("a", "sustainability", 3);
    seed("b", "safety", 7);
    seed("c", "learning", 7);

    let output = cmd(dir.path())
        .args(["--robot", "leaderboard", "--top", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = payload["data"]["leaderboard"].as_array().unwrap();
    assert_eq!(entries.len(), 2);

    let users: Vec<&str> = entries
        .iter()
        .map(|e| e["user_id"].as_str().unwrap())
        .collect();
    assert!(users.contains(&"b"));
    assert!(users.contains(&"c"));
    assert!(entries.iter().all(|e| e["actions"] == 7));
}

#[test]
fn blank_user_prints_guidance_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();

    cmd(dir.path())
        .args(["record", "  ", "safety"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Employee ID cannot be empty."));
}

#[test]
fn blank_user_is_an_error_in_robot_mode() {
    let dir = tempfile::tempdir().unwrap();

    cmd(dir.path())
        .args(["--robot", "record", "  ", "safety"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"code\":\"validation\""));
}

#[test]
fn tip_without_credentials_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    cmd(dir.path())
        .args([
            "--robot",
            "tip",
            "emp-1",
            "--role",
            "clerk",
            "--environment",
            "office",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("missing_config"));
}

#[test]
fn init_creates_layout() {
    let dir = tempfile::tempdir().unwrap();

    cmd(dir.path())
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    assert!(dir.path().join(".verdant/config.toml").exists());
    assert!(dir.path().join(".verdant/tip_logs").is_dir());
}
