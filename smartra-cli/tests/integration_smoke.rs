//! Smoke tests for command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn smartra() -> Command {
    let mut cmd = Command::cargo_bin("smartra").unwrap();
    // Keep the developer's own config out of the picture
    cmd.env("SMARTRA_CONFIG", "/nonexistent/smartra-test-config.toml");
    cmd.env_remove("DATABASE_URL");
    cmd.env_remove("SMARTRA_BIND");
    cmd.env_remove("SMARTRA_UPLOAD_DIR");
    cmd
}

// === Estimate Command Tests ===

#[test]
fn test_estimate_hat_adult_dk() {
    let output = smartra()
        .args(["estimate", "hat", "adult", "dk", "--compact"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["estimated_grams"], 200);
    assert_eq!(json["estimated_meters"], 800);
    assert_eq!(json["recommended_skeins"], 4);
}

#[test]
fn test_estimate_unknown_labels_succeed() {
    smartra()
        .args(["estimate", "tea-cosy", "huge", "alpaca"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"estimated_grams\": 300"))
        .stdout(predicate::str::contains("\"yarn_weight\": \"alpaca\""));
}

#[test]
fn test_estimate_gauge_is_accepted() {
    smartra()
        .args(["estimate", "scarf", "long", "chunky", "--gauge", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"estimated_grams\": 600"));
}

#[test]
fn test_estimate_requires_three_labels() {
    smartra().args(["estimate", "hat"]).assert().failure();
}

// === Serve Command Tests ===

#[test]
fn test_serve_help() {
    smartra()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Directory for uploaded attachments"));
}

// === Config Command Tests ===

#[test]
fn test_config_path_honours_env() {
    smartra()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("smartra-test-config.toml"));
}

#[test]
fn test_config_show_defaults() {
    smartra()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[database]"))
        .stdout(predicate::str::contains("127.0.0.1:8000"));
}

#[test]
fn test_config_show_env_override() {
    smartra()
        .env("DATABASE_URL", "postgres://smoke/db")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("postgres://smoke/db"));
}

// === Completions ===

#[test]
fn test_completions_bash() {
    smartra()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("smartra"));
}
