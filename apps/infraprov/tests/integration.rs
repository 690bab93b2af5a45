//! Integration tests for the infraprov CLI

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn infraprov(dir: &Path, args: &[&str]) -> Output {
    // keep the user's config file and environment out of the run
    Command::new(env!("CARGO_BIN_EXE_infraprov"))
        .args(["--config", dir.join("config.toml").to_str().unwrap()])
        .args(args)
        .env_remove("INFRAPROV_RESTART_POLICY")
        .env_remove("INFRAPROV_STORAGE_ENABLED")
        .env_remove("INFRAPROV_ROUTE_DOMAIN")
        .env_remove("INFRAPROV_ROUTE_TLS")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute infraprov")
}

fn workspace(config: &str, environment: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.toml"), config).unwrap();
    fs::write(dir.path().join("env.json"), environment).unwrap();
    dir
}

const ENVIRONMENT: &str = r#"{
  "machines": {
    "dev/tooling": {
      "servers": { "ide": { "port": "8080/tcp", "protocol": "http" } },
      "env": { "EDITOR": "vim" },
      "volumes": { "projects": { "path": "/projects" } }
    }
  }
}"#;

#[test]
fn test_cli_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_infraprov"))
        .arg("--version")
        .output()
        .expect("Failed to execute infraprov");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("infraprov"));
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_infraprov"))
        .arg("--help")
        .output()
        .expect("Failed to execute infraprov");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("provision"));
    assert!(stdout.contains("stages"));
}

#[test]
fn test_stages_lists_configured_order() {
    let dir = workspace("[pipeline]\nstages = [\"servers\", \"tls_routes\"]\n", ENVIRONMENT);
    let output = infraprov(dir.path(), &["--json", "stages"]);

    assert!(output.status.success());
    let stages: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        stages,
        serde_json::json!([
            { "name": "servers", "phase": "translation" },
            { "name": "tls_routes", "phase": "augmentation" },
        ])
    );
}

#[test]
fn test_unsound_stage_order_is_rejected() {
    let dir = workspace("[pipeline]\nstages = [\"tls_routes\", \"servers\"]\n", ENVIRONMENT);
    let output = infraprov(dir.path(), &["stages"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stage 'tls_routes' must run after 'servers'"));
}

#[test]
fn test_provision_prints_environment() {
    let dir = workspace("[naming]\nsuffix_length = 6\n", ENVIRONMENT);
    let env_path = dir.path().join("env.json");
    let output = infraprov(
        dir.path(),
        &[
            "--json",
            "provision",
            "--environment",
            env_path.to_str().unwrap(),
            "--workspace-id",
            "ws42",
            "--owner",
            "alice",
        ],
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["workspace_id"], "ws42");
    assert_eq!(report["stages"].as_array().unwrap().len(), 7);

    let pod = &report["environment"]["pods"]["dev"];
    let name = pod["name"].as_str().unwrap();
    assert!(name.starts_with("ws42."));
    assert_eq!(name.len(), "ws42.".len() + 6);
    assert_eq!(pod["labels"]["infraprov.original_name"], "dev");
    assert_eq!(pod["restart_policy"], "never");
    assert_eq!(pod["containers"][0]["env"][0]["value"], "vim");

    let claim = &report["environment"]["storage_claims"]["claim-infraprov-workspace"];
    assert_eq!(claim["mounted_by"][0], name);
    assert_eq!(report["environment"]["warnings"][0]["code"], 4104);
}

#[test]
fn test_provision_failure_exits_nonzero() {
    let dir = workspace(
        "",
        r#"{ "machines": { "dev/tooling": { "servers": { "ide": { "port": "http" } } } } }"#,
    );
    let env_path = dir.path().join("env.json");
    let output = infraprov(
        dir.path(),
        &[
            "provision",
            "--environment",
            env_path.to_str().unwrap(),
            "--workspace-id",
            "ws1",
            "--owner",
            "bob",
        ],
    );

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("server 'ide' declares invalid port 'http'"));
}

#[test]
fn test_json_mode_reports_failure_once() {
    let dir = workspace(
        "",
        r#"{ "machines": { "dev/tooling": { "servers": { "ide": { "port": "0" } } } } }"#,
    );
    let env_path = dir.path().join("env.json");
    let output = infraprov(
        dir.path(),
        &[
            "--json",
            "provision",
            "--environment",
            env_path.to_str().unwrap(),
            "--workspace-id",
            "ws1",
            "--owner",
            "bob",
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Error: ").count(), 1);
    assert!(stderr.contains("Error: server 'ide' declares port 0"));
    // everything before the error report is a JSON log record
    let (logs, _) = stderr.split_once("Error: ").unwrap();
    for line in logs.lines() {
        serde_json::from_str::<serde_json::Value>(line).unwrap();
    }
}

#[test]
fn test_missing_environment_file() {
    let dir = workspace("", ENVIRONMENT);
    let output = infraprov(
        dir.path(),
        &[
            "provision",
            "--environment",
            "/nonexistent/env.json",
            "--workspace-id",
            "ws1",
            "--owner",
            "bob",
        ],
    );

    assert!(!output.status.success());
}
