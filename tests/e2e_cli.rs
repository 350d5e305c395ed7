//! CLI end-to-end tests
//!
//! Tests for the seedlink command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

const ENV_VARS: &[&str] = &[
    "EXPORT_DOMAIN",
    "EXPORT_PREMIUM_DOMAIN",
    "EXPORT_API_KEY",
    "EXPORT_API_SECRET",
    "EXPORT_API_ROLE",
    "EXPORT_USE_SUBDOMAINS",
    "EXPORT_K8S_POOL",
    "EXPORT_PATH_PREFIX",
    "EXPORT_PROXY_API_KEY",
    "EXPORT_PROXY_API_SECRET",
    "EXPORT_PROXY_TOKEN_TTL",
    "VIDEO_INFO_SERVICE_HOST",
    "VIDEO_INFO_SERVICE_PORT",
];

/// Get a command for the seedlink binary with a clean environment
#[allow(deprecated)]
fn seedlink_cmd() -> Command {
    let mut cmd = Command::cargo_bin("seedlink").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd
}

fn export_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_cli_no_args_shows_help() {
    seedlink_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    seedlink_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("seedlink"));
}

#[test]
fn test_cli_generate_secret() {
    seedlink_cmd()
        .arg("generate-secret")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[0-9a-f]{64}\n$").unwrap());
}

#[test]
fn test_cli_export_from_flags() {
    let json = export_json(seedlink_cmd().args([
        "export",
        "--resource",
        "abc123",
        "--path",
        "season1/e01.mkv",
        "--media-format",
        "video",
        "--types",
        "download,stream",
        "--domain",
        "example.com",
        "--use-subdomains",
        "false",
    ]));

    let items = json["export_items"].as_object().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(
        json["export_items"]["download"]["url"],
        "https://example.com/abc123/season1/e01.mkv"
    );
    assert_eq!(json["export_items"]["stream"]["tag"]["name"], "video");
    assert_eq!(json["source"]["media_format"], "video");
}

#[test]
fn test_cli_export_reads_env_and_config_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("seedlink.json");
    fs::write(
        &config_path,
        r#"{"export": {"use_subdomains": false, "path_prefix": "/files"}}"#,
    )
    .unwrap();

    let json = export_json(
        seedlink_cmd()
            .env("EXPORT_DOMAIN", "env.example.com")
            .env("VIDEO_INFO_SERVICE_HOST", "video-info")
            .arg("--config")
            .arg(&config_path)
            .args([
                "export",
                "--resource",
                "abc123",
                "--path",
                "e01.mkv",
                "--media-format",
                "video",
                "--types",
                "subtitles",
                "--param",
                "lang=en",
            ]),
    );

    assert_eq!(
        json["export_items"]["subtitles"]["url"],
        "https://env.example.com/files/abc123/e01.mkv~vi/subtitles.json?lang=en"
    );
}

#[test]
fn test_cli_export_unknown_type_fails() {
    seedlink_cmd()
        .args([
            "export",
            "--resource",
            "abc123",
            "--path",
            "a.mkv",
            "--types",
            "download,bogus",
            "--domain",
            "example.com",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown export type \"bogus\""));
}

#[test]
fn test_cli_signed_export_verifies() {
    let json = export_json(seedlink_cmd().args([
        "export",
        "--resource",
        "abc123",
        "--path",
        "a.bin",
        "--types",
        "torrent_client_stat",
        "--domain",
        "example.com",
        "--api-key",
        "k",
        "--api-secret",
        "s",
    ]));
    let raw = json["export_items"]["torrent_client_stat"]["url"].as_str().unwrap();
    let url = url::Url::parse(raw).unwrap();
    let token = url
        .query_pairs()
        .find(|(k, _)| k == "token")
        .map(|(_, v)| v.into_owned())
        .unwrap();

    seedlink_cmd()
        .args(["verify-token", &token, "--api-key", "k", "--api-secret", "s"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"rid\": \"abc123\""));

    seedlink_cmd()
        .args(["verify-token", &token, "--api-key", "k", "--api-secret", "other"])
        .assert()
        .failure();

    seedlink_cmd()
        .args(["verify-token", &token, "--proxy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("proxy_signing credentials are not configured"));
}

#[test]
fn test_cli_validate_reports_warnings() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(
        &config_path,
        r#"{"export": {"domain": "example.com"}, "proxy_signing": {"required": true}}"#,
    )
    .unwrap();

    seedlink_cmd()
        .arg("validate")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("proxy_signing.required").count(1))
        .stdout(predicate::str::contains("Domain: example.com"))
        .stderr(predicate::str::contains("proxy_signing.required").not());
}

#[test]
fn test_cli_export_refuses_dot_segments() {
    seedlink_cmd()
        .args([
            "export",
            "--resource",
            "..",
            "--path",
            "season1/e01.mkv",
            "--domain",
            "example.com",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dot segment"));

    seedlink_cmd()
        .args([
            "export",
            "--resource",
            "abc123",
            "--path",
            "season1/../secret.mkv",
            "--domain",
            "example.com",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dot segment"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_cli_validate_rejects_bad_json() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, "{ not json").unwrap();

    seedlink_cmd()
        .arg("validate")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("config parse error"));
}
