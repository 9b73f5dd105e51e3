#![allow(deprecated)]
//! CLI contract: exit codes, output formats, cache round trip through the fake provider.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const GOOD_RESPONSE: &str = r#"```json
{
  "clauses": [
    {"id": "clause_1", "type": "MAIN", "wordIndices": [0, 1, 2], "parentClauseId": null},
    {"id": "clause_2", "type": "Final", "wordIndices": [3, 4], "parentClauseId": "clause_1", "conjunction": "ἵνα"}
  ],
  "rootClauseId": "clause_1",
  "structureDescription": "Main clause with a purpose clause."
}
```"#;

const TEXT: &str = "ἦλθεν εἰς μαρτυρίαν ἵνα μαρτυρήσῃ";

fn clausetree() -> Command {
    let mut cmd = Command::cargo_bin("clausetree").unwrap();
    for var in [
        "CLAUSETREE_CONFIG",
        "CLAUSETREE_LANGUAGE",
        "CLAUSETREE_USE_CACHE",
        "CLAUSETREE_REFRESH",
        "CLAUSETREE_PRUNE_DUPLICATES",
        "CLAUSETREE_REFERENCE_POLICY",
        "CLAUSETREE_CACHE_DIR",
        "CLAUSETREE_CACHE_TTL",
        "CLAUSETREE_PROVIDER",
        "CLAUSETREE_MODEL",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn fixture(response: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = write(dir.path(), "response.txt", response);
    (dir, path)
}

#[test]
fn validate_success_prints_tree() {
    let (_dir, response) = fixture(GOOD_RESPONSE);
    clausetree()
        .args(["validate", "--subject", "John 1:7", "--text", TEXT, "--response"])
        .arg(&response)
        .assert()
        .success()
        .stdout(predicate::str::contains("clause_1 MAIN"))
        .stdout(predicate::str::contains("  clause_2 SUBORDINATE_PURPOSE [ἵνα]"));
}

#[test]
fn validate_json_reports_owners() {
    let (_dir, response) = fixture(GOOD_RESPONSE);
    let output = clausetree()
        .args(["validate", "--format", "json", "--text", TEXT, "--response"])
        .arg(&response)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["status"], "ok");
    assert_eq!(doc["tree"]["rootId"], "clause_1");
    assert_eq!(doc["owners"][3], "clause_2");
    assert_eq!(doc["diagnostics"].as_array().unwrap().len(), 0);
}

#[test]
fn validate_reads_token_file() {
    let (dir, response) = fixture(GOOD_RESPONSE);
    let tokens = write(
        dir.path(),
        "tokens.json",
        r#"["ἦλθεν", "εἰς", "μαρτυρίαν", "ἵνα", "μαρτυρήσῃ"]"#,
    );
    clausetree()
        .args(["validate", "--tokens"])
        .arg(&tokens)
        .arg("--response")
        .arg(&response)
        .assert()
        .success();
}

#[test]
fn incomplete_coverage_exits_one_and_names_token() {
    let (_dir, response) = fixture(&GOOD_RESPONSE.replace("[3, 4]", "[4]"));
    clausetree()
        .args(["validate", "--text", TEXT, "--response"])
        .arg(&response)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("E_COVERAGE"))
        .stderr(predicate::str::contains("3 \"ἵνα\""));
}

#[test]
fn truncated_response_exits_one_with_code() {
    let (_dir, response) = fixture("{\"clauses\": [], \"rootClauseId\": \"clause_1\",");
    let output = clausetree()
        .args(["validate", "--format", "json", "--text", TEXT, "--response"])
        .arg(&response)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["code"], "E_TRUNCATED");
}

#[test]
fn strict_policy_flag_rejects_dangling_parent() {
    let (_dir, response) = fixture(&GOOD_RESPONSE.replace(
        "\"parentClauseId\": \"clause_1\"",
        "\"parentClauseId\": \"clause_9\"",
    ));
    clausetree()
        .args(["validate", "--text", TEXT, "--response"])
        .arg(&response)
        .assert()
        .success()
        .stderr(predicate::str::contains("W_DANGLING_PARENT"));

    clausetree()
        .args(["validate", "--reference-policy", "strict", "--text", TEXT, "--response"])
        .arg(&response)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("E_REFERENCE"));
}

#[test]
fn missing_response_file_is_config_error() {
    clausetree()
        .args(["validate", "--text", TEXT, "--response", "/nonexistent/response.txt"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read response"));
}

#[test]
fn tokens_and_text_conflict() {
    let (dir, response) = fixture(GOOD_RESPONSE);
    let tokens = write(dir.path(), "tokens.json", "[]");
    clausetree()
        .args(["validate", "--text", TEXT, "--tokens"])
        .arg(&tokens)
        .arg("--response")
        .arg(&response)
        .assert()
        .code(2);
}

#[test]
fn kind_reports_resolution_path() {
    clausetree()
        .args(["kind", "Final", "SUBORDINATE_TIME", "SUBORDINATE_WEIRDKIND"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Final -> SUBORDINATE_PURPOSE (exact)"))
        .stdout(predicate::str::contains("SUBORDINATE_TIME -> SUBORDINATE_TEMPORAL (prefix)"))
        .stdout(predicate::str::contains("SUBORDINATE_WEIRDKIND -> RELATIVE (fallback)"));
}

#[test]
fn analyze_with_fake_provider_uses_cache_on_second_run() {
    let dir = tempdir().unwrap();
    let prompt = write(dir.path(), "prompt.txt", "Split into clauses.");
    let fake = write(dir.path(), "fake.txt", GOOD_RESPONSE);
    let cache_dir = dir.path().join("cache");

    let run = || {
        let output = clausetree()
            .args([
                "analyze",
                "--provider",
                "fake",
                "--subject",
                "John 1:7",
                "--text",
                TEXT,
                "--format",
                "json",
            ])
            .arg("--prompt-file")
            .arg(&prompt)
            .arg("--fake-response")
            .arg(&fake)
            .arg("--cache-dir")
            .arg(&cache_dir)
            .output()
            .unwrap();
        assert_eq!(
            output.status.code(),
            Some(0),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice::<Value>(&output.stdout).unwrap()
    };

    let first = run();
    assert_eq!(first["source"], "generated");
    let second = run();
    assert_eq!(second["source"], "cache");
    assert_eq!(first["tree"], second["tree"]);
}

#[test]
fn analyze_fake_provider_requires_response_file() {
    let dir = tempdir().unwrap();
    let prompt = write(dir.path(), "prompt.txt", "Split into clauses.");
    clausetree()
        .args(["analyze", "--provider", "fake", "--subject", "x", "--text", TEXT])
        .arg("--prompt-file")
        .arg(&prompt)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("fake-response"));
}

#[test]
fn analyze_openai_without_key_is_config_error() {
    let dir = tempdir().unwrap();
    let prompt = write(dir.path(), "prompt.txt", "Split into clauses.");
    clausetree()
        .env_remove("OPENAI_API_KEY")
        .args(["analyze", "--provider", "openai", "--subject", "x", "--text", TEXT])
        .arg("--prompt-file")
        .arg(&prompt)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn version_prints_package_version() {
    clausetree()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
