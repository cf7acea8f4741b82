// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::{json, Value};

fn saaskart() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_saaskart"));
    cmd.env_remove("SAASKART_POLICY_ROOT")
        .env_remove("SAASKART_LOG_LEVEL");
    cmd
}

fn run_json(args: &[&str]) -> Value {
    let output = saaskart()
        .arg("--json")
        .args(args)
        .output()
        .expect("run saaskart");
    assert!(
        output.status.success(),
        "{args:?}: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json stdout")
}

fn snapshot() -> Value {
    json!({
        "categories": [
            {"id": "analytics", "name": "Analytics"},
            {"id": "crm", "name": "CRM"}
        ],
        "companies": [
            {"id": "acme", "name": "Acme Analytics", "country": "US",
             "metrics": {"revenue": 5000000.0}, "categories": ["analytics"]},
            {"id": "bolt", "name": "Bolt CRM", "country": "DE",
             "metrics": {"revenue": 9000000.0}, "categories": ["crm"]},
            {"id": "cirrus", "name": "Cirrus", "country": "US"}
        ]
    })
}

fn seeded_db(dir: &Path) -> PathBuf {
    let db = dir.join("saaskart.sqlite");
    let file = dir.join("snapshot.json");
    fs::write(&file, snapshot().to_string()).expect("write snapshot");
    let db_arg = db.to_str().expect("utf8 path");
    run_json(&["init-db", "--db", db_arg]);
    let imported = run_json(&[
        "import",
        "--db",
        db_arg,
        "--file",
        file.to_str().expect("utf8 path"),
    ]);
    assert_eq!(imported["companies"], 3);
    assert_eq!(imported["categories"], 2);
    db
}

fn company_ids(response: &Value) -> Vec<String> {
    response["companies"]
        .as_array()
        .expect("companies")
        .iter()
        .map(|r| r["company"]["id"].as_str().expect("id").to_string())
        .collect()
}

#[test]
fn help_lists_every_command() {
    let output = saaskart().arg("--help").output().expect("help");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8");
    for command in [
        "init-db",
        "import",
        "search",
        "facet-options",
        "explain",
        "registry",
    ] {
        assert!(text.contains(command), "{command}");
    }
}

#[test]
fn registry_lists_all_facets() {
    let registry = run_json(&["registry"]);
    let facets = registry["facets"].as_array().expect("facets");
    assert_eq!(facets.len(), 27);
    assert!(facets
        .iter()
        .any(|f| f["name"] == "categories" && f["kind"] == "multiselect"));
}

#[test]
fn search_defaults_to_revenue_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = seeded_db(dir.path());
    let db_arg = db.to_str().expect("utf8 path");

    let all = run_json(&["search", "--db", db_arg]);
    assert_eq!(company_ids(&all), vec!["bolt", "acme", "cirrus"]);

    let us = run_json(&[
        "search", "--db", db_arg, "-p", "countries=US", "-p", "sort=name", "-p", "noise=1",
    ]);
    assert_eq!(company_ids(&us), vec!["acme", "cirrus"]);
}

#[test]
fn facet_options_and_explain() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = seeded_db(dir.path());
    let db_arg = db.to_str().expect("utf8 path");

    let countries = run_json(&["facet-options", "--db", db_arg, "countries"]);
    assert_eq!(countries["options"]["kind"], "values");
    assert_eq!(
        countries["options"]["options"],
        json!([{"label": "DE", "value": "DE"}, {"label": "US", "value": "US"}])
    );

    let downloads = run_json(&["facet-options", "--db", db_arg, "downloads"]);
    assert_eq!(downloads["options"]["kind"], "range_unavailable");

    let explain = run_json(&["explain", "--db", db_arg, "-p", "countries=US"]);
    assert!(explain["sql"].as_str().expect("sql").contains("c.country IN (?)"));
    assert_eq!(explain["params"][0], "US");
    assert!(!explain["plan"].as_array().expect("plan").is_empty());
    assert_eq!(explain["query_hash"].as_str().expect("hash").len(), 64);
}

#[test]
fn unknown_facet_options_exit_with_usage_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = seeded_db(dir.path());
    let output = saaskart()
        .args(["--json", "facet-options", "--db"])
        .arg(&db)
        .arg("query")
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(2));
    let err: Value = serde_json::from_slice(&output.stderr).expect("machine error");
    assert_eq!(err["code"], "UnknownFacet");
}

#[test]
fn missing_database_is_a_dependency_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = saaskart()
        .args(["--json", "search", "--db"])
        .arg(dir.path().join("absent.sqlite"))
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(4));
    let err: Value = serde_json::from_slice(&output.stderr).expect("machine error");
    assert_eq!(err["code"], "StorageFailure");
}

#[test]
fn invalid_snapshot_is_a_validation_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("bad.json");
    fs::write(
        &file,
        json!({"companies": [{"id": "a", "name": "A", "categories": ["nope"]}]}).to_string(),
    )
    .expect("write");
    let output = saaskart()
        .args(["--json", "import", "--db"])
        .arg(dir.path().join("db.sqlite"))
        .arg("--file")
        .arg(&file)
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(3));
    let err: Value = serde_json::from_slice(&output.stderr).expect("machine error");
    assert_eq!(err["code"], "ImportFailed");
}

#[test]
fn invalid_policy_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = seeded_db(dir.path());
    let policy_dir = dir.path().join("configs/policy");
    fs::create_dir_all(&policy_dir).expect("mkdir");
    fs::write(policy_dir.join("policy.json"), "{\"schema_version\": \"1\"}").expect("write");
    let output = saaskart()
        .args(["--json", "search", "--db"])
        .arg(&db)
        .arg("--policy-root")
        .arg(dir.path())
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(3));
    let err: Value = serde_json::from_slice(&output.stderr).expect("machine error");
    assert_eq!(err["code"], "PolicyInvalid");
}

#[test]
fn malformed_param_and_flags_are_usage_errors() {
    let output = saaskart()
        .args(["--json", "search", "--db", "x.sqlite", "-p", "countries"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(2));

    let output = saaskart()
        .args(["--json", "--unknown-flag"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(2));
    let err: Value = serde_json::from_slice(&output.stderr).expect("machine error");
    assert_eq!(err["code"], "UsageError");
}
