use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn cargo_bin() -> &'static str {
    "llm-structured-cli"
}

#[test]
fn json_mode_repairs_and_prints_value() {
    let mut cmd = Command::cargo_bin(cargo_bin()).unwrap();
    cmd.args(["json"])
        .write_stdin("{name: 'Ada', age: 30,}")
        .assert()
        .success()
        .stdout(predicate::function(|out: &[u8]| {
            std::str::from_utf8(out)
                .ok()
                .and_then(|s| serde_json::from_str::<serde_json::Value>(s).ok())
                .map(|v| v["value"]["name"] == "Ada")
                .unwrap_or(false)
        }));
}

#[test]
fn json_mode_reads_from_input_file() {
    let dir = tempdir().unwrap();
    let inp = dir.path().join("in.json");
    fs::write(&inp, "{a: 1}").unwrap();
    Command::cargo_bin(cargo_bin())
        .unwrap()
        .args(["json", "--input", inp.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"a\":1"));
}

#[test]
fn json_mode_validates_against_schema_and_fails_with_diagnostics() {
    let dir = tempdir().unwrap();
    let schema = dir.path().join("schema.json");
    fs::write(&schema, r#"{"type":"object","required":["name"]}"#).unwrap();

    let assert = Command::cargo_bin(cargo_bin())
        .unwrap()
        .args(["json", "--schema", schema.to_str().unwrap()])
        .write_stdin("{\"age\": 30}")
        .assert()
        .code(1);
    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["valid"], false);
    assert!(v["diagnostics"][0]["path"].as_str().unwrap().contains("name"));
}

#[test]
fn json_mode_collect_all_reports_every_violation() {
    let dir = tempdir().unwrap();
    let schema = dir.path().join("schema.json");
    fs::write(
        &schema,
        r#"{"type":"object","required":["name","age"],"properties":{"age":{"type":"integer"}}}"#,
    )
    .unwrap();

    let assert = Command::cargo_bin(cargo_bin())
        .unwrap()
        .args(["json", "--schema", schema.to_str().unwrap(), "--collect-all"])
        .write_stdin("{\"age\": \"thirty\"}")
        .assert()
        .code(1);
    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert!(v["diagnostics"].as_array().unwrap().len() >= 2);
}

#[test]
fn sql_mode_reports_statement_type_and_tables() {
    Command::cargo_bin(cargo_bin())
        .unwrap()
        .args(["sql"])
        .write_stdin("SELECT id, name FROM users WHERE id = 1")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"statementType\":\"select\"").and(predicate::str::contains("\"users\"")));
}

#[test]
fn sql_mode_validates_against_policy_and_fails() {
    let dir = tempdir().unwrap();
    let policy = dir.path().join("policy.json");
    fs::write(&policy, r#"{"allowedTables":["users"]}"#).unwrap();

    Command::cargo_bin(cargo_bin())
        .unwrap()
        .args(["sql", "--schema", policy.to_str().unwrap()])
        .write_stdin("SELECT * FROM accounts")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"valid\":false"));
}

#[test]
fn missing_mode_argument_is_a_usage_error() {
    Command::cargo_bin(cargo_bin()).unwrap().assert().code(2);
}

#[test]
fn unknown_option_is_a_usage_error() {
    Command::cargo_bin(cargo_bin())
        .unwrap()
        .args(["json", "--not-an-option"])
        .assert()
        .code(2);
}

#[test]
fn help_flag_exits_zero() {
    Command::cargo_bin(cargo_bin()).unwrap().args(["--help"]).assert().success();
}

#[test]
fn duplicate_key_policy_error_reports_parse_failure() {
    Command::cargo_bin(cargo_bin())
        .unwrap()
        .args(["json", "--duplicate-key-policy", "error"])
        .write_stdin(r#"{"a": 1, "a": 2}"#)
        .assert()
        .code(1);
}
