//! End-to-end tests for the `reqlog` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/test-all-apis.sh")
}

fn reqlog() -> Command {
    let mut cmd = Command::cargo_bin("reqlog").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("REQLOG_HELPER")
        .env_remove("REQLOG_BODY_VAR")
        .env_remove("REQLOG_RESPONSE_LABEL");
    cmd
}

fn run_fixture() -> String {
    let output = reqlog().arg(fixture()).output().unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn test_annotates_body_requests() {
    let out = run_fixture();

    assert!(out.contains(
        "REQUEST_DATA='{\"username\": \"alice\", \"email\": \"alice@example.com\"}'\n\
         print_request \"POST\" \"$BASE_URL_USER/api/users\" \"$REQUEST_DATA\"\n\
         RESPONSE=$(curl"
    ));
    assert!(out.contains(
        "print_request \"PUT\" \"$BASE_URL_CATALOG/api/courses/7\" \"$REQUEST_DATA\"\n"
    ));
    assert_eq!(out.matches("-d \"$REQUEST_DATA\")").count(), 2);
    assert!(!out.contains("-d '"));
}

#[test]
fn test_annotates_get_requests() {
    let out = run_fixture();

    assert!(out.contains(
        "echo \">>> TC-USER-002: Fetch the user\"\n\
         print_request \"GET\" \"$BASE_URL_USER/api/users/1\"\n\
         RESPONSE=$(curl -s -w \"\\n%{http_code}\" $BASE_URL_USER/api/users/1)\n"
    ));
    assert_eq!(out.matches("print_request \"GET\"").count(), 1);
}

#[test]
fn test_success_messages_and_labels() {
    let input = fs::read_to_string(fixture()).unwrap();
    let out = run_fixture();

    assert_eq!(out.matches(" PASSED (HTTP: $HTTP_CODE)${NC}\"").count(), 3);
    assert_eq!(
        out.matches("PASSED${NC}\"").count(),
        0,
        "every success message should carry the status"
    );
    // Only the two cases that pretty-print their response get a label.
    assert_eq!(out.matches("echo -e \"${GREEN}[响应]${NC}\"").count(), 2);
    assert!(out.contains(
        "    PASSED=$((PASSED+1))\n    echo -e \"${GREEN}[响应]${NC}\"\n    echo \"$RESPONSE_BODY\" | jq .\n"
    ));
    // 2 body variables, 3 request logs, 2 labels
    assert_eq!(
        out.trim_end_matches('\n').lines().count(),
        input.trim_end_matches('\n').lines().count() + 7
    );
}

#[test]
fn test_input_file_is_not_modified() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("script.sh");
    fs::copy(fixture(), &script).unwrap();
    let before = fs::read_to_string(&script).unwrap();

    reqlog().arg(&script).assert().success();

    assert_eq!(fs::read_to_string(&script).unwrap(), before);
}

#[test]
fn test_missing_helper_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("script.sh");
    let content = fs::read_to_string(fixture())
        .unwrap()
        .replace("print_request() {", "log_it() {");
    fs::write(&script, content).unwrap();

    reqlog()
        .arg(&script)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("print_request"));
}

#[test]
fn test_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    reqlog()
        .arg(dir.path().join("absent.sh"))
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn test_default_script_name() {
    let dir = TempDir::new().unwrap();
    fs::copy(fixture(), dir.path().join("test-all-apis.sh")).unwrap();

    reqlog()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("print_request \"GET\""));
}

#[test]
fn test_no_matches_is_success() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("script.sh");
    fs::write(&script, "print_request() { :; }\necho hello\n").unwrap();

    reqlog()
        .arg(&script)
        .assert()
        .success()
        .stdout("print_request() { :; }\necho hello\n\n");
}

#[test]
fn test_custom_names_from_env() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("script.sh");
    let content = fs::read_to_string(fixture())
        .unwrap()
        .replace("print_request() {", "log_request() {");
    fs::write(&script, content).unwrap();

    reqlog()
        .arg(&script)
        .env("REQLOG_HELPER", "log_request")
        .arg("--body-var")
        .arg("BODY")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "log_request \"POST\" \"$BASE_URL_USER/api/users\" \"$BODY\"",
        ))
        .stdout(predicate::str::contains("-d \"$BODY\")"));
}

#[test]
fn test_json_summary() {
    let output = reqlog()
        .arg(fixture())
        .args(["--summary", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(summary["body_requests"], 2);
    assert_eq!(summary["bodiless_requests"], 1);
    assert_eq!(summary["success_messages"], 3);
    assert_eq!(summary["response_labels"], 2);
}
