//! CLI integration tests
//!
//! Run the built binary against files in a temporary directory.

use chrono::Utc;
use serde_json::Value;
use stackdiff_core::record::NewDiff;
use stackdiff_store::SqliteDiffStore;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stackdiff"))
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_diff_prints_human_summary() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.yml", "a: 1\nb: 2\nc:\n  d: 4\n  e: 5\n");
    let b = write(&dir, "b.yml", "a: 1\nb: 3\nf: 6\nc:\n  d: 4\n  g: 7\n");

    let output = run(&["diff", a.to_str().unwrap(), b.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("## Structural Diff"));
    assert!(stdout.contains("/c/e"));
    assert!(stdout.contains("/c/g"));
    assert!(stdout.contains("/b"));
}

#[test]
fn test_diff_json_output() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.yml", "a: 1\nb: 2\n");
    let b = write(&dir, "b.yml", "a: 1\nb: 3\nf: 6\n");

    let output = run(&["diff", a.to_str().unwrap(), b.to_str().unwrap(), "--json"]);
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["leftNotRight"], serde_json::json!([]));
    assert_eq!(json["rightNotLeft"], serde_json::json!(["/f"]));
    assert_eq!(json["sameKeySameValue"], serde_json::json!(["/a"]));
    assert_eq!(json["sameKeyDiffValue"], serde_json::json!(["/b"]));
}

#[test]
fn test_diff_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.yml", "a: 1\n");
    let b = write(&dir, "b.yml", "a: 1\n");
    let out = dir.path().join("diff.md");

    let output = run(&[
        "diff",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert!(fs::read_to_string(&out).unwrap().contains("Identical"));
}

#[test]
fn test_diff_rejects_scalar_root() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.yml", "- 1\n- 2\n");
    let b = write(&dir, "b.yml", "a: 1\n");

    let output = run(&["diff", a.to_str().unwrap(), b.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_INVALID_YAML"));
}

#[test]
fn test_diff_missing_file() {
    let dir = TempDir::new().unwrap();
    let b = write(&dir, "b.yml", "a: 1\n");
    let missing = dir.path().join("nope.yml");

    let output = run(&["diff", missing.to_str().unwrap(), b.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read"));
}

#[test]
fn test_records_list_and_show() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("store.db");
    let record = {
        let store = SqliteDiffStore::open(&db_path).unwrap();
        store
            .insert_diff(&NewDiff::sentinel("stack-a", "stack-b", "apps/api"), Utc::now())
            .unwrap()
    };
    let db = db_path.to_str().unwrap();

    let output = run(&["records", "list", "--db", db, "--stack-a", "stack-a"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let list: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["leftNotRight"], serde_json::json!(["/*"]));

    let output = run(&["records", "list", "--db", db, "--stack-a", "other"]);
    let list: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(list.as_array().unwrap().is_empty());

    let output = run(&["records", "show", &record.id, "--db", db]);
    assert!(output.status.success());
    let shown: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["_id"], record.id.as_str());
}

#[test]
fn test_records_without_store_fails() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("missing.db");
    let output = run(&["records", "list", "--db", db.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no diff store"));
}
