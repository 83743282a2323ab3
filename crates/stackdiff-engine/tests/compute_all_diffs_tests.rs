//! Comparison batch against an in-memory source and store.

mod common;

use common::FakeSource;
use stackdiff_core::errors::ExErrorKind;
use stackdiff_engine::commands::{compute_all_diffs, latest_run_for_stacks};
use stackdiff_engine::BatchSettings;
use stackdiff_github::{ContentEntry, ContentKind};
use stackdiff_store::{DiffFilter, SqliteDiffStore};

const API_A: &str = "a: 1\nb: 2\nc:\n  d: 4\n  e: 5\n";
const API_B: &str = "a: 1\nb: 3\nf: 6\nc:\n  d: 4\n  g: 7\n";
const WEB: &str = "replicas: 2\nimage:\n  tag: v1\n";

fn settings() -> BatchSettings {
    BatchSettings::new("apps", "infra")
}

fn source() -> FakeSource {
    FakeSource::new()
        .with_repo("prod")
        .with_repo("staging")
        .with_dirs("prod", "apps", &["api", "web"])
        .with_dirs("prod", "infra", &["db"])
        .with_entry(
            "prod",
            "apps",
            ContentEntry {
                name: "README.md".to_string(),
                path: "apps/README.md".to_string(),
                kind: ContentKind::File,
            },
        )
        .with_file("prod", "apps/api/config-overrides.yml", API_A)
        .with_file("staging", "apps/api/config-overrides.yml", API_B)
        .with_file("prod", "apps/web/config-overrides.yml", WEB)
        .with_file("staging", "apps/web/config-overrides.yml", WEB)
        .with_file("prod", "infra/db/config-overrides.yml", "pool: 10\n")
}

#[tokio::test]
async fn test_batch_records_changed_and_missing_files() {
    let store = SqliteDiffStore::open_in_memory().unwrap();

    let outcome = compute_all_diffs(&source(), &store, &settings(), "prod", "staging")
        .await
        .unwrap();

    assert_eq!(outcome.stack_a, "prod");
    assert!(outcome.failures.is_empty());
    let files: Vec<&str> = outcome.files_with_diff.iter().map(|r| r.file.as_str()).collect();
    assert_eq!(files, vec!["apps/api", "infra/db"], "identical apps/web is skipped");

    let api = &outcome.files_with_diff[0];
    assert_eq!(api.left_not_right, vec!["/c/e"]);
    assert_eq!(api.right_not_left, vec!["/f", "/c/g"]);
    assert_eq!(api.same_key_diff_value, vec!["/b"]);
    assert!(!api.reviewed);

    let db = &outcome.files_with_diff[1];
    assert!(db.is_sentinel());
    assert_eq!(db.left_not_right, vec!["/*"]);

    assert_eq!(api.created_at, db.created_at, "one timestamp per run");
    assert_eq!(store.find_diffs(&DiffFilter::stacks("prod", "staging")).unwrap().len(), 2);
}

#[tokio::test]
async fn test_second_run_becomes_latest() {
    let store = SqliteDiffStore::open_in_memory().unwrap();
    let source = source();

    let first = compute_all_diffs(&source, &store, &settings(), "prod", "staging")
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = compute_all_diffs(&source, &store, &settings(), "prod", "staging")
        .await
        .unwrap();
    assert!(second.files_with_diff[0].created_at > first.files_with_diff[0].created_at);

    let latest = latest_run_for_stacks(&store, "prod", "staging").unwrap();
    assert_eq!(latest.len(), 2);
    assert!(latest
        .iter()
        .all(|r| r.created_at == second.files_with_diff[0].created_at));
}

#[tokio::test]
async fn test_malformed_yaml_is_reported_and_batch_continues() {
    let store = SqliteDiffStore::open_in_memory().unwrap();
    let source = FakeSource::new()
        .with_repo("prod")
        .with_repo("staging")
        .with_dirs("prod", "apps", &["bad", "good"])
        .with_dirs("prod", "infra", &[])
        .with_file("prod", "apps/bad/config-overrides.yml", "a: 1\n")
        .with_file("staging", "apps/bad/config-overrides.yml", "- just\n- a list\n")
        .with_file("prod", "apps/good/config-overrides.yml", "x: 1\n")
        .with_file("staging", "apps/good/config-overrides.yml", "x: 2\n");

    let outcome = compute_all_diffs(&source, &store, &settings(), "prod", "staging")
        .await
        .unwrap();

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].file, "apps/bad");
    assert_eq!(outcome.failures[0].kind, "ERR_INVALID_YAML");
    assert!(outcome.failures[0].message.starts_with("staging"));

    assert_eq!(outcome.files_with_diff.len(), 1);
    assert_eq!(outcome.files_with_diff[0].same_key_diff_value, vec!["/x"]);
}

#[tokio::test]
async fn test_missing_stack_aborts() {
    let store = SqliteDiffStore::open_in_memory().unwrap();

    let err = compute_all_diffs(&source(), &store, &settings(), "prod", "nowhere")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.entity_id(), Some("nowhere"));
    assert!(store.find_diffs(&DiffFilter::default()).unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_discovery_folder_aborts() {
    let store = SqliteDiffStore::open_in_memory().unwrap();
    let settings = BatchSettings::new("apps", "missing");

    let err = compute_all_diffs(&source(), &store, &settings, "prod", "staging")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_missing_file_on_reference_stack_aborts() {
    let store = SqliteDiffStore::open_in_memory().unwrap();
    let source = FakeSource::new()
        .with_repo("prod")
        .with_repo("staging")
        .with_dirs("prod", "apps", &["orphan"])
        .with_dirs("prod", "infra", &[]);

    let err = compute_all_diffs(&source, &store, &settings(), "prod", "staging")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[tokio::test]
async fn test_upstream_error_on_compared_stack_aborts() {
    let store = SqliteDiffStore::open_in_memory().unwrap();
    let source = source().with_broken_file("staging", "apps/api/config-overrides.yml");

    let err = compute_all_diffs(&source, &store, &settings(), "prod", "staging")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ExternalService);
}

#[tokio::test]
async fn test_custom_layout_is_honoured() {
    let store = SqliteDiffStore::open_in_memory().unwrap();
    let source = FakeSource::new()
        .with_repo("prod")
        .with_repo("staging")
        .with_dirs("prod", "deploy/apps", &["api"])
        .with_dirs("prod", "deploy/infra", &[])
        .with_file("prod", "deploy/apps/api/values.yml", "a: 1\n")
        .with_file("staging", "deploy/apps/api/values.yml", "b: 1\n");
    let settings = settings()
        .with_folder_path("deploy")
        .with_config_file_name("values.yml");

    let outcome = compute_all_diffs(&source, &store, &settings, "prod", "staging")
        .await
        .unwrap();

    assert_eq!(outcome.files_with_diff.len(), 1);
    assert_eq!(outcome.files_with_diff[0].file, "deploy/apps/api");
    assert_eq!(outcome.files_with_diff[0].left_not_right, vec!["/a"]);
    assert_eq!(outcome.files_with_diff[0].right_not_left, vec!["/b"]);
}

#[tokio::test]
async fn test_outcome_serializes_camel_case() {
    let store = SqliteDiffStore::open_in_memory().unwrap();
    let outcome = compute_all_diffs(&source(), &store, &settings(), "prod", "staging")
        .await
        .unwrap();

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["stackA"], "prod");
    assert_eq!(json["filesWithDiff"].as_array().unwrap().len(), 2);
    assert!(json["failures"].as_array().unwrap().is_empty());
}
