use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case_sync::{run_sync, Error, Result, Settings};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EXAMPLE_ID: &str = "af204b86-5c1e-4d0b-9a57-3f3c0e2b8d11";

fn settings(server: &MockServer, dir: &Path) -> Settings {
    Settings {
        endpoint: server.uri(),
        app_id: "app-42".into(),
        token: "secret-token".into(),
        snapshot_path: dir.join("test-cases-response.json"),
        output_dir: dir.join("test-cases"),
        timeout_secs: 5,
        ..Settings::default()
    }
}

fn example_record() -> Value {
    json!({
        "uuid": EXAMPLE_ID,
        "description": "Wait twice",
        "disabled": false,
        "createdAt": "2025-01-15T09:30:00Z",
        "modifiedAt": "2025-01-16T12:00:00+01:00",
        "createdBy": { "name": "Ana Pérez", "email": "ana@example.com" },
        "customSteps": ["wait 1 sec", "wait 1 sec"],
        "labels": []
    })
}

fn envelope(records: Vec<Value>) -> Value {
    let total = records.len();
    json!({ "status": "OK", "data": { "content": records, "totalElements": total } })
}

async fn respond_with(server: &MockServer, template: ResponseTemplate) {
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/apps/app-42/test_cases"))
        .and(header("auth-token", "secret-token"))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn sync(settings: &Settings) -> Result<usize> {
    let settings = settings.clone();
    tokio::task::spawn_blocking(move || run_sync(&settings).map(|r| r.format.documents))
        .await
        .unwrap()
}

fn tree(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            (
                entry.file_name().to_string_lossy().into_owned(),
                fs::read(entry.path()).unwrap(),
            )
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn example_record_renders_document_and_index_row() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(envelope(vec![example_record()])),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&server, dir.path());
    assert_eq!(sync(&settings).await.unwrap(), 1);

    let doc = fs::read_to_string(settings.output_dir.join(format!("{EXAMPLE_ID}.md"))).unwrap();
    assert!(doc.contains("- **Status**: ✅ Enabled\n"));
    assert!(doc.contains("- **Created**: 2025-01-15 09:30:00 UTC\n"));
    assert!(doc.contains("- **Modified**: 2025-01-16 11:00:00 UTC\n"));
    assert!(doc.contains("- **Created By**: Ana Pérez (ana@example.com)\n"));
    assert!(doc.ends_with("```\nwait 1 sec\nwait 1 sec\n```\n"));

    let index = fs::read_to_string(settings.output_dir.join("INDEX.md")).unwrap();
    assert!(index.contains(&format!(
        "| 1 | [Wait twice](./{EXAMPLE_ID}.md) | `{EXAMPLE_ID}` | ✅ Enabled | 2025-01-15 | 2 |\n"
    )));

    let raw: Value =
        serde_json::from_slice(&fs::read(&settings.snapshot_path).unwrap()).unwrap();
    assert_eq!(raw, envelope(vec![example_record()]));
}

#[tokio::test(flavor = "multi_thread")]
async fn rerun_is_identical_and_stale_files_survive() {
    let server = MockServer::start().await;
    let mut second = example_record();
    second["uuid"] = json!("second-case");
    second["disabled"] = json!(true);
    second["customSteps"] = json!("open url \"https://example.com\"\n\nclick \"Login\"\n");

    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&server, dir.path());
    fs::create_dir_all(&settings.output_dir).unwrap();
    fs::write(settings.output_dir.join("removed-upstream.md"), "stale").unwrap();

    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(json!([second, example_record()])),
    )
    .await;
    assert_eq!(sync(&settings).await.unwrap(), 2);
    let first = tree(&settings.output_dir);
    assert_eq!(sync(&settings).await.unwrap(), 2);

    assert_eq!(tree(&settings.output_dir), first);
    assert_eq!(
        first.keys().cloned().collect::<Vec<_>>(),
        vec![
            "INDEX.md".to_string(),
            format!("{EXAMPLE_ID}.md"),
            "removed-upstream.md".to_string(),
            "second-case.md".to_string(),
        ]
    );

    let index = String::from_utf8(first["INDEX.md"].clone()).unwrap();
    let second_row = index.find("`second-case`").unwrap();
    let example_row = index.find(&format!("`{EXAMPLE_ID}`")).unwrap();
    assert!(second_row < example_row);
    assert!(index.contains("| `second-case` | 🚫 Disabled | 2025-01-15 | 2 |"));
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_snapshot_leaves_output_untouched() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&server, dir.path());

    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(json!([example_record()])),
    )
    .await;
    sync(&settings).await.unwrap();
    let before = tree(&settings.output_dir);

    let mut broken = example_record();
    broken["uuid"] = json!("broken-case");
    broken.as_object_mut().unwrap().remove("customSteps");
    let mut changed = example_record();
    changed["description"] = json!("Changed title");
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(json!([changed, broken])),
    )
    .await;

    let err = sync(&settings).await.unwrap_err();
    match &err {
        Error::InvalidRecord { index, id, .. } => {
            assert_eq!(*index, 1);
            assert_eq!(id.as_deref(), Some("broken-case"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.exit_code(), 1);
    assert_eq!(tree(&settings.output_dir), before);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_fetch_changes_nothing() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&server, dir.path());

    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(json!([example_record()])),
    )
    .await;
    sync(&settings).await.unwrap();
    let before = tree(dir.path().join("test-cases").as_path());
    let raw_before = fs::read(&settings.snapshot_path).unwrap();

    respond_with(&server, ResponseTemplate::new(503).set_body_string("maintenance")).await;
    let err = sync(&settings).await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
    assert_eq!(err.stage(), "fetch");
    assert_eq!(fs::read(&settings.snapshot_path).unwrap(), raw_before);
    assert_eq!(tree(&settings.output_dir), before);
}
