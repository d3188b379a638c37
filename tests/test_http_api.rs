//! HTTP API tests: health, upload, stats, basic generation and the index page.
//!
//! Each test starts the router in-process on an ephemeral port with its own temporary
//! database slot, then drives it with `reqwest`.

use mysteryforge::transport::http::{self, AppState, HttpSettings};
use mysteryforge::{DatabaseStore, StoryEnhancer, StoryService, StoryTemplate};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

struct Unused;

#[async_trait::async_trait]
impl StoryEnhancer for Unused {
    async fn enhance(&self, _api_key: &str, _prompt: &str) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("enhancer should not be called"))
    }
}

struct TestServer {
    base_url: String,
    db_path: PathBuf,
    _dir: TempDir,
}

async fn spawn(settings: HttpSettings) -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("database").join("mysteryforge_db_structure.json");
    let state = AppState {
        store: Arc::new(DatabaseStore::new(&db_path)),
        stories: Arc::new(StoryService::new(StoryTemplate::default(), Arc::new(Unused), Some(5))),
        settings: Arc::new(settings),
    };
    let router = http::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        db_path,
        _dir: dir,
    }
}

fn office_database() -> Value {
    json!({
        "database_info": { "total_entries": { "alibi_lies": 1, "mystery_scenarios": 1, "characters": 1 } },
        "alibi_lies": [{
            "category": "timing",
            "alibi_claim": "I was at my desk until nine",
            "contradiction": "The building lost power at eight",
            "tags": ["office"]
        }],
        "mystery_scenarios": [{
            "location": "Accounting Floor",
            "setting_description": "Rows of cubicles",
            "situation_context": "Year-end close",
            "conflict_source": "Missing Funds",
            "time_constraints": "the evening audit",
            "special_constraints": "Only badge holders could enter.",
            "victim": { "name": "Harold Finch", "role": "CFO", "background": "Feared by all" },
            "setting_tags": ["office"]
        }],
        "characters": [{
            "name": "Ada Quill",
            "role": "Forensic Accountant",
            "background": "Never misses a decimal",
            "catches_alibis": ["office"]
        }]
    })
}

fn upload_form(bytes: Vec<u8>, file_name: &str, mime: &str) -> Form {
    Form::new().part(
        "database",
        Part::bytes(bytes).file_name(file_name.to_string()).mime_str(mime).unwrap(),
    )
}

#[tokio::test]
async fn health_reports_healthy_with_timestamp() {
    let server = spawn(HttpSettings::default()).await;
    let resp = reqwest::get(format!("{}/api/health", server.base_url)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    let ts = chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).unwrap();
    let age = chrono::Utc::now().signed_duration_since(ts);
    assert!(age.num_seconds().abs() < 60);
}

#[tokio::test]
async fn upload_returns_parsed_contents_and_overwrites_slot() {
    let server = spawn(HttpSettings::default()).await;
    let client = reqwest::Client::new();
    let db = office_database();

    let resp = client
        .post(format!("{}/api/database/upload", server.base_url))
        .multipart(upload_form(serde_json::to_vec(&db).unwrap(), "db.json", "application/json"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], db);

    let stored: Value = serde_json::from_slice(&std::fs::read(&server.db_path).unwrap()).unwrap();
    assert_eq!(stored, db);
}

#[tokio::test]
async fn malformed_upload_is_a_server_error() {
    let server = spawn(HttpSettings::default()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/database/upload", server.base_url))
        .multipart(upload_form(b"{ \"alibi_lies\": [".to_vec(), "db.json", "application/json"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().len() > 0);

    // The raw bytes are written before parsing.
    assert!(server.db_path.exists());
}

#[tokio::test]
async fn upload_without_file_is_a_client_error() {
    let server = spawn(HttpSettings::default()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/database/upload", server.base_url))
        .multipart(Form::new().text("other", "value"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "success": false, "error": "No file uploaded" }));
}

#[tokio::test]
async fn strict_upload_rejects_non_json_files() {
    let server = spawn(HttpSettings {
        strict_upload: true,
        ..Default::default()
    })
    .await;
    let client = reqwest::Client::new();
    let bytes = serde_json::to_vec(&office_database()).unwrap();

    let resp = client
        .post(format!("{}/api/database/upload", server.base_url))
        .multipart(upload_form(bytes.clone(), "db.txt", "text/plain"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Only JSON files allowed");
    assert!(!server.db_path.exists());

    let resp = client
        .post(format!("{}/api/database/upload", server.base_url))
        .multipart(upload_form(bytes, "db.json", "application/octet-stream"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn basic_generation_with_inline_database() {
    let server = spawn(HttpSettings::default()).await;
    let client = reqwest::Client::new();
    let suspects = StoryTemplate::default().suspect_names;

    for _ in 0..10 {
        let resp = client
            .post(format!("{}/api/generate-basic", server.base_url))
            .json(&json!({ "database": office_database() }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["story"]["title"], "The timing Contradiction");

        let text = body["story"]["basicStory"].as_str().unwrap();
        assert!(text.contains("I was at my desk until nine"));
        assert!(text.contains("The building lost power at eight"));
        assert!(text.contains("THE DETECTIVE: Ada Quill, Forensic Accountant"));
        assert!(suspects.iter().any(|s| text.contains(&format!("{s} claims"))));
        assert!(body["story"].get("aiEnhancedStory").is_none());
    }
}

#[tokio::test]
async fn basic_generation_falls_back_to_uploaded_database() {
    let server = spawn(HttpSettings::default()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/generate-basic", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No database uploaded");

    client
        .post(format!("{}/api/database/upload", server.base_url))
        .multipart(upload_form(
            serde_json::to_vec(&office_database()).unwrap(),
            "db.json",
            "application/json",
        ))
        .send()
        .await
        .unwrap();

    let resp = client
        .post(format!("{}/api/generate-basic", server.base_url))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert!(body["story"]["basicStory"]
        .as_str()
        .unwrap()
        .contains("Accounting Floor"));
}

#[tokio::test]
async fn empty_collection_is_a_server_error() {
    let server = spawn(HttpSettings::default()).await;
    let client = reqwest::Client::new();
    let mut db = office_database();
    db["characters"] = json!([]);

    let resp = client
        .post(format!("{}/api/generate-basic", server.base_url))
        .json(&json!({ "database": db }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("characters"));
}

#[tokio::test]
async fn stats_reflect_the_stored_database() {
    let server = spawn(HttpSettings::default()).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/api/database/stats", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    client
        .post(format!("{}/api/database/upload", server.base_url))
        .multipart(upload_form(
            serde_json::to_vec(&office_database()).unwrap(),
            "db.json",
            "application/json",
        ))
        .send()
        .await
        .unwrap();

    let body: Value = client
        .get(format!("{}/api/database/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["alibi_lies"], 1);
    assert_eq!(body["data"]["mystery_scenarios"], 1);
    assert_eq!(body["data"]["characters"], 1);
    assert_eq!(body["data"]["total_entries"]["characters"], 1);
}

#[tokio::test]
async fn index_serves_embedded_page_or_fallback() {
    let server = spawn(HttpSettings::default()).await;
    let html = reqwest::get(format!("{}/", server.base_url))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("<title>MysteryForge Web</title>"));
    assert!(html.contains(r#"id="export-btn""#));
    assert!(html.contains(r#"id="generate-another""#));

    let missing = spawn(HttpSettings {
        interface_path: Some(PathBuf::from("/definitely/not/here.html")),
        ..Default::default()
    })
    .await;
    let html = reqwest::get(format!("{}/", missing.base_url))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(html, "<h1>MysteryForge</h1><p>Interface file not found</p>");
}

#[tokio::test]
async fn oversized_body_is_refused() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let dir = tempfile::tempdir().unwrap();
    let state = AppState {
        store: Arc::new(DatabaseStore::new(dir.path().join("db.json"))),
        stories: Arc::new(StoryService::new(StoryTemplate::default(), Arc::new(Unused), Some(5))),
        settings: Arc::new(HttpSettings::default()),
    };
    let router = http::create_router(state);

    // A valid database padded past the 10 MiB cap.
    let mut db = office_database();
    db["padding"] = json!("x".repeat(http::router::BODY_LIMIT_BYTES + 1));
    let body = serde_json::to_vec(&json!({ "database": db })).unwrap();

    let resp = router
        .oneshot(
            Request::post("/api/generate-basic")
                .header("content-type", "application/json")
                .header("content-length", body.len())
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
